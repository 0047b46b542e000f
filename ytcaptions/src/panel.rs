//! Last-resort transcript source: the transcript panel the watch page can render.
//!
//! The page itself is behind [`TranscriptPanelReader`], so the open/read
//! sequence works the same against a live browser bridge, a saved HTML
//! snapshot ([`HtmlPanelReader`]) or a fake in tests.

use std::time::Duration;

use futures_util::future::{self, BoxFuture};
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Selector for the overflow ("...") menu button under the player.
pub const MENU_BUTTON_SELECTOR: &str = "ytd-menu-renderer yt-icon-button#button";
/// Selector for entries of the opened overflow menu.
pub const MENU_ITEM_SELECTOR: &str = "ytd-menu-service-item-renderer, tp-yt-paper-item";
/// Selector for the text of each rendered transcript line.
pub const SEGMENT_SELECTOR: &str = "ytd-transcript-segment-renderer #segment-text";

/// Menu labels that open the transcript panel ("transcript", "文字起こし").
const TRANSCRIPT_LABELS: [&str; 2] = ["transcript", "文字起こし"];

/// Access to a page that may render a transcript panel.
pub trait TranscriptPanelReader: Send + Sync {
    /// Click the overflow menu button, if there is one.
    fn click_menu_button(&self) -> BoxFuture<'_, Result<()>>;

    /// Labels of the currently rendered menu entries, in document order.
    fn menu_items(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    /// Click the menu entry at `index` (as returned by [`menu_items`](Self::menu_items)).
    fn click_menu_item(&self, index: usize) -> BoxFuture<'_, Result<()>>;

    /// Raw text content of every rendered transcript line.
    fn segment_texts(&self) -> BoxFuture<'_, Result<Vec<String>>>;
}

/// Delays between the clicks of the open sequence.
#[derive(Debug, Clone, Copy)]
pub struct PanelDelays {
    pub menu: Duration,
    pub render: Duration,
}

fn is_transcript_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    TRANSCRIPT_LABELS.iter().any(|l| lower.contains(l))
}

async fn try_open(reader: &dyn TranscriptPanelReader, delays: PanelDelays) -> Result<bool> {
    reader.click_menu_button().await?;
    tokio::time::sleep(delays.menu).await;

    let items = reader.menu_items().await?;
    match items.iter().position(|label| is_transcript_label(label)) {
        Some(index) => {
            reader.click_menu_item(index).await?;
            tokio::time::sleep(delays.render).await;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Open the transcript panel through the overflow menu. Never fails: any
/// error means the panel is unavailable and is only logged.
pub async fn open_transcript_panel(reader: &dyn TranscriptPanelReader, delays: PanelDelays) {
    match try_open(reader, delays).await {
        Ok(true) => debug!("transcript panel opened"),
        Ok(false) => debug!("no transcript entry in the menu"),
        Err(e) => debug!(error = %e, "transcript panel unavailable"),
    }
}

/// Join the rendered transcript lines, or `None` if the panel shows nothing.
pub async fn read_transcript_panel(reader: &dyn TranscriptPanelReader) -> Option<String> {
    let segments = match reader.segment_texts().await {
        Ok(s) => s,
        Err(e) => {
            debug!(error = %e, "could not read transcript segments");
            return None;
        }
    };
    if segments.is_empty() {
        return None;
    }

    let lines: Vec<&str> = segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    info!(lines = lines.len(), "read transcript panel");
    Some(lines.join("\n"))
}

/// Open-then-read, the full fallback path.
pub async fn read_with_open(reader: &dyn TranscriptPanelReader, delays: PanelDelays) -> Option<String> {
    open_transcript_panel(reader, delays).await;
    read_transcript_panel(reader).await
}

/// Reads a static HTML snapshot of a watch page.
///
/// Clicks do nothing: whatever the snapshot already rendered is what gets read.
/// Save the page from a browser after opening the transcript panel to use it.
#[derive(Debug, Clone)]
pub struct HtmlPanelReader {
    html: String,
}

impl HtmlPanelReader {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let selector = Selector::parse(selector)
            .map_err(|e| Error::Parse(format!("selector {selector:?}: {e:?}")))?;
        let doc = Html::parse_document(&self.html);
        Ok(doc
            .select(&selector)
            .map(|el| el.text().collect::<String>())
            .collect())
    }

    fn has(&self, selector: &str) -> Result<bool> {
        Ok(!self.texts(selector)?.is_empty())
    }
}

impl TranscriptPanelReader for HtmlPanelReader {
    fn click_menu_button(&self) -> BoxFuture<'_, Result<()>> {
        let result = self.has(MENU_BUTTON_SELECTOR).map(|found| {
            if !found {
                debug!("snapshot has no menu button");
            }
        });
        Box::pin(future::ready(result))
    }

    fn menu_items(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(future::ready(self.texts(MENU_ITEM_SELECTOR)))
    }

    fn click_menu_item(&self, _index: usize) -> BoxFuture<'_, Result<()>> {
        Box::pin(future::ready(Ok(())))
    }

    fn segment_texts(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        Box::pin(future::ready(self.texts(SEGMENT_SELECTOR)))
    }
}
