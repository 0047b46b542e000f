use std::fmt;

use tracing::{info, warn};

use crate::config::ExtractOptions;
use crate::error::{Error, Result};
use crate::fetch::FetchStrategy;
use crate::page::PageContext;
use crate::panel::{self, PanelDelays, TranscriptPanelReader};
use crate::player::PlayerRetriever;
use crate::protocol::{ExtractResponse, Request};
use crate::select::select_best_track;
use crate::types::{CaptionTrack, Provenance};

/// Where an extraction currently is; carried in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    HaveVideoId,
    HaveTracks,
    HaveBestTrack,
    HaveFetchResult,
    PanelFallback,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::HaveVideoId => "have-video-id",
            Stage::HaveTracks => "have-tracks",
            Stage::HaveBestTrack => "have-best-track",
            Stage::HaveFetchResult => "have-fetch-result",
            Stage::PanelFallback => "panel-fallback",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs the acquisition pipeline: player tracks → best track → caption
/// candidates → transcript panel.
///
/// Holds no per-request state; one instance can serve any number of
/// sequential or concurrent requests.
pub struct Extractor {
    options: ExtractOptions,
    client: reqwest::Client,
    panel: Box<dyn TranscriptPanelReader>,
}

impl Extractor {
    pub fn new(options: ExtractOptions, panel: Box<dyn TranscriptPanelReader>) -> Self {
        Self::with_client(options, reqwest::Client::new(), panel)
    }

    /// Use a preconfigured HTTP client (proxies, cookies, user agent).
    pub fn with_client(
        options: ExtractOptions,
        client: reqwest::Client,
        panel: Box<dyn TranscriptPanelReader>,
    ) -> Self {
        Self {
            options,
            client,
            panel,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Caption tracks the host advertises for `page`, unranked.
    pub async fn list_tracks(&self, page: &PageContext) -> Result<Vec<CaptionTrack>> {
        let video_id = page.video_id().ok_or(Error::NotOnWatchPage)?;
        PlayerRetriever::new(&self.client, &self.options)
            .fetch_tracks(page, &video_id)
            .await
    }

    /// Answer a protocol request against `page`.
    pub async fn handle(&self, request: &Request, page: &PageContext) -> ExtractResponse {
        match request {
            Request::Extract => self.extract(page).await,
        }
    }

    /// Extract the transcript for `page`. Always produces a response; failures
    /// are reported with `ok: false`.
    pub async fn extract(&self, page: &PageContext) -> ExtractResponse {
        match self.run(page).await {
            Ok((text, provenance)) => {
                info!(stage = %Stage::Done, source = %provenance, chars = text.len(), "transcript extracted");
                ExtractResponse::success(text, &provenance)
            }
            Err(e) => {
                warn!(stage = %Stage::Done, error = %e, "extraction failed");
                ExtractResponse::failure(&e)
            }
        }
    }

    async fn run(&self, page: &PageContext) -> Result<(String, Provenance)> {
        info!(stage = %Stage::Start, url = page.url(), "extraction started");
        let video_id = page.video_id().ok_or(Error::NotOnWatchPage)?;
        info!(stage = %Stage::HaveVideoId, %video_id);

        let retriever = PlayerRetriever::new(&self.client, &self.options);
        match retriever.fetch_tracks(page, &video_id).await {
            Ok(tracks) => {
                info!(stage = %Stage::HaveTracks, count = tracks.len());
                if let Some(best) = select_best_track(&tracks, &self.options.preferred_langs) {
                    info!(
                        stage = %Stage::HaveBestTrack,
                        lang = best.language(),
                        auto_generated = best.is_auto_generated()
                    );
                    let strategy = FetchStrategy::new(&self.client, &self.options);
                    if let Some(fetched) = strategy.fetch(&video_id, best).await {
                        info!(stage = %Stage::HaveFetchResult, label = %fetched.candidate.label);
                        let provenance = Provenance::Track {
                            retriever: retriever.name().to_string(),
                            format: fetched.format,
                        };
                        return Ok((fetched.text, provenance));
                    }
                } else {
                    info!(stage = %Stage::HaveTracks, "no caption tracks advertised");
                }
            }
            // Transient or terminal, every retriever failure goes to the panel.
            Err(e) => warn!(stage = %Stage::HaveVideoId, error = %e, "player response unavailable"),
        }

        info!(stage = %Stage::PanelFallback, "trying transcript panel");
        let delays = PanelDelays {
            menu: self.options.panel_menu_delay,
            render: self.options.panel_render_delay,
        };
        match panel::read_with_open(self.panel.as_ref(), delays).await {
            Some(text) => Ok((text, Provenance::UiPanel)),
            None => Err(Error::NoCaptions),
        }
    }
}
