//! Caption extraction library: watch page in, plain-text transcript out.
//!
//! **ytcaptions** lists a video's caption tracks through the private player
//! endpoint, picks the best one for your language preferences, fetches it in
//! whichever format the caption endpoint is willing to serve (WebVTT, json3 or
//! TTML), and falls back to reading the rendered transcript panel when no
//! track can be fetched.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> ytcaptions::Result<()> {
//! let response = ytcaptions::extract_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await;
//! if response.ok {
//!     println!("[{}]\n{}", response.source.unwrap_or_default(), response.text.unwrap_or_default());
//! }
//!
//! // Prefer English, give up on each request after 5 seconds
//! let options = ytcaptions::ExtractOptions::new()
//!     .preferred_langs(["en"])?
//!     .timeout(std::time::Duration::from_secs(5))?;
//! let response = ytcaptions::extract_url_with_options("https://www.youtube.com/shorts/abc123", options).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub(crate) mod http;
pub mod page;
pub mod panel;
pub mod parsers;
pub mod player;
pub mod prompt;
pub mod protocol;
pub mod select;
pub mod types;

pub use config::{ClientIdentity, ExtractOptions};
pub use error::{Error, Result};
pub use extract::Extractor;
pub use page::PageContext;
pub use panel::{HtmlPanelReader, TranscriptPanelReader};
pub use prompt::TidyPrompt;
pub use protocol::{ExtractResponse, Request};
pub use types::{CaptionFormat, CaptionTrack, Provenance, VideoId};

/// Extract the transcript of a watch or shorts URL with default options.
pub async fn extract_url(url: &str) -> ExtractResponse {
    extract_url_with_options(url, ExtractOptions::default()).await
}

/// Extract the transcript of a watch or shorts URL.
///
/// The watch page is downloaded once; its markup supplies the player API key
/// and doubles as the transcript-panel snapshot for the fallback path. A URL
/// without a video id is answered without touching the network.
pub async fn extract_url_with_options(url: &str, options: ExtractOptions) -> ExtractResponse {
    if page::video_id_from_url(url).is_none() {
        return ExtractResponse::failure(&Error::NotOnWatchPage);
    }

    let client = reqwest::Client::new();
    let page = match PageContext::fetch(&client, url, options.timeout).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(%url, error = %e, "could not load watch page");
            // Empty markup: the player step fails on the missing key and the
            // panel step finds nothing, so the answer is a plain no-captions.
            PageContext::new(url, String::new())
        }
    };

    let panel = HtmlPanelReader::new(page.html());
    let extractor = Extractor::with_client(options, client, Box::new(panel));
    extractor.extract(&page).await
}
