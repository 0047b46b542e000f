use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::ExtractOptions;
use crate::error::{Error, Result};
use crate::http::with_timeout;
use crate::page::PageContext;
use crate::types::{CaptionTrack, VideoId};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// Pull the caption track list out of a `/player` response body.
///
/// `NotFound` when the response carries no caption metadata at all; an empty
/// track list inside the metadata is returned as-is.
pub(crate) fn caption_tracks(body: &str) -> Result<Vec<CaptionTrack>> {
    let response: PlayerResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("player response: {e}")))?;

    match response
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
    {
        Some(renderer) => Ok(renderer.caption_tracks),
        None => {
            let detail = match response.playability_status {
                Some(PlayabilityStatus {
                    status: Some(status),
                    reason,
                }) if status != "OK" => match reason {
                    Some(reason) => format!("playability {status}: {reason}"),
                    None => format!("playability {status}"),
                },
                _ => "response has no captions block".to_string(),
            };
            Err(Error::NotFound(detail))
        }
    }
}

/// Lists caption tracks through the private player endpoint.
pub struct PlayerRetriever<'a> {
    client: &'a reqwest::Client,
    options: &'a ExtractOptions,
}

impl<'a> PlayerRetriever<'a> {
    pub fn new(client: &'a reqwest::Client, options: &'a ExtractOptions) -> Self {
        Self { client, options }
    }

    /// Name used in provenance labels, e.g. `ANDROID/vtt`.
    pub fn name(&self) -> &str {
        &self.options.client.name
    }

    /// Ask the host which caption tracks exist for `video_id`.
    ///
    /// The API key is read from the page markup on every call.
    pub async fn fetch_tracks(&self, page: &PageContext, video_id: &VideoId) -> Result<Vec<CaptionTrack>> {
        let api_key = page.api_key()?;
        let endpoint = self.options.player_endpoint(&api_key);
        let label = format!("/player {}", self.name());
        let body = json!({
            "context": {
                "client": {
                    "clientName": self.options.client.name,
                    "clientVersion": self.options.client.version,
                }
            },
            "videoId": video_id.as_str(),
        });

        info!(%video_id, client = %self.name(), "requesting player response");

        let text = with_timeout(self.options.timeout, &label, async {
            let response = self.client.post(&endpoint).json(&body).send().await.map_err(|e| {
                Error::Network(format!("{label} request failed: {e}"))
            })?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Network(format!("{label} failed: {}", status.as_u16())));
            }
            Ok(response.text().await?)
        })
        .await?;

        let tracks = caption_tracks(&text)?;
        debug!(count = tracks.len(), "caption tracks listed");
        Ok(tracks)
    }
}
