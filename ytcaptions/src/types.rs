use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque video identifier taken from a watch or shorts URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caption payload formats the caption endpoint can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    Vtt,
    Json3,
    Ttml,
}

impl CaptionFormat {
    /// Order in which formats are forced onto candidate URLs and tried by the parsers.
    pub const ALL: [CaptionFormat; 3] = [CaptionFormat::Vtt, CaptionFormat::Json3, CaptionFormat::Ttml];

    /// Value of the `fmt` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionFormat::Vtt => "vtt",
            CaptionFormat::Json3 => "json3",
            CaptionFormat::Ttml => "ttml",
        }
    }
}

impl fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced a caption track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    Human,
    AutoGenerated,
}

/// Display name of a track; the host sends either `simpleText` or `runs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackName {
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub text: String,
}

impl TrackName {
    pub fn text(&self) -> String {
        match &self.simple_text {
            Some(s) => s.clone(),
            None => self.runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

/// One caption stream advertised for a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: Option<String>,
    pub language_code: Option<String>,
    /// `"asr"` for automatically generated tracks.
    pub kind: Option<String>,
    pub name: Option<TrackName>,
    #[serde(default)]
    pub is_translatable: bool,
}

impl CaptionTrack {
    pub fn origin(&self) -> TrackOrigin {
        match self.kind.as_deref() {
            Some("asr") => TrackOrigin::AutoGenerated,
            _ => TrackOrigin::Human,
        }
    }

    pub fn is_auto_generated(&self) -> bool {
        self.origin() == TrackOrigin::AutoGenerated
    }

    /// Language code, empty string if the host left it out.
    pub fn language(&self) -> &str {
        self.language_code.as_deref().unwrap_or_default()
    }

    pub fn display_name(&self) -> String {
        self.name.as_ref().map(TrackName::text).unwrap_or_default()
    }
}

/// One attempt at fetching caption content: a label for logs and provenance, and the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: String,
    pub url: String,
}

/// Caption text that was fetched and parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedCaptions {
    pub format: CaptionFormat,
    pub text: String,
    pub candidate: Candidate,
}

/// Acquisition path that produced a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Caption endpoint, named after the player client used to list the tracks.
    Track { retriever: String, format: CaptionFormat },
    UiPanel,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Track { retriever, format } => write!(f, "{retriever}/{format}"),
            Provenance::UiPanel => f.write_str("UI Panel"),
        }
    }
}
