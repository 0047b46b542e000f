use serde::Deserialize;

use crate::parsers::{collapse_newlines, normalize, CaptionParser};
use crate::types::CaptionFormat;

#[derive(Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
struct Json3Event {
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// `fmt=json3` event/segment documents → text, one line per event.
pub struct Json3Parser;

impl CaptionParser for Json3Parser {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Json3
    }

    fn parse(&self, input: &str) -> Option<String> {
        let doc: Json3Document = serde_json::from_str(input).ok()?;

        let lines: Vec<String> = doc
            .events
            .iter()
            .filter_map(|ev| ev.segs.as_ref())
            .filter_map(|segs| {
                let joined: String = segs.iter().map(|s| s.utf8.as_str()).collect();
                let line = collapse_newlines(&joined).trim().to_string();
                (!line.is_empty()).then_some(line)
            })
            .collect();

        normalize(&lines.join("\n"))
    }
}
