use crate::parsers::{normalize, CaptionParser};
use crate::types::CaptionFormat;

const HEADER_TOKEN: &str = "WEBVTT";

/// WebVTT cues → text. Drops the header block, cue numbers and timing lines.
pub struct VttParser;

impl CaptionParser for VttParser {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Vtt
    }

    fn parse(&self, input: &str) -> Option<String> {
        if !input.contains(HEADER_TOKEN) {
            return None;
        }

        let mut kept = Vec::new();
        let mut in_header = false;
        for line in input.lines() {
            let line = line.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.is_empty() {
                in_header = false;
                continue;
            }
            if line.starts_with(HEADER_TOKEN) {
                in_header = true;
                continue;
            }
            // The header runs to the first blank line or the first cue timing.
            if in_header && !looks_like_timing(line) {
                continue;
            }
            in_header = false;
            if looks_like_cue_number(trimmed) || looks_like_timing(line) {
                continue;
            }
            kept.push(line);
        }

        normalize(&kept.join("\n"))
    }
}

fn looks_like_cue_number(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

fn looks_like_timing(line: &str) -> bool {
    line.contains("-->")
}
