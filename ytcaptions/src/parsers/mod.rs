//! Best-effort decoders for the caption payloads the caption endpoint returns.
//!
//! Each parser turns a payload into plain text or gives up with `None`; none of
//! them report why. [`parse_any`] runs them in a fixed priority order.

mod json3;
mod ttml;
mod vtt;

pub use json3::Json3Parser;
pub use ttml::TtmlParser;
pub use vtt::VttParser;

use std::sync::OnceLock;

use regex::Regex;

use crate::types::CaptionFormat;

/// A caption payload decoder.
pub trait CaptionParser: Send + Sync {
    fn format(&self) -> CaptionFormat;

    /// Plain text, or `None` if the payload is not in this format or yields no text.
    fn parse(&self, input: &str) -> Option<String>;
}

/// Outcome of [`parse_any`]. `format` is `None` when no parser accepted the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCaptions {
    pub format: Option<CaptionFormat>,
    pub text: Option<String>,
}

impl ParsedCaptions {
    fn unknown() -> Self {
        Self {
            format: None,
            text: None,
        }
    }

    /// Format name for logs; `"unknown"` when nothing matched.
    pub fn format_name(&self) -> &'static str {
        self.format.map(|f| f.as_str()).unwrap_or("unknown")
    }
}

static PARSERS: [&dyn CaptionParser; 3] = [&VttParser, &Json3Parser, &TtmlParser];

/// Try every parser in priority order (vtt, json3, ttml) and return the first hit.
pub fn parse_any(input: &str) -> ParsedCaptions {
    for parser in PARSERS {
        if let Some(text) = parser.parse(input) {
            return ParsedCaptions {
                format: Some(parser.format()),
                text: Some(text),
            };
        }
    }
    ParsedCaptions::unknown()
}

fn blank_run_regex() -> &'static Regex {
    static BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("valid blank-run regex"))
}

fn newline_run_regex() -> &'static Regex {
    static NEWLINE_RUN: OnceLock<Regex> = OnceLock::new();
    NEWLINE_RUN.get_or_init(|| Regex::new(r"\n+").expect("valid newline-run regex"))
}

/// Collapse runs of three or more newlines to a single blank line and trim.
/// Returns `None` when nothing is left.
pub fn normalize(text: &str) -> Option<String> {
    let collapsed = blank_run_regex().replace_all(text, "\n\n");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collapse every run of newlines to one.
pub(crate) fn collapse_newlines(text: &str) -> String {
    newline_run_regex().replace_all(text, "\n").into_owned()
}
