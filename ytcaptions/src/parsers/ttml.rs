
use crate::parsers::{normalize, CaptionParser};
use crate::types::CaptionFormat;

/// Timed-text markup (`fmt=ttml`, also the legacy srv formats) → text, one line per `<p>`.
pub struct TtmlParser;

impl CaptionParser for TtmlParser {
    fn format(&self) -> CaptionFormat {
        CaptionFormat::Ttml
    }

    fn parse(&self, input: &str) -> Option<String> {
        let input = input.trim_start();
        if !input.starts_with('<') {
            return None;
        }

        // XML rather than HTML: the styling head is full of self-closed `<style/>`.
        let doc = roxmltree::Document::parse(input).ok()?;

        let mut found = false;
        let mut lines = Vec::new();
        for p in doc.descendants().filter(|n| n.is_element() && n.tag_name().name() == "p") {
            found = true;
            let text: String = p
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect();
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }
        if !found {
            return None;
        }

        normalize(&lines.join("\n"))
    }
}
