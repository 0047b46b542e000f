use std::time::Duration;

use crate::error::{Error, Result};

/// Host the watch pages, player endpoint and caption endpoint live on.
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Identity sent in the player request's `context.client` block.
///
/// The ANDROID client is the one that still returns caption track URLs which
/// can be fetched without a signed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: String,
    pub version: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            name: "ANDROID".into(),
            version: "20.10.38".into(),
        }
    }
}

/// Builder for extraction options.
///
/// Passed by value into [`Extractor::new`](crate::Extractor::new); nothing is
/// read from global state.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Language codes in order of preference (e.g. `["ja", "en"]`).
    pub preferred_langs: Vec<String>,
    /// Upper bound for every single network request.
    pub timeout: Duration,
    pub client: ClientIdentity,
    /// Scheme and host, without trailing slash.
    pub base_url: String,
    /// Wait after opening the overflow menu before looking for the transcript item.
    pub panel_menu_delay: Duration,
    /// Wait after clicking the transcript item before reading segments.
    pub panel_render_delay: Duration,
    /// Caption bodies larger than this are treated as a failed candidate.
    pub max_caption_bytes: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            preferred_langs: vec!["ja".into(), "en".into()],
            timeout: Duration::from_secs(12),
            client: ClientIdentity::default(),
            base_url: DEFAULT_BASE_URL.into(),
            panel_menu_delay: Duration::from_millis(500),
            panel_render_delay: Duration::from_millis(800),
            max_caption_bytes: 8 * 1024 * 1024,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred languages, most preferred first.
    /// Codes are trimmed; empty codes are rejected.
    pub fn preferred_langs<I, S>(mut self, langs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Vec::new();
        for lang in langs {
            let code = lang.as_ref().trim();
            if code.is_empty() {
                return Err(Error::InvalidOption("empty language code".into()));
            }
            out.push(code.to_string());
        }
        self.preferred_langs = out;
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::InvalidOption("timeout must be greater than zero".into()));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn client(mut self, client: ClientIdentity) -> Self {
        self.client = client;
        self
    }

    /// Point the extractor at another host (mirrors, local stubs).
    pub fn base_url(mut self, url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(Error::InvalidOption(format!(
                "base URL must start with http:// or https://: {trimmed}"
            )));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    pub fn panel_delays(mut self, menu: Duration, render: Duration) -> Self {
        self.panel_menu_delay = menu;
        self.panel_render_delay = render;
        self
    }

    pub fn max_caption_bytes(mut self, bytes: usize) -> Result<Self> {
        if bytes == 0 {
            return Err(Error::InvalidOption("max_caption_bytes must be greater than zero".into()));
        }
        self.max_caption_bytes = bytes;
        Ok(self)
    }

    pub(crate) fn player_endpoint(&self, api_key: &str) -> String {
        format!("{}/youtubei/v1/player?key={api_key}", self.base_url)
    }

    pub(crate) fn timedtext_endpoint(&self) -> String {
        format!("{}/api/timedtext", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.preferred_langs, vec!["ja", "en"]);
        assert_eq!(opts.timeout, Duration::from_secs(12));
        assert_eq!(opts.client.name, "ANDROID");
        assert_eq!(opts.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_preferred_langs_trims() {
        let opts = ExtractOptions::new().preferred_langs([" en ", "de"]).unwrap();
        assert_eq!(opts.preferred_langs, vec!["en", "de"]);
    }

    #[test]
    fn test_preferred_langs_rejects_empty_code() {
        let result = ExtractOptions::new().preferred_langs(["en", "  "]);
        assert!(matches!(result, Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_timeout_rejects_zero() {
        assert!(ExtractOptions::new().timeout(Duration::ZERO).is_err());
        assert!(ExtractOptions::new().timeout(Duration::from_secs(3)).is_ok());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let opts = ExtractOptions::new().base_url("http://127.0.0.1:8080/").unwrap();
        assert_eq!(opts.base_url, "http://127.0.0.1:8080");
        assert_eq!(
            opts.player_endpoint("KEY"),
            "http://127.0.0.1:8080/youtubei/v1/player?key=KEY"
        );
        assert_eq!(opts.timedtext_endpoint(), "http://127.0.0.1:8080/api/timedtext");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(ExtractOptions::new().base_url("file:///etc").is_err());
        assert!(ExtractOptions::new().base_url("www.youtube.com").is_err());
    }

    #[test]
    fn test_max_caption_bytes_rejects_zero() {
        assert!(ExtractOptions::new().max_caption_bytes(0).is_err());
    }
}
