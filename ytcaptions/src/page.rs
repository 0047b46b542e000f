use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::http::with_timeout;
use crate::types::VideoId;

/// The page an extraction runs against: its URL and its markup.
#[derive(Debug, Clone)]
pub struct PageContext {
    url: String,
    html: String,
}

fn shorts_regex() -> &'static Regex {
    static SHORTS: OnceLock<Regex> = OnceLock::new();
    SHORTS.get_or_init(|| Regex::new(r"/shorts/([A-Za-z0-9_-]+)").expect("valid shorts regex"))
}

fn api_key_regex() -> &'static Regex {
    static API_KEY: OnceLock<Regex> = OnceLock::new();
    API_KEY.get_or_init(|| {
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([^"]+)""#).expect("valid api key regex")
    })
}

/// Video id from a watch URL (`?v=<id>`) or a shorts URL (`/shorts/<id>`).
pub fn video_id_from_url(url: &str) -> Option<VideoId> {
    let parsed = Url::parse(url.trim()).ok()?;

    if let Some((_, v)) = parsed.query_pairs().find(|(k, _)| *k == "v") {
        if !v.is_empty() {
            return Some(VideoId::new(v.into_owned()));
        }
    }

    shorts_regex()
        .captures(parsed.path())
        .map(|c| VideoId::new(&c[1]))
}

impl PageContext {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Download the page markup for `url` with a fresh client.
    pub async fn load(url: &str, timeout: Duration) -> Result<Self> {
        Self::fetch(&reqwest::Client::new(), url, timeout).await
    }

    /// Download the page markup for `url`.
    pub async fn fetch(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<Self> {
        info!(%url, "fetching page");
        let url_owned = url.to_string();
        let html = with_timeout(timeout, "watch page", async {
            let response = client
                .get(&url_owned)
                .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Network(format!("watch page failed: {status}")));
            }
            Ok(response.text().await?)
        })
        .await?;
        debug!(bytes = html.len(), "page fetched");
        Ok(Self::new(url, html))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn video_id(&self) -> Option<VideoId> {
        video_id_from_url(&self.url)
    }

    /// The player API key embedded in the page markup.
    pub fn api_key(&self) -> Result<String> {
        api_key_regex()
            .captures(&self.html)
            .map(|c| c[1].to_string())
            .ok_or_else(|| Error::Config("INNERTUBE_API_KEY not found".into()))
    }
}
