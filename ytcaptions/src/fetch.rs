use reqwest::Url;
use tracing::{debug, info, warn};

use crate::config::ExtractOptions;
use crate::error::{Error, Result};
use crate::http::{read_text_capped, with_timeout};
use crate::parsers::parse_any;
use crate::types::{CaptionFormat, CaptionTrack, Candidate, FetchedCaptions, VideoId};

/// Replace (or add) the `fmt` query parameter, keeping every other parameter in place.
fn with_format(base: &Url, format: CaptionFormat) -> Url {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (k, v) in base.query_pairs() {
        if k == "fmt" {
            if !replaced {
                pairs.push(("fmt".into(), format.as_str().into()));
                replaced = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }
    if !replaced {
        pairs.push(("fmt".into(), format.as_str().into()));
    }

    let mut url = base.clone();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url
}

/// Every URL worth trying for `track`, in the order they are tried:
/// the direct URL as advertised, the direct URL with each format forced, then
/// the language-keyed caption endpoint with each format.
pub fn build_candidates(video_id: &VideoId, track: &CaptionTrack, options: &ExtractOptions) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    if let Some(base_url) = track.base_url.as_deref().filter(|u| !u.is_empty()) {
        candidates.push(Candidate {
            label: "baseUrl(default)".into(),
            url: base_url.to_string(),
        });
        match Url::parse(base_url) {
            Ok(parsed) => {
                for format in CaptionFormat::ALL {
                    candidates.push(Candidate {
                        label: format!("baseUrl(fmt={format})"),
                        url: with_format(&parsed, format).into(),
                    });
                }
            }
            Err(e) => warn!(%base_url, error = %e, "track URL does not parse, skipping forced formats"),
        }
    }

    let lang = track.language();
    if !lang.is_empty() {
        match Url::parse(&options.timedtext_endpoint()) {
            Ok(mut endpoint) => {
                {
                    let mut query = endpoint.query_pairs_mut();
                    query.append_pair("v", video_id.as_str());
                    query.append_pair("lang", lang);
                    if let Some(kind) = track.kind.as_deref().filter(|k| !k.is_empty()) {
                        query.append_pair("kind", kind);
                    }
                }
                for format in CaptionFormat::ALL {
                    let mut url = endpoint.clone();
                    url.query_pairs_mut().append_pair("fmt", format.as_str());
                    candidates.push(Candidate {
                        label: format!("lang(fmt={format})"),
                        url: url.into(),
                    });
                }
            }
            Err(e) => warn!(error = %e, "caption endpoint URL does not parse"),
        }
    }

    candidates
}

/// Tries caption candidates one at a time until one parses to non-empty text.
pub struct FetchStrategy<'a> {
    client: &'a reqwest::Client,
    options: &'a ExtractOptions,
}

impl<'a> FetchStrategy<'a> {
    pub fn new(client: &'a reqwest::Client, options: &'a ExtractOptions) -> Self {
        Self { client, options }
    }

    /// First candidate that yields text, or `None` once all of them failed.
    /// Individual failures are logged and skipped, never retried.
    pub async fn fetch(&self, video_id: &VideoId, track: &CaptionTrack) -> Option<FetchedCaptions> {
        let candidates = build_candidates(video_id, track, self.options);
        info!(
            %video_id,
            lang = track.language(),
            candidates = candidates.len(),
            "fetching captions"
        );

        for candidate in candidates {
            match self.try_candidate(&candidate).await {
                Ok(Some((format, text))) => {
                    info!(label = %candidate.label, %format, chars = text.len(), "captions parsed");
                    return Some(FetchedCaptions {
                        format,
                        text,
                        candidate,
                    });
                }
                Ok(None) => debug!(label = %candidate.label, "no usable captions"),
                Err(e) => debug!(label = %candidate.label, error = %e, "candidate failed"),
            }
        }

        warn!(%video_id, "all caption candidates exhausted");
        None
    }

    async fn try_candidate(&self, candidate: &Candidate) -> Result<Option<(CaptionFormat, String)>> {
        let body = with_timeout(self.options.timeout, &candidate.label, async {
            let response = self.client.get(&candidate.url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Network(format!("{} returned {}", candidate.label, status.as_u16())));
            }
            read_text_capped(response, self.options.max_caption_bytes).await
        })
        .await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        let parsed = parse_any(&body);
        debug!(label = %candidate.label, format = parsed.format_name(), bytes = body.len(), "payload decoded");
        match (parsed.format, parsed.text) {
            (Some(format), Some(text)) => Ok(Some((format, text))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(base_url: Option<&str>, lang: Option<&str>, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: base_url.map(String::from),
            language_code: lang.map(String::from),
            kind: kind.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_direct_candidates_come_first() {
        let t = track(
            Some("https://www.youtube.com/api/timedtext?v=abc123&lang=en&kind=asr&signature=xyz"),
            Some("en"),
            Some("asr"),
        );
        let candidates = build_candidates(&VideoId::new("abc123"), &t, &ExtractOptions::default());
        let labels: Vec<_> = candidates.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "baseUrl(default)",
                "baseUrl(fmt=vtt)",
                "baseUrl(fmt=json3)",
                "baseUrl(fmt=ttml)",
                "lang(fmt=vtt)",
                "lang(fmt=json3)",
                "lang(fmt=ttml)",
            ]
        );
        assert_eq!(candidates[0].url, t.base_url.clone().unwrap());
        assert_eq!(
            candidates[2].url,
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&kind=asr&signature=xyz&fmt=json3"
        );
        assert_eq!(
            candidates[6].url,
            "https://www.youtube.com/api/timedtext?v=abc123&lang=en&kind=asr&fmt=ttml"
        );
    }

    #[test]
    fn test_existing_format_is_replaced_in_place() {
        let base = Url::parse("https://host/api/timedtext?fmt=srv3&v=x&fmt=old").unwrap();
        let url = with_format(&base, CaptionFormat::Vtt);
        assert_eq!(url.as_str(), "https://host/api/timedtext?fmt=vtt&v=x");
    }

    #[test]
    fn test_human_track_has_no_kind() {
        let t = track(None, Some("ja"), None);
        let candidates = build_candidates(&VideoId::new("abc123"), &t, &ExtractOptions::default());
        assert_eq!(candidates.len(), 3);
        assert_eq!(
            candidates[0].url,
            "https://www.youtube.com/api/timedtext?v=abc123&lang=ja&fmt=vtt"
        );
    }

    #[test]
    fn test_language_is_url_encoded() {
        let t = track(None, Some("zh-Hant & more"), Some(""));
        let candidates = build_candidates(&VideoId::new("a b"), &t, &ExtractOptions::default());
        assert_eq!(
            candidates[0].url,
            "https://www.youtube.com/api/timedtext?v=a+b&lang=zh-Hant+%26+more&fmt=vtt"
        );
    }

    #[test]
    fn test_no_url_no_language_means_no_candidates() {
        let t = track(None, None, Some("asr"));
        assert!(build_candidates(&VideoId::new("abc123"), &t, &ExtractOptions::default()).is_empty());
    }

    #[test]
    fn test_unparseable_base_url_still_tried_once() {
        let t = track(Some("not a url"), None, None);
        let candidates = build_candidates(&VideoId::new("abc123"), &t, &ExtractOptions::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "baseUrl(default)");
    }

    #[test]
    fn test_candidates_follow_base_url_option() {
        let opts = ExtractOptions::new().base_url("http://127.0.0.1:9").unwrap();
        let t = track(None, Some("en"), None);
        let candidates = build_candidates(&VideoId::new("abc123"), &t, &opts);
        assert!(candidates.iter().all(|c| c.url.starts_with("http://127.0.0.1:9/api/timedtext?")));
    }
}
