use std::future::Future;
use std::time::Duration;

use futures_util::StreamExt;

use crate::error::{Error, Result};

/// Run `fut` with an upper bound; on expiry the future is dropped, which aborts
/// the in-flight request.
pub(crate) async fn with_timeout<T, F>(limit: Duration, label: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            label: label.to_string(),
            after: limit,
        }),
    }
}

/// Read a response body as UTF-8 (lossy), refusing bodies larger than `max_bytes`.
pub(crate) async fn read_text_capped(response: reqwest::Response, max_bytes: usize) -> Result<String> {
    if let Some(len) = response.content_length() {
        if len as usize > max_bytes {
            return Err(Error::Network(format!(
                "response too large ({len} bytes, limit {max_bytes})"
            )));
        }
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > max_bytes {
            return Err(Error::Network(format!(
                "response exceeded {max_bytes} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let value = with_timeout(Duration::from_secs(1), "quick", async { Ok(7) }).await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: Result<()> = with_timeout(Duration::from_millis(10), "slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        match result {
            Err(Error::Timeout { label, after }) => {
                assert_eq!(label, "slow");
                assert_eq!(after, Duration::from_millis(10));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_with_timeout_keeps_inner_error() {
        let result: Result<()> = with_timeout(Duration::from_secs(1), "failing", async {
            Err(Error::Network("boom".into()))
        })
        .await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
