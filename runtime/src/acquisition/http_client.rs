//! Async HTTP client wrapping reqwest.
//!
//! Not a browser — just single GET requests with a bounded timeout and a
//! desktop Chrome user-agent. There is no retry: a failed request degrades
//! the station it was for.

use ionian_wx::{ScrapeError, ScrapeResult};
use std::time::Duration;

/// User-agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/126.0.0.0 Safari/537.36";

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body, or an [`ScrapeError::HttpStatus`] for a non-2xx response.
    pub fn into_success_body(self) -> ScrapeResult<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ScrapeError::HttpStatus {
                url: self.url,
                status: self.status,
            })
        }
    }
}

/// HTTP client shared by the static and JSON sources.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with the browser user-agent.
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: build_client(timeout_ms, USER_AGENT),
        }
    }

    /// Single GET, body decoded as UTF-8 unless the server declares a charset.
    pub async fn get(&self, url: &str, timeout_ms: u64) -> ScrapeResult<HttpResponse> {
        self.get_with_charset(url, timeout_ms, "utf-8").await
    }

    /// Single GET. The body is decoded with the charset from `Content-Type`,
    /// or `default_charset` when the server does not send one.
    pub async fn get_with_charset(
        &self,
        url: &str,
        timeout_ms: u64,
        default_charset: &str,
    ) -> ScrapeResult<HttpResponse> {
        let r = self
            .client
            .get(url)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(network_error)?;

        let status = r.status().as_u16();
        let body = r
            .text_with_charset(default_charset)
            .await
            .map_err(network_error)?;

        tracing::debug!("GET {url} -> {status} ({} bytes)", body.len());

        Ok(HttpResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}

fn build_client(timeout_ms: u64, user_agent: &str) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .redirect(reqwest::redirect::Policy::limited(5))
        .user_agent(user_agent)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("failed to build HTTP client ({e}); using reqwest defaults");
            reqwest::Client::default()
        }
    }
}

fn network_error(e: reqwest::Error) -> ScrapeError {
    if e.is_timeout() {
        ScrapeError::Network(format!("timed out: {e}"))
    } else {
        ScrapeError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new(10000);
        // Just verify it doesn't panic
        let _ = client;
    }

    #[test]
    #[traced_test]
    fn test_builder_failure_falls_back_with_warning() {
        let _client = build_client(1000, "bad\nagent");
        assert!(logs_contain("failed to build HTTP client"));
    }

    #[test]
    fn test_non_success_maps_to_status_error() {
        let resp = HttpResponse {
            url: "https://example.com/x".to_string(),
            status: 404,
            body: String::new(),
        };
        assert!(!resp.is_success());
        assert_eq!(
            resp.into_success_body(),
            Err(ScrapeError::HttpStatus {
                url: "https://example.com/x".to_string(),
                status: 404
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = HttpClient::new(2000);
        let err = client
            .get(&format!("http://{addr}/"), 2000)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Network(_)));
    }
}
