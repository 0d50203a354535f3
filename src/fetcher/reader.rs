use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::app::{BattlecardError, Result};
use crate::fetcher::ReaderSource;

/// Default endpoint of the lightweight reader service. It fetches the
/// target URL server-side and returns a readable plain-text rendition,
/// without executing page JavaScript.
pub const DEFAULT_READER_ENDPOINT: &str = "https://r.jina.ai/";

pub struct JinaReader {
    client: Client,
    endpoint: String,
}

impl JinaReader {
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent("battlecard/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self { client, endpoint }
    }
}

impl Default for JinaReader {
    fn default() -> Self {
        Self::new(DEFAULT_READER_ENDPOINT.to_string(), 10)
    }
}

#[async_trait]
impl ReaderSource for JinaReader {
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let reader_url = format!("{}{}", self.endpoint, url);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));

        let response = self
            .client
            .get(&reader_url)
            .headers(headers)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(BattlecardError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(BattlecardError::ServiceUnavailable(
                response.status().as_u16(),
            ));
        }

        Ok(response.text().await?)
    }
}
