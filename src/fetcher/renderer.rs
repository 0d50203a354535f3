use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{BattlecardError, Result};
use crate::fetcher::RenderSource;

/// Default endpoint of the JavaScript-rendering content service. Unlike the
/// reader service it executes page scripts before returning HTML, which is
/// what recovers prices injected client-side. It is heavier and
/// rate-limited, so the fetch pipeline only calls it when the reader result
/// fails the pricing-signal gate.
pub const DEFAULT_RENDER_ENDPOINT: &str = "https://chrome.browserless.io/content";

pub struct BrowserlessRenderer {
    client: Client,
    endpoint: String,
    token: Option<String>,
    wait_for_ms: u64,
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
    #[serde(rename = "waitFor")]
    wait_for: u64,
}

#[derive(Deserialize)]
struct RenderErrorBody {
    error: Option<String>,
}

impl BrowserlessRenderer {
    pub fn new(endpoint: String, token: Option<String>, wait_for_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .brotli(true)
            .user_agent("battlecard/0.1.0")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint,
            token,
            wait_for_ms,
        }
    }
}

#[async_trait]
impl RenderSource for BrowserlessRenderer {
    async fn fetch_html(&self, url: &Url) -> Result<String> {
        // The credential stays server-side in the original deployment; here
        // it lives in config. Without one, rendering is simply unavailable.
        let token = self
            .token
            .as_deref()
            .ok_or(BattlecardError::FallbackNotConfigured)?;

        let request_url = format!("{}?token={}", self.endpoint, token);
        let body = RenderRequest {
            url: url.as_str(),
            wait_for: self.wait_for_ms,
        };

        let response = self.client.post(&request_url).json(&body).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BattlecardError::InvalidCredential);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BattlecardError::ServiceUnavailable(status.as_u16()));
        }
        if !status.is_success() {
            let detail = response
                .json::<RenderErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error);
            tracing::warn!(
                status = status.as_u16(),
                error = detail.as_deref().unwrap_or("<none>"),
                "rendering service returned an error"
            );
            return Err(BattlecardError::ServiceUnavailable(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
