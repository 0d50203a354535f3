//! Content acquisition for competitor URLs.
//!
//! Two backing services are tried in a fixed order with a quality gate
//! between them:
//!
//! ```text
//! URL → reader service → [≥100 chars AND pricing signal?] → done
//!                      ↘ rendering service → [same gate] → done
//!                                          ↘ best-effort reader content
//! ```
//!
//! The rendering service executes page JavaScript and is costlier and
//! rate-limited, so it is never called speculatively: only after the
//! reader result is judged insufficient. The calls are sequential by
//! design, not raced.

mod reader;
mod renderer;
mod signal;

pub use reader::{JinaReader, DEFAULT_READER_ENDPOINT};
pub use renderer::{BrowserlessRenderer, DEFAULT_RENDER_ENDPOINT};
pub use signal::PricingSignalDetector;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::{BattlecardError, Result};
use crate::normalizer::Normalizer;

/// Minimum character count for a fetch result to be considered usable.
pub const MIN_CONTENT_LENGTH: usize = 100;

/// Which backing service supplied the winning content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Reader,
    Renderer,
}

impl ContentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentOrigin::Reader => "reader",
            ContentOrigin::Renderer => "renderer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub url: Url,
    pub content: String,
    pub origin: ContentOrigin,
}

/// The lightweight plain-text reader service.
#[async_trait]
pub trait ReaderSource: Send + Sync {
    async fn fetch_text(&self, url: &Url) -> Result<String>;
}

/// The JavaScript-rendering fallback service. Returns raw HTML.
#[async_trait]
pub trait RenderSource: Send + Sync {
    async fn fetch_html(&self, url: &Url) -> Result<String>;
}

pub struct ContentFetcher {
    reader: Arc<dyn ReaderSource>,
    renderer: Arc<dyn RenderSource>,
    detector: PricingSignalDetector,
    normalizer: Normalizer,
    min_content_length: usize,
}

impl ContentFetcher {
    pub fn new(reader: Arc<dyn ReaderSource>, renderer: Arc<dyn RenderSource>) -> Self {
        Self {
            reader,
            renderer,
            detector: PricingSignalDetector::new(),
            normalizer: Normalizer::new(),
            min_content_length: MIN_CONTENT_LENGTH,
        }
    }

    /// Normalize a user-entered URL: prefix `https://` when no scheme is
    /// given, then require it to parse as a well-formed URL.
    pub fn normalize_url(input: &str) -> Result<Url> {
        let trimmed = input.trim();
        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };
        Ok(Url::parse(&candidate)?)
    }

    fn usable(&self, content: &str) -> bool {
        content.len() >= self.min_content_length
    }

    /// Fetch the textual content of a URL through the two-tier pipeline.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedContent> {
        let url = Self::normalize_url(raw_url)?;

        // Try the reader first; hold on to its error instead of raising, so
        // a failed fallback can still surface the original cause.
        let reader_result = self.reader.fetch_text(&url).await;

        if let Ok(ref content) = reader_result {
            if self.usable(content) && self.detector.has_pricing_signal(content) {
                tracing::debug!(url = %url, chars = content.len(), "reader content has pricing signal");
                return Ok(FetchedContent {
                    url,
                    content: content.clone(),
                    origin: ContentOrigin::Reader,
                });
            }
            tracing::debug!(url = %url, chars = content.len(), "reader content lacks pricing signal");
        } else if let Err(ref e) = reader_result {
            tracing::warn!(url = %url, error = %e, "reader fetch failed");
        }

        match self.renderer.fetch_html(&url).await {
            Ok(html) => {
                let text = self.normalizer.html_to_text(&html);
                if self.usable(&text) && self.detector.has_pricing_signal(&text) {
                    tracing::debug!(url = %url, chars = text.len(), "using rendered content");
                    return Ok(FetchedContent {
                        url,
                        content: text,
                        origin: ContentOrigin::Renderer,
                    });
                }
                tracing::debug!(url = %url, "rendered content lacks pricing signal");
            }
            Err(BattlecardError::FallbackNotConfigured) => {
                tracing::debug!("rendering fallback not configured, skipping");
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "rendering fallback failed");
            }
        }

        // Best effort: reader content without pricing signal beats nothing.
        match reader_result {
            Ok(content) if self.usable(&content) => Ok(FetchedContent {
                url,
                content,
                origin: ContentOrigin::Reader,
            }),
            Err(e) => Err(e),
            Ok(_) => Err(BattlecardError::NoContentExtracted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PRICED_PAGE: &str = "Plans for every team. Free forever for individuals. \
        Pro costs $10/month per seat and Business is $18/month per seat, billed annually.";
    const UNPRICED_PAGE: &str = "Plans for every team: Free, Pro, Business and Enterprise. \
        Pick the plan that fits your team and upgrade whenever you are ready to grow.";

    enum ReaderBehavior {
        Content(&'static str),
        RateLimited,
    }

    struct FakeReader {
        behavior: ReaderBehavior,
        calls: AtomicUsize,
    }

    impl FakeReader {
        fn new(behavior: ReaderBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ReaderSource for FakeReader {
        async fn fetch_text(&self, _url: &Url) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                ReaderBehavior::Content(c) => Ok(c.to_string()),
                ReaderBehavior::RateLimited => Err(BattlecardError::RateLimited),
            }
        }
    }

    enum RenderBehavior {
        Html(&'static str),
        NotConfigured,
        Unavailable,
    }

    struct FakeRenderer {
        behavior: RenderBehavior,
        calls: AtomicUsize,
    }

    impl FakeRenderer {
        fn new(behavior: RenderBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RenderSource for FakeRenderer {
        async fn fetch_html(&self, _url: &Url) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                RenderBehavior::Html(h) => Ok(h.to_string()),
                RenderBehavior::NotConfigured => Err(BattlecardError::FallbackNotConfigured),
                RenderBehavior::Unavailable => Err(BattlecardError::ServiceUnavailable(500)),
            }
        }
    }

    fn fetcher(reader: &Arc<FakeReader>, renderer: &Arc<FakeRenderer>) -> ContentFetcher {
        ContentFetcher::new(reader.clone(), renderer.clone())
    }

    #[test]
    fn test_normalize_url_prefixes_scheme() {
        let url = ContentFetcher::normalize_url("notion.so/pricing").unwrap();
        assert_eq!(url.as_str(), "https://notion.so/pricing");
    }

    #[test]
    fn test_normalize_url_keeps_existing_scheme() {
        let url = ContentFetcher::normalize_url("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_normalize_url_rejects_empty_input() {
        assert!(matches!(
            ContentFetcher::normalize_url("   "),
            Err(BattlecardError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_any_network_call() {
        let reader = FakeReader::new(ReaderBehavior::Content(PRICED_PAGE));
        let renderer = FakeRenderer::new(RenderBehavior::NotConfigured);
        let result = fetcher(&reader, &renderer).fetch("").await;

        assert!(matches!(result, Err(BattlecardError::InvalidUrl(_))));
        assert_eq!(reader.calls.load(Ordering::SeqCst), 0);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reader_with_pricing_skips_renderer() {
        let reader = FakeReader::new(ReaderBehavior::Content(PRICED_PAGE));
        let renderer = FakeRenderer::new(RenderBehavior::Html("<p>$99/month</p>"));
        let fetched = fetcher(&reader, &renderer)
            .fetch("example.com/pricing")
            .await
            .unwrap();

        assert_eq!(fetched.origin, ContentOrigin::Reader);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unpriced_reader_content_triggers_renderer() {
        let reader = FakeReader::new(ReaderBehavior::Content(UNPRICED_PAGE));
        let renderer = FakeRenderer::new(RenderBehavior::NotConfigured);
        let _ = fetcher(&reader, &renderer).fetch("example.com").await;

        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_renderer_content_preferred_when_it_has_pricing() {
        let reader = FakeReader::new(ReaderBehavior::Content(UNPRICED_PAGE));
        let renderer = FakeRenderer::new(RenderBehavior::Html(
            "<h1>Plans</h1><table><tr><td>Pro</td><td>$10/month</td></tr></table>\
             <p>Everything you need to run your team in one place, from shared docs \
             and wikis to dashboards, automations and beyond.</p>",
        ));
        let fetched = fetcher(&reader, &renderer)
            .fetch("example.com")
            .await
            .unwrap();

        assert_eq!(fetched.origin, ContentOrigin::Renderer);
        assert!(fetched.content.contains("$10/month"));
    }

    #[tokio::test]
    async fn test_unconfigured_renderer_falls_back_to_reader_content() {
        let reader = FakeReader::new(ReaderBehavior::Content(UNPRICED_PAGE));
        let renderer = FakeRenderer::new(RenderBehavior::NotConfigured);
        let fetched = fetcher(&reader, &renderer)
            .fetch("example.com")
            .await
            .unwrap();

        assert_eq!(fetched.origin, ContentOrigin::Reader);
        assert_eq!(fetched.content, UNPRICED_PAGE);
    }

    #[tokio::test]
    async fn test_failing_renderer_falls_back_to_reader_content() {
        let reader = FakeReader::new(ReaderBehavior::Content(UNPRICED_PAGE));
        let renderer = FakeRenderer::new(RenderBehavior::Unavailable);
        let fetched = fetcher(&reader, &renderer)
            .fetch("example.com")
            .await
            .unwrap();

        assert_eq!(fetched.origin, ContentOrigin::Reader);
    }

    #[tokio::test]
    async fn test_reader_error_surfaces_when_both_exhausted() {
        let reader = FakeReader::new(ReaderBehavior::RateLimited);
        let renderer = FakeRenderer::new(RenderBehavior::NotConfigured);
        let result = fetcher(&reader, &renderer).fetch("example.com").await;

        assert!(matches!(result, Err(BattlecardError::RateLimited)));
    }

    #[tokio::test]
    async fn test_short_content_everywhere_is_no_content() {
        let reader = FakeReader::new(ReaderBehavior::Content("Pricing"));
        let renderer = FakeRenderer::new(RenderBehavior::Html("<p>Plans</p>"));
        let result = fetcher(&reader, &renderer).fetch("example.com").await;

        assert!(matches!(result, Err(BattlecardError::NoContentExtracted)));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }
}
