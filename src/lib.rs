//! # Battlecard
//!
//! Competitive-intelligence battlecards from the terminal: fetch a
//! competitor's page, extract a structured record through an LLM, score
//! how complete it is, diff it against the previous analysis, keep it in
//! SQLite.
//!
//! ## Architecture
//!
//! ```text
//! URL/paste → Fetcher → Normalizer → Extractor → Analyzer → Store → CLI
//! ```
//!
//! Content acquisition is a two-tier fallback: a lightweight reader
//! service first, then a JavaScript-rendering service when the reader
//! result carries no pricing signal. See [`fetcher`] for the gating rules.
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration with env-credential overrides
//! - [`domain`]: Competitor record model and share encoding
//! - [`normalizer`]: HTML-to-text reduction
//! - [`fetcher`]: Two-tier content acquisition with pricing-signal gating
//! - [`extractor`]: LLM extraction, SWOT and talking-points generation
//! - [`analyzer`]: Confidence scoring and trend diffing
//! - [`store`]: SQLite persistence

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all
/// components: store, fetcher, extractor, config.
pub mod app;

/// Derived views over records: the confidence rubric and the trend/diff
/// engine. Pure functions, no I/O.
pub mod analyzer;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/battlecard/config.toml`; `ANTHROPIC_API_KEY` and
/// `BROWSERLESS_TOKEN` override file credentials.
pub mod config;

/// Core domain model.
///
/// - [`CompetitorAnalysis`](domain::CompetitorAnalysis): the structured record
/// - [`PricingTier`](domain::PricingTier), [`Swot`](domain::Swot), ...
/// - [`share`](domain::share): compact share token encoding
pub mod domain;

/// LLM extraction client and generators.
///
/// - [`Extractor`](extractor::Extractor): async trait over the messages API
/// - [`AnthropicExtractor`](extractor::AnthropicExtractor): reqwest implementation
/// - [`generate_extras`](extractor::generate_extras): SWOT + talking points fan-out
pub mod extractor;

/// Content acquisition.
///
/// - [`ContentFetcher`](fetcher::ContentFetcher): two-tier fetch pipeline
/// - [`PricingSignalDetector`](fetcher::PricingSignalDetector): numeric-pricing heuristic
pub mod fetcher;

/// HTML-to-text normalization without an HTML parser dependency.
pub mod normalizer;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
