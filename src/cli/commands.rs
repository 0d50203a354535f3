use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::analyzer::{compare_analyses, confidence_score, TrendReport};
use crate::app::{AppContext, BattlecardError, Result};
use crate::domain::share::{decode_shared, encode_for_share};
use crate::domain::{AnalysisSource, CompetitorAnalysis, Outcome, OutcomeResult};
use crate::extractor::generate_extras;
use crate::store::Store;

pub async fn analyze_url(ctx: &AppContext, url: &str, skip_extras: bool) -> Result<()> {
    let fetched = ctx.fetcher.fetch(url).await?;
    println!(
        "Fetched {} chars from {} (via {})",
        fetched.content.len(),
        fetched.url,
        fetched.origin.as_str()
    );

    let source = AnalysisSource::Url {
        url: fetched.url.to_string(),
    };
    run_analysis(ctx, fetched.content, source, skip_extras).await
}

pub async fn analyze_paste(
    ctx: &AppContext,
    file: Option<&Path>,
    skip_extras: bool,
) -> Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    if content.trim().is_empty() {
        return Err(BattlecardError::Other("No content to analyze".into()));
    }

    run_analysis(ctx, content, AnalysisSource::Paste, skip_extras).await
}

async fn run_analysis(
    ctx: &AppContext,
    content: String,
    source: AnalysisSource,
    skip_extras: bool,
) -> Result<()> {
    let extractor = ctx.extractor()?;

    let profile = match extractor.extract(&content).await {
        Ok(profile) => profile,
        Err(e @ BattlecardError::ExtractionParse(_)) => {
            // Root cause goes to the log; the user just needs to retry.
            tracing::error!(error = %e, "extraction failed");
            return Err(BattlecardError::Other(
                "Analysis failed. Please try again.".into(),
            ));
        }
        Err(e) => return Err(e),
    };
    let analysis = CompetitorAnalysis::from_profile(profile, source, content);

    // Trend comparison runs against the previously-saved record of the
    // same company, when there is one.
    if let Some(previous) = ctx.store.get_by_company(&analysis.company_name)? {
        let report = compare_analyses(&previous, &analysis);
        if report.has_changes {
            print_trend(&report, &previous);
        }
    }

    let from_url = analysis.source.url().is_some();
    let sparse_pricing = !analysis.pricing.tiers.iter().any(|t| {
        t.is_priced()
            && !t
                .price
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains("contact")
    });

    let saved = ctx.store.save(analysis)?;
    let confidence = confidence_score(&saved);

    println!("Analyzed {}", saved.company_name);
    println!(
        "Confidence: {}/100 ({})",
        confidence.score,
        confidence.level.label()
    );
    if from_url && sparse_pricing {
        println!(
            "Pricing data may be incomplete. Try `battlecard paste` with copied page content."
        );
    }

    if !skip_extras {
        println!("Generating SWOT and talking points...");
        let (swot, talking_points) =
            generate_extras(extractor.as_ref(), &saved, &ctx.config.company).await;

        // Updates are keyed by the saved record's id, never by whatever
        // is "current".
        if let Some(ref swot) = swot {
            ctx.store.set_swot(&saved.id, swot)?;
        }
        if let Some(ref talking_points) = talking_points {
            ctx.store.set_talking_points(&saved.id, talking_points)?;
        }
        match (swot, talking_points) {
            (Some(_), Some(_)) => println!("SWOT and talking points saved"),
            (Some(_), None) => println!("SWOT saved; talking points generation failed"),
            (None, Some(_)) => println!("Talking points saved; SWOT generation failed"),
            (None, None) => println!("SWOT and talking points generation failed"),
        }
    }

    println!("Saved {} ({})", saved.company_name, &saved.id[..8]);
    Ok(())
}

/// Analyze a file of URLs, one per line. URLs are processed sequentially so
/// Ctrl-C can take effect between items; in-flight work finishes first.
pub async fn analyze_batch(ctx: &AppContext, file: &Path) -> Result<()> {
    let urls = read_url_lines(&std::fs::read_to_string(file)?);
    if urls.is_empty() {
        println!("No URLs found in {}", file.display());
        return Ok(());
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = cancelled.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancelled.store(true, Ordering::SeqCst);
            }
        });
    }

    println!("Analyzing {} URLs (Ctrl-C to stop)...", urls.len());

    let mut analyzed = 0;
    let mut failed = Vec::new();

    for (i, url) in urls.iter().enumerate() {
        if cancelled.load(Ordering::SeqCst) {
            println!(
                "Batch cancelled. Analyzed {} of {} URLs.",
                analyzed,
                urls.len()
            );
            break;
        }

        println!("[{}/{}] {}", i + 1, urls.len(), url);
        match analyze_url(ctx, url, true).await {
            Ok(()) => analyzed += 1,
            Err(e) => {
                eprintln!("  ! {}: {}", url, e);
                failed.push(url.clone());
            }
        }
    }

    println!("Batch complete: {} analyzed, {} failed", analyzed, failed.len());
    if !failed.is_empty() {
        println!("Failed URLs:");
        for url in &failed {
            println!("  {}", url);
        }
        println!("Retry them with another `battlecard batch` run.");
    }

    Ok(())
}

pub fn list_competitors(ctx: &AppContext) -> Result<()> {
    let competitors = ctx.store.get_all()?;

    if competitors.is_empty() {
        println!("No saved competitors");
        return Ok(());
    }

    for analysis in competitors {
        let confidence = confidence_score(&analysis);
        let tiers = analysis.pricing.tiers.len();
        println!(
            "{} ({} tier{}, confidence {}/100)\n  analyzed {}",
            analysis.company_name,
            tiers,
            if tiers == 1 { "" } else { "s" },
            confidence.score,
            analysis.analyzed_at.format("%Y-%m-%d"),
        );
    }

    Ok(())
}

pub fn show_competitor(ctx: &AppContext, company: &str) -> Result<()> {
    let analysis = ctx
        .store
        .get_by_company(company)?
        .ok_or_else(|| BattlecardError::CompetitorNotFound(company.to_string()))?;

    let confidence = confidence_score(&analysis);
    println!("{}", analysis.company_name);
    if let Some(tagline) = &analysis.positioning.tagline {
        println!("  \"{}\"", tagline);
    }
    println!(
        "  analyzed {} from {}",
        analysis.analyzed_at.format("%Y-%m-%d %H:%M"),
        analysis.source.url().unwrap_or("pasted content"),
    );
    println!(
        "  confidence {}/100 ({})",
        confidence.score,
        confidence.level.label()
    );

    if !analysis.pricing.tiers.is_empty() {
        println!("\nPricing:");
        for tier in &analysis.pricing.tiers {
            let price = tier.price.as_deref().unwrap_or("-");
            match &tier.billing_period {
                Some(period) => println!("  {} {} {}", tier.name, price, period),
                None => println!("  {} {}", tier.name, price),
            }
        }
        if analysis.pricing.trial_available {
            match &analysis.pricing.trial_duration {
                Some(d) => println!("  trial: {}", d),
                None => println!("  trial available"),
            }
        }
    }

    if !analysis.positioning.differentiators.is_empty() {
        println!("\nDifferentiators:");
        for diff in &analysis.positioning.differentiators {
            println!("  - {}", diff);
        }
    }

    if !analysis.features.highlighted.is_empty() {
        println!("\nHighlighted features:");
        for feature in &analysis.features.highlighted {
            println!("  - {}", feature);
        }
    }

    if !analysis.social_proof.customer_logos.is_empty() {
        println!("\nCustomers: {}", analysis.social_proof.customer_logos.join(", "));
    }
    if !analysis.social_proof.metrics_claimed.is_empty() {
        println!("Claims: {}", analysis.social_proof.metrics_claimed.join("; "));
    }

    if let Some(swot) = &analysis.swot {
        if let Some(summary) = &swot.summary {
            println!("\nSWOT: {}", summary);
        }
    }

    if !analysis.price_history.is_empty() {
        println!("\nPrice history: {} earlier snapshot(s)", analysis.price_history.len());
        for snapshot in &analysis.price_history {
            let prices: Vec<String> = snapshot
                .tiers
                .iter()
                .map(|t| format!("{} {}", t.name, t.price.as_deref().unwrap_or("-")))
                .collect();
            println!("  {}: {}", snapshot.date.format("%Y-%m-%d"), prices.join(", "));
        }
    }

    if !analysis.outcomes.is_empty() {
        let wins = analysis
            .outcomes
            .iter()
            .filter(|o| o.result == OutcomeResult::Win)
            .count();
        let losses = analysis
            .outcomes
            .iter()
            .filter(|o| o.result == OutcomeResult::Loss)
            .count();
        println!(
            "\nOutcomes: {} win{}, {} loss{}",
            wins,
            if wins == 1 { "" } else { "s" },
            losses,
            if losses == 1 { "" } else { "es" },
        );
    }

    Ok(())
}

pub fn remove_competitor(ctx: &AppContext, company: &str) -> Result<()> {
    let analysis = ctx
        .store
        .get_by_company(company)?
        .ok_or_else(|| BattlecardError::CompetitorNotFound(company.to_string()))?;

    ctx.store.delete(&analysis.id)?;
    println!("Removed {}", analysis.company_name);
    Ok(())
}

pub fn record_outcome(ctx: &AppContext, company: &str, result: OutcomeResult) -> Result<()> {
    let analysis = ctx
        .store
        .get_by_company(company)?
        .ok_or_else(|| BattlecardError::CompetitorNotFound(company.to_string()))?;

    let date = Utc::now();
    let mut hasher = Sha256::new();
    hasher.update(analysis.id.as_bytes());
    hasher.update(date.to_rfc3339().as_bytes());
    let outcome = Outcome {
        id: hex::encode(&hasher.finalize()[..8]),
        result,
        date,
    };

    ctx.store.add_outcome(&analysis.id, &outcome)?;
    println!("Recorded {:?} against {}", result, analysis.company_name);
    Ok(())
}

pub fn share_competitor(ctx: &AppContext, company: &str) -> Result<()> {
    let analysis = ctx
        .store
        .get_by_company(company)?
        .ok_or_else(|| BattlecardError::CompetitorNotFound(company.to_string()))?;

    println!("{}", encode_for_share(&analysis)?);
    Ok(())
}

pub fn import_shared(ctx: &AppContext, token: &str) -> Result<()> {
    let analysis = decode_shared(token)?;
    let saved = ctx.store.save(analysis)?;
    println!("Imported shared analysis for {}", saved.company_name);
    Ok(())
}

fn print_trend(report: &TrendReport, previous: &CompetitorAnalysis) {
    println!(
        "Changes since {} ({}):",
        previous.analyzed_at.format("%Y-%m-%d"),
        report.summary
    );
    for change in &report.changes {
        let subject = change
            .tier
            .as_deref()
            .or(change.new_value.as_deref())
            .or(change.old_value.as_deref())
            .unwrap_or("-");
        match (&change.old_value, &change.new_value) {
            (Some(old), Some(new)) => {
                println!("  {:?} {}: {} -> {}", change.kind, subject, old, new)
            }
            _ => println!("  {:?} {}", change.kind, subject),
        }
    }
}

fn read_url_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}
