pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::OutcomeResult;

#[derive(Parser)]
#[command(name = "battlecard")]
#[command(about = "Competitor battlecards from the terminal", long_about = None)]
pub struct Cli {
    /// Use an alternate database file
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and analyze a competitor page by URL
    Analyze {
        /// URL of the pricing or product page
        url: String,

        /// Skip SWOT and talking-points generation
        #[arg(long)]
        skip_extras: bool,
    },
    /// Analyze pasted content from a file (or stdin)
    Paste {
        /// Path to a text file; reads stdin when omitted
        file: Option<std::path::PathBuf>,

        /// Skip SWOT and talking-points generation
        #[arg(long)]
        skip_extras: bool,
    },
    /// Analyze a list of URLs, one per line
    Batch {
        /// Path to a file of URLs
        file: std::path::PathBuf,
    },
    /// List saved competitors
    List,
    /// Show a saved competitor record
    Show {
        /// Company name (case-insensitive)
        company: String,
    },
    /// Remove a saved competitor
    Remove {
        /// Company name (case-insensitive)
        company: String,
    },
    /// Record a win/loss outcome against a competitor
    Outcome {
        /// Company name (case-insensitive)
        company: String,

        #[arg(value_enum)]
        result: OutcomeArg,
    },
    /// Print a shareable token for a saved analysis
    Share {
        /// Company name (case-insensitive)
        company: String,
    },
    /// Import an analysis from a share token
    Import {
        /// Token produced by `battlecard share`
        token: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutcomeArg {
    Win,
    Loss,
    Pending,
}

impl From<OutcomeArg> for OutcomeResult {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Win => OutcomeResult::Win,
            OutcomeArg::Loss => OutcomeResult::Loss,
            OutcomeArg::Pending => OutcomeResult::Pending,
        }
    }
}
