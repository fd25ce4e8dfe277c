//! Command-line arguments.

use apiprobe_domain::{Environment, Tag};
use clap::Parser;

/// Functional and performance checks against public sandbox APIs.
#[derive(Debug, Parser)]
#[command(name = "apiprobe", version, about)]
pub struct Cli {
    /// Target environment (dev, staging, prod). Overrides `TEST_ENV`.
    #[arg(long)]
    pub env: Option<Environment>,

    /// Only run cases carrying this tag (smoke, regression, performance).
    #[arg(long)]
    pub tag: Option<Tag>,

    /// Bearer token for the user management service. Overrides `GOREST_TOKEN`.
    #[arg(long, value_name = "TOKEN")]
    pub gorest_token: Option<String>,

    /// Only run the listed case ids. Repeatable.
    #[arg(long = "case", value_name = "ID")]
    pub cases: Vec<String>,

    /// Number of cases run concurrently. Overrides `PARALLEL_WORKERS`.
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Print the selected cases without running them.
    #[arg(long)]
    pub list: bool,
}
