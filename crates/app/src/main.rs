//! apiprobe - Main Entry Point
//!
//! Loads settings, installs tracing, wires the client to the reqwest
//! transport and runs the selected live suites.

mod cli;
mod runner;
mod suites;

use std::process::ExitCode;
use std::sync::Arc;

use apiprobe_application::{ApiClient, ApiLogger};
use apiprobe_infrastructure::{
    LogSettings, ReqwestTransport, TracingEventSink, init_tracing, load_settings,
};
use clap::Parser;

use crate::cli::Cli;
use crate::runner::SuiteRunner;
use crate::suites::SuiteContext;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_settings()?;
    init_tracing(&LogSettings::from(&loaded.settings))?;
    if cli.env.is_none() {
        loaded.log_fallbacks();
    }

    let mut settings = loaded.settings.with_token_override(cli.gorest_token);
    if let Some(environment) = cli.env {
        settings.environment = environment;
    }
    tracing::info!(
        environment = %settings.environment,
        token = settings.token().is_some(),
        "Settings loaded"
    );

    let cases = runner::select(suites::all(), cli.tag, &cli.cases);
    if cli.list {
        list(&cases);
        return Ok(ExitCode::SUCCESS);
    }

    let logger = Arc::new(ApiLogger::new(Arc::new(TracingEventSink::new())));
    let transport = Arc::new(ReqwestTransport::new()?);
    let client = ApiClient::from_settings(transport, logger, &settings);
    let ctx = SuiteContext::new(client, settings);

    let mut suite = SuiteRunner::new(&ctx);
    if let Some(workers) = cli.workers {
        suite = suite.with_workers(workers);
    }
    let results = suite.run(&cases).await;
    runner::print_results(&results);

    Ok(if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[allow(clippy::print_stdout)]
fn list(cases: &[suites::TestCase]) {
    for case in cases {
        let tags: Vec<_> = case.meta.tags.iter().map(|t| t.as_str()).collect();
        println!(
            "{:<12} {:<18} [{}] {}",
            case.meta.id,
            case.service.as_str(),
            tags.join(", "),
            case.meta.title
        );
    }
}
