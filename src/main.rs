// This is a CLI binary, not a library:
// - print_stdout/print_stderr: the stats report and fatal diagnostics go to the terminal.
// - exit: a non-zero status signals failure to the shell.
#![allow(clippy::print_stdout, clippy::print_stderr, clippy::exit)]

use anyhow::Context;
use iso_date_dedup::{Config, ReportFormat, pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iso_date_dedup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let stats = pipeline::run_files(&config)?;

    match config.report_format {
        ReportFormat::Text => print!("{stats}"),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&stats).context("serializing stats")?;
            println!("{json}");
        }
    }
    Ok(())
}
