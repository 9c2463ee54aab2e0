//! duplexcat - Merge a directory of PDFs into one duplex-ready document.

mod cli;

use clap::Parser;
use std::process;

use crate::cli::Cli;
use duplexcat::error::DuplexcatError;
use duplexcat::merge::Merger;
use duplexcat::output::{OutputFormatter, display_plan, display_summary};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the logger. `RUST_LOG` overrides the level picked from the flags.
fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), DuplexcatError> {
    let config = cli.to_config()?;

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    formatter.debug(&format!("{} v{}", duplexcat::NAME, duplexcat::VERSION));
    formatter.debug(&format!("Merging PDFs in {}", config.input_dir.display()));

    let outcome = Merger::new().merge_to_file(&config).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome.report)
            .map_err(|e| DuplexcatError::other(format!("Failed to encode report: {e}")))?;
        println!("{json}");
    }

    match (&outcome.statistics, &outcome.write) {
        (Some(stats), Some(write)) => {
            display_summary(&formatter, &outcome.report, stats, write);
            formatter.detail(
                "Write time",
                &format!("{:.2}s", write.write_time.as_secs_f64()),
            );
        }
        _ => display_plan(&formatter, &outcome.report, &config.output),
    }

    Ok(())
}
