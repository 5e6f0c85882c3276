//! prsweep CLI entrypoint for pull request reports.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prsweep::telemetry::init_logging;
use prsweep::{SweepConfig, SweepError};

mod cli;

const USAGE_HINT: &str = "run `prsweep --help` for the full list of options";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let mut stderr = io::stderr().lock();
            if writeln!(stderr, "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            if matches!(error, SweepError::MissingOptions { .. })
                && writeln!(stderr, "{USAGE_HINT}").is_err()
            {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SweepError> {
    let config = load_config()?;
    init_logging(config.verbose);
    config.validate()?;
    config.missing_options()?;

    let mut stdout = io::stdout().lock();
    cli::run(&config, &mut stdout).await?;
    stdout.flush().map_err(|error| SweepError::Io {
        message: error.to_string(),
    })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`SweepError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<SweepConfig, SweepError> {
    SweepConfig::load().map_err(|error| SweepError::Configuration {
        message: error.to_string(),
    })
}
