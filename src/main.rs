use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::HumanDuration;
use log::{debug, info};

use xcomp::cli::Cli;
use xcomp::config::{FileConfig, Options};
use xcomp::{Outcome, logging, signal};

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();

    match try_main(&cli) {
        Ok(outcome) => {
            info!(
                "Completed in {} ({:?})",
                HumanDuration(start_time.elapsed()),
                outcome
            );
            match outcome {
                Outcome::Redundant => ExitCode::SUCCESS,
                Outcome::NotRedundant => ExitCode::FAILURE,
            }
        }
        Err(err) => {
            eprintln!("xcomp: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<Outcome> {
    logging::init_logging(cli.log_level.into(), cli.log_file.as_deref())?;
    debug!("Command line arguments: {:?}", cli);

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let options = Options::from_cli(cli, file_config, io::stdout().is_terminal());

    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the hashing thread pool")?;
    }
    signal::install_handler()?;

    let outcome = xcomp::run(&options, io::stdout().lock())?;
    Ok(outcome)
}
