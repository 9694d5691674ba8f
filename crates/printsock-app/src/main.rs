// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printsock — serve a local USB receipt printer on TCP port 9100.
//
// Entry point. Parses arguments, initialises logging and dispatches to the
// selected command.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use printsock_core::human_errors::humanize_error;

use cli::Cli;
use commands::Outcome;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!(?cli, "printsock starting");

    match commands::run(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Unhealthy) => ExitCode::FAILURE,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            let human = humanize_error(&e);
            eprintln!("error: {e}");
            eprintln!("{} {}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so prompts and unit listings on stdout stay clean.
/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}
