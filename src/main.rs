//! osupdate: OS software-update client core
//!
//! Entry point for the osupdate application.

use osupdate::config::{Cli, Command, HashDumpArgs, Settings};
use osupdate::hashdump::{self, HashDumpError, ProcMountInfo, Sha256Hasher};
use osupdate::timing::TimingStack;
use std::process::ExitCode;

mod app;

use app::{exit_code, print_config_hint, print_info, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    let mut timing = TimingStack::new();
    if cli.time {
        timing.enable();
    }

    let code = match &cli.command {
        Command::Info { json } => handle_info(&cli, *json, &mut timing),
        Command::HashDump(args) => handle_hashdump(args, &mut timing),
    };

    let report = timing.report_and_drain();
    if !report.is_empty() {
        eprint!("{report}");
    }

    code
}

/// Handles the `info` subcommand.
fn handle_info(cli: &Cli, json: bool, timing: &mut TimingStack) -> ExitCode {
    let mut settings = Settings::new();

    timing.start("resolve configuration");
    let resolved = cli
        .apply_overrides(&mut settings)
        .and_then(|()| settings.init());
    timing.stop();

    if let Err(e) = resolved {
        eprintln!("Configuration error: {e}");
        print_config_hint(&e);
        return exit_code::CONFIG_ERROR;
    }
    tracing::debug!("{settings}");

    if !json {
        print_info(&settings);
        return exit_code::SUCCESS;
    }

    match serde_json::to_string_pretty(&settings.snapshot()) {
        Ok(text) => {
            println!("{text}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Handles the `hashdump` subcommand.
fn handle_hashdump(args: &HashDumpArgs, timing: &mut TimingStack) -> ExitCode {
    let mut settings = Settings::new();

    timing.start("hashdump");
    let result = hashdump::run(args, &mut settings, &Sha256Hasher, &ProcMountInfo::new());
    timing.stop();

    match result {
        Ok(dump) => {
            println!("{}", dump.hash);
            if dump.mounted {
                eprintln!("!! dumped hash might not match a manifest hash because a mount is active");
            }
            exit_code::SUCCESS
        }
        Err(e @ (HashDumpError::InvalidPath(_) | HashDumpError::Config(_))) => {
            eprintln!("{e}");
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            eprintln!("{e}");
            exit_code::runtime_error()
        }
    }
}
