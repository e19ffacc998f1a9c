//! `stockledger` — run stock reconciliations over JSON files.
//!
//! Usage: `stockledger <COMMAND> <INPUT.json>`
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::Path;
use std::process::ExitCode;
use std::{env, fs};

use anyhow::{Context, anyhow};

use stockledger_core::ReconciliationSettings;

mod commands;

use commands::Command;

fn main() -> ExitCode {
    stockledger_observability::init();

    let mut args = env::args().skip(1);
    let command = args.next();
    let input = args.next();

    let command = match command.as_deref() {
        Some("help") | Some("--help") | None => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Some(name) => match Command::parse(name) {
            Some(command) => command,
            None => {
                eprintln!("Unknown command: {name}");
                eprintln!();
                print_help();
                return ExitCode::FAILURE;
            }
        },
    };

    match run(command, input.as_deref()) {
        Ok(report) => {
            println!("{}", report.body);
            if report.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            tracing::error!(error = ?e, "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, input: Option<&str>) -> anyhow::Result<commands::Report> {
    let path = input.ok_or_else(|| anyhow!("missing input file for `{}`", command.name()))?;
    let raw = read_input(Path::new(path))?;
    let settings = ReconciliationSettings::from_env();

    tracing::info!(command = command.name(), input = path, "running reconciliation");
    command.execute(&settings, &raw)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_help() {
    println!("stockledger - inventory reconciliation");
    println!();
    println!("USAGE:");
    println!("    stockledger <COMMAND> <INPUT.json>");
    println!();
    println!("COMMANDS:");
    println!("    classify      Combine catalog + stock records and classify stock levels");
    println!("    receipt       Validate a goods receipt and list accepted quantities");
    println!("    stock-check   Validate and evaluate a batch stock check");
    println!("    dispose       Validate a disposal request (shape + available stock)");
    println!("    aggregate     Regroup ledger movements into documents");
    println!();
    println!("ENVIRONMENT:");
    println!("    STOCKLEDGER_OVERSTOCK_RATIO    Overstock fraction of max stock (default 0.9)");
    println!("    STOCKLEDGER_MIN_DISPOSAL_QTY   Smallest disposal quantity (default 0.001)");
    println!("    STOCKLEDGER_LOG_FORMAT         json (default) or pretty");
    println!("    RUST_LOG                       Log filter (default info)");
}
