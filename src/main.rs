//! Fairway binary — one pipeline per invocation.
//!
//! `fairway refresh` walks the portal and replaces stored results,
//! `fairway clubs` crawls the club directory, `fairway roster <file>`
//! replaces the tracked-player set. Credentials come from the environment
//! (`GOLF_USER` / `GOLF_PASSWORD`).

use std::process::ExitCode;

use fairway::config::Config;
use fairway::pipeline;

fn print_usage() {
    eprintln!("Usage: fairway [refresh | clubs | roster <players.json>]");
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let command = args.first().map(String::as_str).unwrap_or("refresh");
    let outcome = match command {
        "refresh" => pipeline::refresh(&config).await.map(|summary| {
            log::info!(
                "{} players refreshed ({} failed), {} results stored",
                summary.players - summary.players_failed,
                summary.players_failed,
                summary.results_inserted
            );
        }),
        "clubs" => pipeline::build_directory(&config).await.map(|summary| {
            log::info!(
                "{} IDs scanned, {} clubs added to the directory",
                summary.scanned,
                summary.inserted
            );
        }),
        "roster" => match args.get(1) {
            Some(path) => pipeline::import_roster(&config, path.as_ref()).map(|count| {
                log::info!("Roster now tracks {} players", count);
            }),
            None => {
                print_usage();
                return ExitCode::FAILURE;
            }
        },
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
