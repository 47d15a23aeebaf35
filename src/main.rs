//! lettuce-park - A first-person exploration and crafting game core
//!
//! Headless runner: builds the default park, drives it from a command
//! script, and writes session events to a JSONL log.

mod command_script;
mod commands;
mod config;
mod headless;

use anyhow::Result;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting lettuce-park v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let session = config::load_session_config(cli.config.as_deref());

    let summary = headless::run(headless::HeadlessConfig {
        session,
        command_script: cli.command_script,
        seed: cli.seed,
        event_log: cli.event_log,
        max_ticks: cli.max_ticks,
        dt: cli.dt,
    })?;

    println!("{}", serde_json::to_string_pretty(&summary.snapshot)?);
    info!(
        ticks = summary.ticks,
        events = summary.events,
        "lettuce-park shutting down"
    );
    Ok(())
}

const DEFAULT_DT: f32 = 1.0 / 60.0;

#[derive(Debug)]
struct CliOptions {
    config: Option<PathBuf>,
    command_script: Option<PathBuf>,
    seed: Option<u64>,
    event_log: Option<PathBuf>,
    max_ticks: Option<u64>,
    dt: f32,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: None,
            command_script: None,
            seed: None,
            event_log: None,
            max_ticks: None,
            dt: DEFAULT_DT,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--command-script" => {
                    if let Some(path) = args.next() {
                        opts.command_script = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--command-script requires a file path");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--max-ticks" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.max_ticks = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--max-ticks must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--max-ticks requires an integer");
                    }
                }
                "--dt" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<f32>() {
                            Ok(value) if value > 0.0 && value.is_finite() => opts.dt = value,
                            Ok(value) => {
                                tracing::error!(value, "--dt must be a positive number of seconds");
                            }
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--dt must be a number");
                            }
                        }
                    } else {
                        tracing::error!("--dt requires a number of seconds");
                    }
                }
                other => {
                    tracing::warn!(arg = %other, "Ignoring unknown argument");
                }
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse(&[
            "--config",
            "park.toml",
            "--command-script",
            "script.json",
            "--seed",
            "42",
            "--event-log",
            "out/events.jsonl",
            "--max-ticks",
            "100",
            "--dt",
            "0.5",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("park.toml")));
        assert_eq!(opts.command_script, Some(PathBuf::from("script.json")));
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.event_log, Some(PathBuf::from("out/events.jsonl")));
        assert_eq!(opts.max_ticks, Some(100));
        assert_eq!(opts.dt, 0.5);
    }

    #[test]
    fn bad_values_keep_defaults() {
        let opts = parse(&["--seed", "abc", "--dt", "-1", "--max-ticks"]);
        assert_eq!(opts.seed, None);
        assert_eq!(opts.dt, DEFAULT_DT);
        assert_eq!(opts.max_ticks, None);
    }
}
