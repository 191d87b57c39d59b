//! `freight` - run freight core operations from the command line.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use freight_cli::commands;
use freight_cli::input::{read_json, EtaInput, FlightInput, OneOrMany};
use freight_cli::{Config, LogFormat};
use freight_core::{ReportFormat, TransitionRequest, WeatherReading};

/// Freight tracking computations over JSON input ("-" reads stdin)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Tracing filter, overrides FREIGHT_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print compact JSON instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one weather reading or an array of readings
    Classify {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Summarize the weather readings along a route
    Route {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Project a weather-adjusted ETA for a vehicle
    Eta {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Normalize tracker state vectors into flights
    Flight {
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Also dead-reckon each position this many seconds ahead
        #[arg(long)]
        predict: Option<f64>,
    },
    /// Build a shipment status and list its next legal statuses
    Status {
        name: String,

        /// Reason recorded for delayed and cancelled statuses
        #[arg(long)]
        reason: Option<String>,
    },
    /// Order statuses by urgency, most urgent first
    Triage {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Validate a transition request
    Transition {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Render a report request as csv, json or html
    Report {
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Output format, overrides the request and FREIGHT_REPORT_FORMAT
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Write the payload here; a directory gets the suggested file name
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(filter) = args.log.clone() {
        config.log_filter = filter;
    }
    if args.json_logs {
        config.log_format = LogFormat::Json;
    }
    if args.compact {
        config.pretty = false;
    }

    init_tracing(&config)?;
    tracing::debug!(?config, "configuration loaded");

    run(args.command, &config)
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter {:?}", config.log_filter))?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
    }
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Classify { input } => {
            let readings: OneOrMany<WeatherReading> = read_json(&input)?;
            let verdicts = commands::classify_readings(readings.into_vec());
            tracing::info!(count = verdicts.len(), "classified readings");
            print_json(&verdicts, config)
        }
        Command::Route { input } => {
            let readings: OneOrMany<WeatherReading> = read_json(&input)?;
            let report = commands::route(readings.into_vec());
            tracing::info!(
                worst = %report.summary.worst_impact,
                ground_stop = report.summary.any_ground_stop,
                "route assessed"
            );
            print_json(&report, config)
        }
        Command::Eta { input } => {
            let input: EtaInput = read_json(&input)?;
            print_json(&commands::eta(input), config)
        }
        Command::Flight { input, predict } => {
            let input: FlightInput = read_json(&input)?;
            let flights = commands::flights(input, predict)?;
            tracing::info!(count = flights.len(), "normalized flights");
            print_json(&flights, config)
        }
        Command::Status { name, reason } => {
            print_json(&commands::status(&name, reason.as_deref())?, config)
        }
        Command::Triage { names } => print_json(&commands::triage(&names)?, config),
        Command::Transition { input } => {
            let request: TransitionRequest = read_json(&input)?;
            print_json(&commands::transition(&request)?, config)
        }
        Command::Report {
            input,
            format,
            output,
        } => {
            let request = read_json(&input)?;
            let rendered = commands::report(request, format, config.report_format)?;
            let payload = rendered.payload()?;

            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(rendered.file_name())
                    } else {
                        path
                    };
                    fs::write(&path, payload)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(
                        path = %path.display(),
                        mime = rendered.mime_type(),
                        rows = rendered.row_count,
                        "report written"
                    );
                }
                None => print!("{payload}"),
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T, config: &Config) -> Result<()> {
    let text = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
