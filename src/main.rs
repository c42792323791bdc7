// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Runkeeper command-line client.
//!
//! Lists activities, exports tracks and uploads GPX files for the account
//! configured in the environment.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use runkeeper_client::{
    config::Config,
    models::{Activity, ExportFormat},
    services::{gpx, RunkeeperService},
    time_utils::parse_month,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runkeeper", about = "Scrape-based Runkeeper client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the activities of one month
    Month {
        /// Month as abbreviation, name or number (e.g. Jan, january, 1)
        month: String,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// List the activities of every month of a year
    Year { year: i32 },
    /// Show stats and start time of an activity
    Details {
        activity_id: String,
        /// Month the activity is listed in; adds the listing fields
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        /// Also include the GPX and KML exports
        #[arg(long)]
        exports: bool,
    },
    /// Download an activity as GPX or KML
    Export {
        activity_id: String,
        #[arg(long, value_enum, default_value_t = Format::Gpx)]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Summarize a local GPX file without logging in
    GpxInfo { file: PathBuf },
    /// Upload a GPX file as a new activity
    Upload {
        file: PathBuf,
        /// Activity type as offered by the site (e.g. RUN or Running)
        #[arg(long)]
        activity_type: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Gpx,
    Kml,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Gpx => ExportFormat::Gpx,
            Format::Kml => ExportFormat::Kml,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Command::GpxInfo { file } = &cli.command {
        let metadata = gpx::metadata_from_file(file)?;
        tracing::info!(file = %file.display(), "{}", metadata.summary());
        return print_json(&metadata);
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    let service = RunkeeperService::login(&config)
        .await
        .context("Login failed")?;

    match cli.command {
        Command::Month { month, year } => {
            let month = parse_month(&month).ok_or_else(|| anyhow!("invalid month: {}", month))?;
            let activities = service.activities_month(month, year).await?;
            print_json(&activities)
        }
        Command::Year { year } => {
            let listing = service.activities_year(year).await?;
            print_json(&listing)
        }
        Command::Details {
            activity_id,
            month,
            year,
            exports,
        } => {
            let activity = match month {
                Some(month) => {
                    let month =
                        parse_month(&month).ok_or_else(|| anyhow!("invalid month: {}", month))?;
                    service.find_activity(&activity_id, month, year).await?
                }
                None => Activity {
                    activity_id: Some(activity_id),
                    ..Default::default()
                },
            };
            let populated = if exports {
                service.populate_with_exports(&activity).await?
            } else {
                service.populate(&activity).await?
            };
            print_json(&populated)
        }
        Command::Export {
            activity_id,
            format,
            output,
        } => {
            let data = service.export_activity(&activity_id, format.into()).await?;
            match output {
                Some(path) => tokio::fs::write(&path, data)
                    .await
                    .with_context(|| format!("writing {}", path.display())),
                None => {
                    println!("{}", data);
                    Ok(())
                }
            }
        }
        Command::Upload {
            file,
            activity_type,
            notes,
        } => {
            let receipt = service.upload_track(&file, &activity_type, &notes).await?;
            print_json(&receipt)
        }
        Command::GpxInfo { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging on stderr; `RUST_LOG_FORMAT=json` switches to JSON lines.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("runkeeper_client=debug,info"));

    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
