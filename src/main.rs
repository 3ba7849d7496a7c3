//! hapanel - Home Assistant and Open-Meteo readings for small displays
//!
//! Runs one query per invocation and prints display-ready rows on stdout.
//! Logs go to stderr, filtered by `RUST_LOG`.

use std::process::ExitCode;

use chrono::{Local, Timelike};
use clap::Parser;
use serde::Serialize;

use hapanel::cli::{Cli, Command, StartupConfig};
use hapanel::data::{
    HomeAssistantClient, Reading, WeatherClient, HISTORY_SENTINEL, STATE_SENTINEL,
    STATE_TEXT_SENTINEL,
};
use hapanel::days::day_name;

/// Sets up stderr logging, `hapanel=warn` unless `RUST_LOG` says otherwise
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hapanel=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prints a value as JSON or with its plain display form
fn emit<T: Serialize>(json: bool, value: &T, plain: impl FnOnce()) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        plain();
    }
    Ok(())
}

/// Prints a sensor reading, substituting the sentinel for missing data in plain mode
fn emit_reading<T>(json: bool, reading: Reading<T>, sentinel: T) -> Result<(), serde_json::Error>
where
    T: Serialize + Clone + std::fmt::Display,
{
    emit(json, &reading, || println!("{}", reading.clone().or_sentinel(sentinel)))
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StartupConfig::from_cli(&cli);
    let json = config.json;

    match cli.command {
        Command::State { entity } => {
            let client = HomeAssistantClient::new(&config.home_assistant()?, config.timeout)?;
            let reading = client.current_state(&entity).await;
            emit_reading(json, reading, STATE_TEXT_SENTINEL.to_string())?;
        }
        Command::Value { entity } => {
            let client = HomeAssistantClient::new(&config.home_assistant()?, config.timeout)?;
            let reading = client.current_value(&entity).await;
            emit_reading(json, reading, STATE_SENTINEL)?;
        }
        Command::History {
            entity,
            shift,
            granularity,
        } => {
            let client = HomeAssistantClient::new(&config.home_assistant()?, config.timeout)?;
            let reading = client.history_value(&entity, shift, granularity).await;
            emit_reading(json, reading, HISTORY_SENTINEL)?;
        }
        Command::Current { threshold } => {
            let threshold = threshold.unwrap_or_else(|| Local::now().hour() as i32);
            let client = WeatherClient::new(&config.forecast, config.timeout)?;
            let rows: Vec<_> = client.current_weather(threshold).await.into_iter().collect();
            emit(json, &rows, || {
                for row in &rows {
                    println!("{}", row.columns().join("\t"));
                }
            })?;
        }
        Command::Hourly => {
            let client = WeatherClient::new(&config.forecast, config.timeout)?;
            let rows = client.hourly_weather().await;
            emit(json, &rows, || {
                for row in &rows {
                    println!("{}", row.columns().join("\t"));
                }
            })?;
        }
        Command::Day { offset } => {
            let label = day_name(offset);
            emit(json, &label, || println!("{}", label))?;
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env if present
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
