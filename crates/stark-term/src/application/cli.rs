use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use chrono::Local;
use clap::Arg;
use clap::ArgMatches;
use clap::Command;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::application::ui::start_loop;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ExchangeClientBox;
use crate::domain::services::AppStateProps;
use crate::domain::services::Persistence;
use crate::domain::services::Sessions;
use crate::infrastructure::clients::StarkApi;
use crate::infrastructure::storage::FileStorage;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn arg_api_url() -> Arg {
    return Arg::new(ConfigKey::ApiUrl.to_string())
        .long(ConfigKey::ApiUrl.to_string())
        .env("STARK_API_URL")
        .num_args(1)
        .global(true)
        .help(format!(
            "Base URL of the STARK invoice service [default: {}]",
            Config::default(ConfigKey::ApiUrl)
        ));
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("STARK_CONFIG_FILE")
        .num_args(1)
        .global(true)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ));
}

fn arg_data_file() -> Arg {
    return Arg::new(ConfigKey::DataFile.to_string())
        .long(ConfigKey::DataFile.to_string())
        .env("STARK_DATA_FILE")
        .num_args(1)
        .global(true)
        .help(format!(
            "File the chat sessions are stored in [default: {}]",
            Config::default(ConfigKey::DataFile)
        ));
}

fn arg_log_file() -> Arg {
    return Arg::new(ConfigKey::LogFile.to_string())
        .long(ConfigKey::LogFile.to_string())
        .env("STARK_LOG_FILE")
        .num_args(1)
        .global(true)
        .help(format!(
            "File logs are written to [default: {}]",
            Config::default(ConfigKey::LogFile)
        ));
}

fn arg_log_level() -> Arg {
    return Arg::new(ConfigKey::LogLevel.to_string())
        .long(ConfigKey::LogLevel.to_string())
        .env("STARK_LOG_LEVEL")
        .num_args(1)
        .global(true)
        .value_parser(LOG_LEVELS)
        .help(format!(
            "Log verbosity [default: {}]",
            Config::default(ConfigKey::LogLevel)
        ));
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .env("STARK_REQUEST_TIMEOUT")
        .num_args(1)
        .global(true)
        .help(format!(
            "Timeout for each call to the STARK service in milliseconds [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ));
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options")
        .subcommand_required(true)
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout"),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions").about("Lists the stored chat sessions");
}

pub fn build() -> Command {
    return Command::new("stark-term")
        .about("STARK: chat with your invoices from the terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(subcommand_config())
        .subcommand(subcommand_sessions())
        .arg(arg_api_url())
        .arg(arg_config_file())
        .arg(arg_data_file())
        .arg(arg_log_file())
        .arg(arg_log_level())
        .arg(arg_request_timeout());
}

fn init_tracing() -> Result<WorkerGuard> {
    let log_path = PathBuf::from(Config::get(ConfigKey::LogFile));
    let log_dir = log_path
        .parent()
        .map(|e| return e.to_path_buf())
        .unwrap_or_else(|| return PathBuf::from("."));
    let log_name = log_path
        .file_name()
        .map(|e| return e.to_os_string())
        .context("log-file must name a file")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::new(format!(
        "stark_term={}",
        Config::get(ConfigKey::LogLevel)
    ));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    return Ok(guard);
}

fn storage() -> FileStorage {
    return FileStorage::new(PathBuf::from(Config::get(ConfigKey::DataFile)));
}

pub fn format_sessions(sessions: &Sessions) -> String {
    return sessions
        .list()
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let marker = if session.id == sessions.active_id() {
                "*"
            } else {
                " "
            };
            return format!(
                "{marker} {}. {} ({}, {} messages)",
                idx + 1,
                session.title,
                session.created_at.with_timezone(&Local).format("%-m/%-d/%Y"),
                session.messages.len()
            );
        })
        .collect::<Vec<String>>()
        .join("\n");
}

async fn print_sessions() -> Result<()> {
    let mut persistence = Persistence::new(Box::new(storage()));
    let sessions = Sessions::hydrate(persistence.load().await);
    println!("{}", format_sessions(&sessions));

    return Ok(());
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    let mut arg_matches: Vec<&ArgMatches> = vec![&matches];
    if let Some((_, sub_matches)) = matches.subcommand() {
        arg_matches.push(sub_matches);
    }
    Config::load(build(), arg_matches).await?;

    match matches.subcommand() {
        Some(("config", sub_matches)) => {
            if let Some(("default", _)) = sub_matches.subcommand() {
                println!("{}", Config::serialize_default(build()));
            }
        }
        Some(("sessions", _)) => {
            print_sessions().await?;
        }
        _ => {
            let _guard = init_tracing()?;
            tracing::info!(api_url = Config::get(ConfigKey::ApiUrl), "starting stark-term");

            let client: ExchangeClientBox = Box::new(StarkApi::from_config()?);
            let props = AppStateProps {
                storage: Box::new(storage()),
            };
            start_loop(client, props).await?;
        }
    }

    return Ok(());
}
