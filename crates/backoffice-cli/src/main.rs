//! `backoffice`: command-line front end for the back-office API.
//!
//! # Usage
//!
//! ```text
//! backoffice validate customer ana.json
//! backoffice submit employee new-hire.json
//! backoffice submit customer ana.json --id 17
//! backoffice list supplier --page 0 --size 50
//! backoffice show product 4
//! backoffice toggle customer 17 --active false
//! ```
//!
//! Record files are JSON objects mapping field names to strings or numbers.

mod output;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use backoffice_client::{ApiClient, ApiConfig, Session, SessionClient, SubmitOutcome};
use backoffice_core::{
  EntityType, FormRecord,
  directory::{PageRequest, RecordId},
  normalize::normalize,
  validate,
};
use clap::{ArgAction, Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "backoffice", version, about = "Back-office records from the command line")]
struct Cli {
  /// Path to a TOML settings file (base_url, token, user_id, timeout_secs).
  #[arg(short, long, value_name = "FILE", default_value = "backoffice.toml")]
  config: PathBuf,

  /// Base URL of the back-office API.
  #[arg(long, env = "BACKOFFICE_URL")]
  url: Option<String>,

  /// Bearer token for the API session.
  #[arg(long, env = "BACKOFFICE_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Validate a record file and print the normalized payload.
  Validate {
    #[arg(value_parser = EntityType::parse)]
    entity: EntityType,
    file:   PathBuf,
  },
  /// Validate and save a record file; with `--id`, update that record.
  Submit {
    #[arg(value_parser = EntityType::parse)]
    entity: EntityType,
    file:   PathBuf,
    #[arg(long)]
    id:     Option<RecordId>,
  },
  /// List one page of records.
  List {
    #[arg(value_parser = EntityType::parse)]
    entity: EntityType,
    #[arg(long, default_value_t = 0)]
    page:   u32,
    #[arg(long, default_value_t = 20)]
    size:   u32,
  },
  /// Print one record as JSON.
  Show {
    #[arg(value_parser = EntityType::parse)]
    entity: EntityType,
    id:     RecordId,
  },
  /// Activate or deactivate a record.
  Toggle {
    #[arg(value_parser = EntityType::parse)]
    entity: EntityType,
    id:     RecordId,
    #[arg(long, action = ArgAction::Set)]
    active: bool,
  },
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Settings read from the TOML file and `BACKOFFICE_*` variables.
#[derive(Debug, Deserialize)]
struct Settings {
  #[serde(default = "default_base_url")]
  base_url:     String,
  #[serde(default)]
  token:        Option<String>,
  #[serde(default)]
  user_id:      Option<u64>,
  #[serde(default = "default_timeout_secs")]
  timeout_secs: u64,
}

fn default_base_url() -> String { ApiConfig::default().base_url }

fn default_timeout_secs() -> u64 { ApiConfig::default().timeout.as_secs() }

fn load_settings(cli: &Cli) -> Result<Settings> {
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("BACKOFFICE"))
    .build()
    .context("failed to read settings")?;

  let mut settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  // CLI flags override the file and environment.
  if let Some(url) = &cli.url {
    settings.base_url = url.clone();
  }
  if let Some(token) = &cli.token {
    settings.token = Some(token.clone());
  }
  Ok(settings)
}

fn connect(cli: &Cli) -> Result<SessionClient> {
  let settings = load_settings(cli)?;
  tracing::debug!(base_url = %settings.base_url, "connecting");

  let api = ApiClient::new(ApiConfig {
    base_url: settings.base_url,
    timeout:  Duration::from_secs(settings.timeout_secs),
  })?;
  Ok(api.session(Session {
    token:   settings.token,
    user_id: settings.user_id,
  }))
}

fn read_record(path: &PathBuf) -> Result<FormRecord> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading record file {}", path.display()))?;
  FormRecord::from_json_str(&raw)
    .with_context(|| format!("parsing record file {}", path.display()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  // Logs go to stderr so stdout stays clean for payloads and tables.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match &cli.command {
    Command::Validate { entity, file } => {
      let record = read_record(file)?;
      let report = validate(&record, *entity);
      if !report.is_valid() {
        print!("{}", output::report(&report));
        return Ok(ExitCode::FAILURE);
      }
      let payload = normalize(*entity, &record);
      println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Command::Submit { entity, file, id } => {
      let record = read_record(file)?;
      let client = connect(&cli)?;
      match client.submit(*entity, &record, *id).await {
        Ok(SubmitOutcome::Saved(saved)) => {
          println!("saved {entity} #{}", saved.id);
        }
        Ok(SubmitOutcome::Rejected(report)) => {
          print!("{}", output::report(&report));
          return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
          tracing::debug!(error = ?err, "submit failed");
          eprintln!("error: {}", err.user_message());
          return Ok(ExitCode::FAILURE);
        }
      }
    }

    Command::List { entity, page, size } => {
      let client = connect(&cli)?;
      let records = client
        .list(*entity, PageRequest::new(*page, *size))
        .await
        .with_context(|| format!("listing {}", entity.collection()))?;
      print!("{}", output::table(&records));
    }

    Command::Show { entity, id } => {
      let client = connect(&cli)?;
      let record = client
        .get(*entity, *id)
        .await
        .with_context(|| format!("fetching {entity} #{id}"))?;
      println!("{}", serde_json::to_string_pretty(&record)?);
    }

    Command::Toggle { entity, id, active } => {
      let client = connect(&cli)?;
      let summary = client
        .set_active(*entity, *id, *active)
        .await
        .with_context(|| format!("changing status of {entity} #{id}"))?;
      println!(
        "{entity} #{} is now {}",
        summary.id,
        output::status_label(summary.active)
      );
    }
  }

  Ok(ExitCode::SUCCESS)
}
