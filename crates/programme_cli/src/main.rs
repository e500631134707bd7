//! Programme CLI.
//!
//! # Responsibility
//! - Verify `programme_core` linkage (`version`).
//! - Report conflicts of a proposed window against a programme snapshot,
//!   going through the same fetch path the services use.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;
use programme_core::{
    init_logging, resolve_session_interval, ApiRoutes, EntityId, InMemoryGateway, Method,
    ProgrammeConfig, ProgrammeService, Session,
};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "programme-cli")]
#[command(about = "Inspect event programmes and their scheduling conflicts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core ping and version.
    Version,

    /// List sessions of a snapshot that overlap a proposed window.
    Conflicts {
        /// Programme payload (JSON) as returned by the programme endpoint
        #[arg(long)]
        snapshot: PathBuf,
        /// Event id the snapshot belongs to
        #[arg(long)]
        event: String,
        /// Window start (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        /// Window end (RFC 3339), exclusive
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        /// Only report sessions where this speaker has a role
        #[arg(long)]
        speaker: Option<String>,
        /// Session id to leave out, e.g. the one being edited
        #[arg(long)]
        exclude: Option<String>,
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

struct ConflictQuery {
    snapshot: PathBuf,
    event_id: EntityId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    speaker_id: Option<EntityId>,
    exclude: Option<EntityId>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Version => {
            println!("programme_core ping={}", programme_core::ping());
            println!("programme_core version={}", programme_core::core_version());
            Ok(())
        }
        Commands::Conflicts {
            snapshot,
            event,
            start,
            end,
            speaker,
            exclude,
            config,
        } => {
            let query = ConflictQuery {
                snapshot,
                event_id: EntityId::new(event),
                start,
                end,
                speaker_id: speaker.map(EntityId::new),
                exclude: exclude.map(EntityId::new),
            };
            run_conflicts(query, config.as_deref()).await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_conflicts(query: ConflictQuery, config_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => ProgrammeConfig::from_file(path)?,
        None => ProgrammeConfig::default(),
    };
    if let Some(dir) = &config.logging.dir {
        init_logging(&config.logging.level, dir)?;
    }

    let snapshot: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&query.snapshot)?)?;
    let gateway = InMemoryGateway::new();
    let routes = ApiRoutes::new(config.api_prefix.clone());
    gateway.respond(Method::Get, routes.programme(&query.event_id), snapshot);

    let policy = config.interval_policy;
    let service = ProgrammeService::new(gateway, config);
    service.fetch_programme(&query.event_id).await?;

    let conflicts = match &query.speaker_id {
        Some(speaker_id) => {
            service.check_speaker_conflicts(speaker_id, query.start, query.end, query.exclude.as_ref())
        }
        None => service.check_time_conflicts(query.start, query.end, query.exclude.as_ref()),
    };
    info!(
        "event=cli_conflicts module=cli status=ok event_id={} conflicts={}",
        query.event_id,
        conflicts.len()
    );

    if conflicts.is_empty() {
        println!("no conflicts");
        return Ok(());
    }
    for session in &conflicts {
        let window = service
            .slot_of_session(&session.id)
            .and_then(|slot| resolve_session_interval(session, &slot, policy))
            .map(|interval| format!("{}..{}", interval.start.to_rfc3339(), interval.end.to_rfc3339()))
            .unwrap_or_else(|| "-".to_string());
        println!("{}", describe(session, &window));
    }
    Ok(())
}

fn describe(session: &Session, window: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        session.id, session.session_type, window, session.title
    )
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 instant: {err}"))
}
