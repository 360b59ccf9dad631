mod display;
mod input;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use siteentry_core::{FormKind, Position, SiteConfig};
use siteentry_gateway::Gateway;
use siteentry_session::{FormSession, GeolocationService, TextFileTarget};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "siteentry", version, about = "Site entry forms: induction, daily log, materials register")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, env = "SITEENTRY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the forms with their routes and fields.
    Forms,
    /// Validate a JSON file of field values against a form.
    Validate {
        #[arg(long)]
        form: FormKind,
        #[arg(long)]
        values: PathBuf,
    },
    /// Validate and submit a form.
    Submit {
        #[arg(long)]
        form: FormKind,
        #[arg(long)]
        values: PathBuf,
    },
    /// Check in and out of the daily log at fixed coordinates, then submit.
    #[command(allow_negative_numbers = true)]
    DailyLog {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Check-out latitude (defaults to --lat).
        #[arg(long)]
        out_lat: Option<f64>,
        /// Check-out longitude (defaults to --lon).
        #[arg(long)]
        out_lon: Option<f64>,
    },
    /// Render the form as currently filled to a text document.
    Export {
        #[arg(long)]
        form: FormKind,
        #[arg(long)]
        values: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SiteConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "siteentry starting");

    match cli.command {
        Command::Forms => {
            display::print_forms();
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { form, values } => {
            let session = load_session(form, &values)?;
            let result = session.validation();
            display::print_validation(form, &result);
            Ok(exit_code(result.is_submittable()))
        }
        Command::Submit { form, values } => {
            let gateway = Gateway::from_config(&config)?;
            let mut session = load_session(form, &values)?;
            let outcome = session.request_submit(&gateway).await?;
            if !session.errors().is_empty() {
                display::print_validation(form, session.errors());
            }
            display::print_outcome(&outcome);
            display::print_notices(&session.take_notices());
            Ok(exit_code(outcome.is_success()))
        }
        Command::DailyLog {
            lat,
            lon,
            out_lat,
            out_lon,
        } => {
            let gateway = Gateway::from_config(&config)?;
            let mut session = FormSession::new(FormKind::DailyLog);

            let check_in = session
                .check_in(&GeolocationService::fixed(Position::new(lat, lon)))
                .await;
            display::print_notices(&session.take_notices());
            display::print_capture("Checked in", &check_in?);

            let out = Position::new(out_lat.unwrap_or(lat), out_lon.unwrap_or(lon));
            let outcome = session
                .check_out(&GeolocationService::fixed(out), &gateway)
                .await;
            display::print_notices(&session.take_notices());
            let outcome = outcome?;
            if let Some(capture) = session.checked_out() {
                display::print_capture("Checked out", capture);
            }
            display::print_outcome(&outcome);
            Ok(exit_code(outcome.is_success()))
        }
        Command::Export { form, values, out } => {
            let session = load_session(form, &values)?;
            let path = out.unwrap_or_else(|| config.export.dir.join(format!("{form}.txt")));
            let target = TextFileTarget::new(path);
            session.export(&target);
            println!("{}", target.path().display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Build a session for `kind` with every value from the JSON file applied.
fn load_session(kind: FormKind, values: &Path) -> anyhow::Result<FormSession> {
    let mut session = FormSession::new(kind);
    for (field, value) in input::load_values(values)? {
        session
            .update_field(&field, value)
            .with_context(|| format!("setting {field}"))?;
    }
    Ok(session)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
