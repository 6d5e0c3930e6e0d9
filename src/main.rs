use std::fs;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wanderlog::cli::{Cli, Command, EnrichArgs, ExportArgs, TripsArgs, ValidateArgs};
use wanderlog::client::{TripClient, unwrap_envelope};
use wanderlog::enrich::{PlaceClient, enrich_file};
use wanderlog::error::ServiceResult;
use wanderlog::metadata::{PKG_NAME, PKG_VERSION};
use wanderlog::storage::{FileBackend, LocalStore};
use wanderlog::trip::{TripData, export_envelope, export_file_name, merge_for_export, validate};
use wanderlog::types::{USER_MODIFICATIONS_KEY, UserModifications};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Export(args) => run_export(args),
        Command::Enrich(args) => run_enrich(args),
        Command::Trips(args) => run_trips(args),
        Command::Version => {
            println!("{PKG_NAME} {PKG_VERSION}");
            Ok(ExitCode::SUCCESS)
        }
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run_validate(args: ValidateArgs) -> ServiceResult<ExitCode> {
    let raw = fs::read_to_string(&args.file)?;
    let document = unwrap_envelope(serde_json::from_str(&raw)?);
    let report = validate(&document);

    for error in &report.errors {
        println!("{} {error}", "error".red().bold());
    }
    for warning in &report.warnings {
        println!("{} {warning}", "warning".yellow().bold());
    }
    if report.is_valid {
        println!(
            "{} {} ({} warnings)",
            "valid".green().bold(),
            args.file.display(),
            report.warnings.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} {} ({} errors, {} warnings)",
            "invalid".red().bold(),
            args.file.display(),
            report.errors.len(),
            report.warnings.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn run_export(args: ExportArgs) -> ServiceResult<ExitCode> {
    let raw = fs::read_to_string(&args.file)?;
    let document = unwrap_envelope(serde_json::from_str(&raw)?);
    let report = validate(&document);
    if !report.is_valid {
        for error in &report.errors {
            eprintln!("{} {error}", "error".red().bold());
        }
        return Ok(ExitCode::FAILURE);
    }
    let trip: TripData = serde_json::from_value(document)?;

    let store = match args.data_dir {
        Some(dir) => LocalStore::new(Box::new(FileBackend::new(dir))),
        None => LocalStore::new(Box::new(FileBackend::default_dir().map_err(
            |e| wanderlog::ServiceError::Other(e.to_string()),
        )?)),
    };
    let mods: UserModifications = store.get(USER_MODIFICATIONS_KEY, UserModifications::default());

    let merged = merge_for_export(&trip, &mods);
    let envelope = export_envelope(&merged);

    let out_dir = args
        .out_dir
        .or_else(|| args.file.parent().map(|p| p.to_path_buf()))
        .unwrap_or_default();
    let out_path = out_dir.join(export_file_name(&trip.trip_name));
    fs::write(&out_path, serde_json::to_string_pretty(&envelope)?)?;
    println!("{} {}", "exported".green().bold(), out_path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_enrich(args: EnrichArgs) -> ServiceResult<ExitCode> {
    let client = PlaceClient::new(&args.api_base, args.api_key);
    let report = enrich_file(&args.file, &client)?;
    println!(
        "{} scanned {}, enriched {}, already enriched {}, failed {}",
        "done".green().bold(),
        report.scanned,
        report.enriched,
        report.skipped,
        report.failed
    );
    Ok(ExitCode::SUCCESS)
}

fn run_trips(args: TripsArgs) -> ServiceResult<ExitCode> {
    let client = TripClient::new(&args.base_url);
    let summaries = client.fetch_trip_index()?;
    if summaries.is_empty() {
        println!("no trips available");
        return Ok(ExitCode::SUCCESS);
    }
    for summary in summaries {
        println!(
            "{}  {} ({})",
            summary.trip_id.as_deref().unwrap_or("-"),
            summary.trip_name,
            summary.timezone
        );
    }
    Ok(ExitCode::SUCCESS)
}
