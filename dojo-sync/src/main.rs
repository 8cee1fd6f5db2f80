mod config;

use clap::{Args, Parser, Subcommand};
use clap::error::ErrorKind;
use config::{Config, ConfigError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracker::client::HttpTracker;
use tracker::output::OutputSink;
use tracker::remediation::CommandRemediation;
use tracker::types::{ResourceId, ScanUpload};
use tracker::{TrackerError, metrics_defs, setup, uploader};

#[derive(Parser)]
#[command(name = "dojo-sync", about = "Sync CI scan results with a vulnerability tracker")]
struct Cli {
    /// YAML config file. Settings are read from the environment when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Make sure the service is up and resolve the product and engagement ids.
    Setup,
    /// Upload one scan report to an engagement.
    Upload(UploadArgs),
}

#[derive(Args)]
struct UploadArgs {
    /// Scan type as the service names it, e.g. "SpotBugs Scan".
    #[arg(long, alias = "scan_type")]
    scan_type: String,
    #[arg(long, alias = "file_path")]
    file_path: PathBuf,
    #[arg(long, alias = "engagement_id")]
    engagement_id: ResourceId,
    #[arg(long, alias = "product_id")]
    product_id: Option<ResourceId>,
}

async fn run(command: CliCommand, config: &Config) -> Result<(), TrackerError> {
    let api = HttpTracker::new(&config.api_url, config.require_api_key()?)?;

    match command {
        CliCommand::Setup => {
            let project_name = config.require_project_name()?;
            let remediation = CommandRemediation::docker_compose(config.compose_dir.clone());
            let ids = setup::run_setup(&api, &remediation, config.settle(), project_name).await?;
            OutputSink::new(config.github_output.clone()).publish(&ids)?;
        }
        CliCommand::Upload(args) => {
            let scan = ScanUpload {
                scan_type: args.scan_type,
                file_path: args.file_path,
                engagement_id: args.engagement_id,
                product_id: args.product_id,
            };
            uploader::upload(&api, &scan).await?;
        }
    }
    Ok(())
}

/// Help and version output succeed; any other argument error is a missing
/// or invalid input and fails the step like every other fatal condition.
fn parse_error_status(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn run_status(result: &Result<(), TrackerError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn report_config_error(e: &ConfigError) -> ExitCode {
    eprintln!("error: {e}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_status(e.kind()));
        }
    };

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report_config_error(&e),
    };
    let sentry_dsn = match config.sentry_dsn() {
        Ok(dsn) => dsn,
        Err(e) => return report_config_error(&e),
    };

    let _sentry = shared::logging::init(
        sentry_dsn,
        concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")),
    );

    if let Some(metrics) = &config.metrics {
        match shared::metrics::install_statsd(&metrics.statsd_host, metrics.statsd_port, "dojo_sync") {
            Ok(()) => shared::metrics_defs::describe_all(metrics_defs::ALL_METRICS),
            Err(e) => tracing::warn!(error = %e, "Metrics disabled"),
        }
    }

    // Every call is awaited in sequence, a single thread is enough.
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(TrackerError::from)
        .and_then(|rt| rt.block_on(run(cli.command, &config)));

    if let Err(e) = &result {
        tracing::debug!(error = ?e, "Step failed");
        eprintln!("error: {e}");
    }
    ExitCode::from(run_status(&result))
}
