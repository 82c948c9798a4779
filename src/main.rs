/// license-check - one-shot license validation host
///
/// Loads credentials from `<exe>.config` (or `--config`) and `LICENSE_*`
/// environment variables, validates the serial key once against the
/// licensing server and exits 0 for a valid license, 1 otherwise.
/// Re-validation on a schedule is left to whatever runs this binary.

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use license_client::config::{Config, default_config_path, load_config, save_config};
use license_client::{Expiration, LicenseClient, ValidationResult};

#[derive(Parser, Debug)]
#[command(name = "license-check")]
#[command(about = "Validate a license serial key against the licensing server")]
struct Args {
    /// Path to the JSON config file (default: <executable>.config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial key to validate (overrides config and LICENSE_SERIAL_KEY)
    #[arg(short, long)]
    serial_key: Option<String>,

    /// Use this hardware id instead of deriving one
    #[arg(long)]
    hardware_id: Option<String>,

    /// Licensing server base address
    #[arg(long)]
    server_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = load_config(&config_path)?;
    config.apply_env();
    apply_args(&mut config, args);
    config.validate()?;

    let Some(serial_key) = config.serial_key.clone() else {
        error!(
            "No serial key configured: pass --serial-key, set LICENSE_SERIAL_KEY or add serial_key to {}",
            config_path.display()
        );
        return Ok(false);
    };

    let client = LicenseClient::new(config.credentials())?;

    info!("Validating license against {}", config.server_url);
    let result = client.validate(&serial_key, args.hardware_id.as_deref())?;
    report(&result);

    if result.success {
        config.record_success(&serial_key, Utc::now());
        // The license is valid either way; a read-only config dir is not fatal
        if let Err(e) = save_config(&config_path, &config) {
            warn!("Could not persist license config: {}", e);
        }
    }

    Ok(result.success)
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(serial_key) = &args.serial_key {
        config.serial_key = Some(serial_key.clone());
    }
    if let Some(server_url) = &args.server_url {
        config.server_url = server_url.clone();
    }
    if let Some(timeout) = args.timeout_secs {
        config.timeout_secs = Some(timeout);
    }
}

fn report(result: &ValidationResult) {
    let code = result.code.as_deref().unwrap_or("UNKNOWN");
    let message = result.message.as_deref().unwrap_or("");

    if !result.success {
        warn!("License invalid: {} ({})", message, code);
        return;
    }

    info!("License valid: {} ({})", message, code);
    if let Some(hardware_id) = &result.hardware_id {
        info!("Hardware ID: {}", hardware_id);
    }
    match result.expiration() {
        Some(Expiration::Never) => info!("Permanent license (no expiration)"),
        Some(Expiration::At(at)) => info!("Expires: {}", at.to_rfc3339()),
        None => {}
    }
}
