//! pio CLI
//!
//! Command-line client for the put.io file storage API.

use anyhow::Result;
use clap::Parser;
use pio::cli::{run_action, run_local_action, usage_exit_code, Cli, CONNECTIVITY_HINT};
use pio::client::PutioClient;
use pio::config::CliConfig;
use pio_core::PioError;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<std::ffi::OsString> = std::env::args_os().collect();
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e, &args);
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Argument errors are reported before the config file is touched
    let action = match cli.action() {
        Ok(action) => action,
        Err(e) => exit_with(&anyhow::Error::from(e)),
    };

    // Help and completion need neither a token nor the network
    if !action.needs_client() {
        if let Err(e) = run_local_action(&action) {
            exit_with(&e);
        }
        return Ok(());
    }

    // Build configuration using priority chain: defaults → file → env → CLI args
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(&anyhow::Error::from(e)),
    };

    init_tracing(config.verbose);
    tracing::debug!(
        api_url = %config.api_url,
        config = %config.config_path.display(),
        format = %config.output_format,
        "configuration loaded"
    );

    let output_format = match config.output_format.as_str() {
        "json" => pio::format::OutputFormat::Json,
        _ => pio::format::OutputFormat::Table,
    };

    let client = match PutioClient::with_config(&config.api_url, &config.token, config.timeout) {
        Ok(client) => client,
        Err(e) => exit_with(&anyhow::Error::from(e)),
    };

    if let Err(e) = run_action(&client, action, &output_format).await {
        exit_with(&e);
    }

    Ok(())
}

fn build_config(cli: &Cli) -> pio_core::Result<CliConfig> {
    let mut builder = CliConfig::builder()
        .with_config_file(cli.config.clone())?
        .with_env_overrides();

    if let Some(ref api_url) = cli.api_url {
        builder = builder.with_api_url(api_url)?;
    }
    if let Some(ref format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }

    builder.build()
}

/// Report a fatal error and terminate with exit code 1
fn exit_with(error: &anyhow::Error) -> ! {
    match error.downcast_ref::<PioError>() {
        Some(PioError::MissingToken { path }) => {
            eprintln!("Please edit the file {} with your OAuth token.", path);
            eprintln!("To get this token, create an OAuth app in your put.io account settings.");
        }
        Some(PioError::InvalidInput(message)) => {
            eprintln!("Error: {}", message);
        }
        Some(cause) if cause.needs_connectivity_hint() => {
            eprintln!("Error: {:#}", error);
            eprintln!();
            eprintln!("{}", CONNECTIVITY_HINT);
        }
        _ => {
            eprintln!("Error: {:#}", error);
        }
    }

    tracing::debug!("error details: {:?}", error);
    std::process::exit(1);
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
