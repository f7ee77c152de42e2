//! Command execution handlers

use anyhow::{Context, Result};
use pio_core::{AccountInfo, Event, Transfer};

use crate::client::{walk_files, PutioClient};
use crate::format::{
    format_account, format_document, format_events, format_transfers, format_tree, OutputFormat,
};

use super::commands::*;

/// Printed after transport and API failures
pub const CONNECTIVITY_HINT: &str = "Error during put.io API access, please check your internet \
connectivity and your token configuration. See --help for more info.";

/// Run an action that talks to the API
pub async fn run_action(client: &PutioClient, action: Action, format: &OutputFormat) -> Result<()> {
    match action {
        Action::ListFiles { folder_id } => handle_files_list(client, folder_id, format).await,
        Action::FileLink { file_id } => handle_files_link(client, file_id).await,
        Action::AccountInfo => handle_account_info(client, format).await,
        Action::ListTransfers => handle_transfers_list(client, format).await,
        Action::ListEvents => handle_events_list(client, format).await,
        Action::Help(_) | Action::Completion(_) => run_local_action(&action),
    }
}

/// Run an action that needs neither configuration nor the API
pub fn run_local_action(action: &Action) -> Result<()> {
    match action {
        Action::Help(command) => print_help(command),
        Action::Completion(shell) => {
            generate_completion(*shell);
            Ok(())
        }
        other => Err(anyhow::anyhow!("{:?} requires an API client", other)),
    }
}

/// Handle `files list`
pub async fn handle_files_list(
    client: &PutioClient,
    folder_id: i64,
    format: &OutputFormat,
) -> Result<()> {
    let lines = walk_files(client, folder_id)
        .await
        .with_context(|| format!("Failed to list folder {}", folder_id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
        OutputFormat::Table => {
            if !lines.is_empty() {
                println!("{}", format_tree(&lines));
            }
        }
    }

    Ok(())
}

/// Handle `files link`
pub async fn handle_files_link(client: &PutioClient, file_id: i64) -> Result<()> {
    let link = client
        .download_link(file_id)
        .await
        .with_context(|| format!("Failed to get download link for file {}", file_id))?;

    println!("{}", link);
    Ok(())
}

/// Handle `account info`
pub async fn handle_account_info(client: &PutioClient, format: &OutputFormat) -> Result<()> {
    let document = client
        .account_info()
        .await
        .context("Failed to fetch account information")?;

    match format {
        OutputFormat::Json => println!("{}", format_document(&document)?),
        OutputFormat::Table => {
            println!("{}", format_account(&AccountInfo::from_document(&document)));
        }
    }

    Ok(())
}

/// Handle `transfers list`
pub async fn handle_transfers_list(client: &PutioClient, format: &OutputFormat) -> Result<()> {
    let document = client
        .transfers()
        .await
        .context("Failed to fetch transfers")?;

    match format {
        OutputFormat::Json => println!("{}", format_document(&document)?),
        OutputFormat::Table => {
            println!("{}", format_transfers(&Transfer::list_from(&document)));
        }
    }

    Ok(())
}

/// Handle `events list`
pub async fn handle_events_list(client: &PutioClient, format: &OutputFormat) -> Result<()> {
    let document = client.events().await.context("Failed to fetch events")?;

    match format {
        OutputFormat::Json => println!("{}", format_document(&document)?),
        OutputFormat::Table => {
            let events = Event::list_from(&document);
            for event in &events {
                if let Event::Unsupported { event_type, .. } = event {
                    tracing::warn!(event_type = %event_type, "unsupported event type");
                }
            }
            println!("{}", format_events(&events));
        }
    }

    Ok(())
}

/// Print usage for the top-level command (`""`) or one of its subcommands
pub fn print_help(command: &str) -> Result<()> {
    use clap::CommandFactory;

    let mut cmd = Cli::command();
    // Propagates the binary name so subcommand usage reads "pio files ..."
    cmd.build();
    let target = if command.is_empty() {
        &mut cmd
    } else {
        cmd.find_subcommand_mut(command)
            .with_context(|| format!("Unknown command '{}'", command))?
    };

    target.print_help()?;
    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockServer, TEST_TOKEN};
    use pio_core::PioError;

    fn client_for(url: &str, token: &str) -> PutioClient {
        PutioClient::with_config(&format!("{}/v2", url), token, 5).unwrap()
    }

    #[tokio::test]
    async fn test_handlers_succeed_against_mock() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url, TEST_TOKEN);

        for format in [OutputFormat::Table, OutputFormat::Json] {
            handle_account_info(&client, &format).await.unwrap();
            handle_transfers_list(&client, &format).await.unwrap();
            handle_events_list(&client, &format).await.unwrap();
            handle_files_list(&client, 0, &format).await.unwrap();
        }
        handle_files_link(&client, 42).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_keeps_typed_cause() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url, "bad-token");

        let err = handle_transfers_list(&client, &OutputFormat::Table)
            .await
            .unwrap_err();
        let cause = err.downcast_ref::<PioError>().expect("typed cause");
        assert!(cause.needs_connectivity_hint());
        assert!(format!("{:#}", err).starts_with("Failed to fetch transfers"));
    }

    #[tokio::test]
    async fn test_listing_failure_prints_nothing_partial() {
        let (_server, url) = MockServer::new().start().await.unwrap();
        let client = client_for(&url, TEST_TOKEN);

        let err = handle_files_list(&client, 6, &OutputFormat::Table)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to list folder 6"));
    }

    #[test]
    fn test_local_actions() {
        assert!(run_local_action(&Action::Help("events")).is_ok());
        assert!(run_local_action(&Action::ListEvents).is_err());
    }

    #[test]
    fn test_print_help_for_known_commands() {
        assert!(print_help("").is_ok());
        assert!(print_help("files").is_ok());
        assert!(print_help("nope").is_err());
    }
}
