//! Quire CLI
//!
//! Command-line client for multi-tenant SaaS notes.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;

use quire_auth::FileTokenStore;
use quire_cli::cli::{Cli, Command, NotesAction};
use quire_cli::commands;
use quire_cli::config::{QuireConfig, Settings};
use quire_cli::config_handlers::handle_config_command;
use quire_cli::logging::init_logging;
use quire_cli::prompt::{read_password, stdin_is_terminal};
use quire_cli::shell::Shell;
use quire_client::{NotesClient, Session};
use quire_core::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = QuireConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let settings = Settings::resolve(&config, &cli);
    init_logging(cli.verbose, &settings.log_level);
    tracing::debug!(base_url = %settings.base_url, "resolved settings");

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    match cli.command {
        Command::Config { action } => {
            handle_config_command(cli.config.as_deref(), action, &mut stdout)?;
        }
        Command::Logout => commands::logout(&settings.token_store()?, &mut stderr)?,
        Command::Whoami => commands::whoami(&settings.token_store()?, &mut stdout)?,
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password(&mut stderr).await?,
            };
            let mut session = open_session(&settings)?;
            commands::login(&mut session, &email, &password, &mut stderr).await?;
        }
        Command::Notes { action } => {
            let mut session = open_session(&settings)?;
            match action {
                NotesAction::List => commands::list_notes(&mut session, &mut stdout).await?,
                NotesAction::Add { content } => {
                    commands::add_note(&mut session, &content.join(" "), &mut stdout).await?;
                }
                NotesAction::Delete { id } => {
                    commands::delete_note(&mut session, &id, &mut stderr).await?;
                }
            }
        }
        Command::Upgrade => {
            let mut session = open_session(&settings)?;
            commands::upgrade(&mut session, &mut stderr).await?;
        }
        Command::Shell => {
            let session = open_session(&settings)?;
            let stdin = BufReader::new(tokio::io::stdin());
            Shell::new(session, stdin, stdout, stderr)
                .mask_password(stdin_is_terminal())
                .run()
                .await?;
        }
    }

    Ok(())
}

fn open_session(settings: &Settings) -> Result<Session<NotesClient, FileTokenStore>> {
    let client = NotesClient::with_timeout(&settings.base_url, settings.timeout)?;
    let store = settings.token_store()?;
    tracing::debug!(token_file = %store.path().display(), "opening session");
    Ok(Session::new(client, store))
}
