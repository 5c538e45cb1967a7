//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

const DEMO_ACCOUNTS: &str = "Demo accounts: admin@acme.test / user@acme.test / \
admin@globex.test / user@globex.test (password: password)";

/// Quire - notes for multi-tenant SaaS teams
#[derive(Parser, Debug)]
#[command(name = "quire", author, version)]
#[command(about = "Command-line client for multi-tenant SaaS notes", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Notes API root URL
    #[arg(long, global = true, env = "QUIRE_API_URL")]
    pub api_url: Option<String>,

    /// Where the login token is kept
    #[arg(long, global = true, env = "QUIRE_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the token
    #[command(after_help = DEMO_ACCOUNTS)]
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password; prompted for when omitted
        #[arg(short, long, env = "QUIRE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show who the stored token belongs to
    Whoami,

    /// Note operations
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },

    /// Upgrade your tenant to the Pro plan (admins only)
    Upgrade,

    /// Interactive session
    #[command(after_help = DEMO_ACCOUNTS)]
    Shell,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `quire notes ...`
#[derive(Subcommand, Debug)]
pub enum NotesAction {
    /// List your tenant's notes
    #[command(alias = "ls")]
    List,

    /// Add a note
    Add {
        /// Note text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Delete a note by id
    #[command(alias = "rm")]
    Delete {
        /// Note id as shown by `quire notes list`
        id: String,
    },
}

/// `quire config ...`
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `api.base_url`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value (bool, integer, float, or string)
        value: String,
    },

    /// Write a default config file
    Init {
        /// Write to this path instead of the default location
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for docker run
        #[arg(long)]
        docker_env: bool,
    },
}
