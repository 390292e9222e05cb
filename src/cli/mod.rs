//! CLI module - Command-line interface for the phonebook service

pub mod commands;

use clap::{Parser, Subcommand};

/// Phonebook - token-authenticated contacts and cars API
#[derive(Debug, Parser)]
#[command(name = "phonebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Write a default config.toml in the working directory
    Init,

    /// Create a user account
    Register {
        #[arg(long)]
        email: String,

        /// Falls back to `PHONEBOOK_PASSWORD` when omitted
        #[arg(long)]
        password: Option<String>,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Verify credentials and print the access token
    Token {
        #[arg(long)]
        email: String,

        /// Falls back to `PHONEBOOK_PASSWORD` when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

impl Cli {
    /// The subcommand to run, `serve` when none was given.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

/// Environment variable read when `--password` is not given.
pub const PASSWORD_ENV: &str = "PHONEBOOK_PASSWORD";

/// Picks the password from the flag, then from [`PASSWORD_ENV`].
pub fn resolve_password(explicit: Option<&str>) -> anyhow::Result<String> {
    if let Some(value) = explicit {
        if value.is_empty() {
            anyhow::bail!("--password must not be empty when provided");
        }
        return Ok(value.to_string());
    }

    let from_env = std::env::var(PASSWORD_ENV)
        .map_err(|_| anyhow::anyhow!("password missing: set --password or {PASSWORD_ENV}"))?;
    if from_env.is_empty() {
        anyhow::bail!("{PASSWORD_ENV} must not be empty");
    }
    Ok(from_env)
}
