//! Florê CLI - store bootstrap and admin credential tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the store file with the default catalog
//! ADMIN_PASSWORD='...' flore init
//!
//! # Print an Argon2id hash (password from ADMIN_PASSWORD or stdin)
//! flore hash-password
//!
//! # Rotate the admin password (password from ADMIN_PASSWORD or stdin)
//! flore admin set-password
//!
//! # Validate the store and print collection counts
//! flore check
//! ```
//!
//! Every command takes `--data <PATH>`, defaulting to `FLORE_DATA_PATH` or
//! `data/db.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use flore_server::store::OpenOutcome;

mod commands;

use commands::CliError;

/// Environment variable the password is read from before falling back to stdin.
const PASSWORD_ENV: &str = "ADMIN_PASSWORD";

#[derive(Parser)]
#[command(name = "flore")]
#[command(author, version, about = "Florê backend tools")]
struct Cli {
    /// Path of the JSON store file
    #[arg(long, global = true, env = "FLORE_DATA_PATH", default_value = "data/db.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store with the default catalog if it is empty
    Init,
    /// Print an Argon2id hash for a password
    HashPassword,
    /// Manage the admin credential
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Load and validate the store, then print collection counts
    Check,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Replace the stored admin password
    SetPassword,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flore_cli=info,flore_server=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Init => {
            let password = std::env::var(PASSWORD_ENV).ok().map(SecretString::from);
            match commands::store::init(&cli.data, password.as_ref()).await? {
                OpenOutcome::Bootstrapped => println!("initialized {}", cli.data.display()),
                OpenOutcome::Loaded => println!("{} already holds data", cli.data.display()),
            }
        }
        Commands::HashPassword => {
            let password = commands::read_password(PASSWORD_ENV, io::stdin().lock())?;
            println!("{}", commands::admin::hash(&password)?);
        }
        Commands::Admin { action } => match action {
            AdminAction::SetPassword => {
                let password = commands::read_password(PASSWORD_ENV, io::stdin().lock())?;
                commands::admin::set_password(&cli.data, &password).await?;
                println!("admin password updated; restart the server to apply it");
            }
        },
        Commands::Check => {
            let summary = commands::store::check(&cli.data).await?;
            println!("{}: ok ({summary})", cli.data.display());
        }
    }
    Ok(())
}
