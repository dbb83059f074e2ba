//! SimpleToBuy CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! stb-cli migrate
//!
//! # Create an admin account
//! stb-cli admin create -e admin@example.com -f "Ivan Petrov" -p 'long passphrase'
//!
//! # Grant or revoke the admin flag on an existing account
//! stb-cli admin grant -e user@example.com
//! stb-cli admin revoke -e user@example.com
//!
//! # Delete expired sessions
//! stb-cli sessions prune
//!
//! # Insert the demo catalog into an empty database
//! stb-cli seed
//! ```
//!
//! All commands read `SIMPLETOBUY_DATABASE_URL` (or `DATABASE_URL`), loading
//! `.env` if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "stb-cli")]
#[command(author, version, about = "SimpleToBuy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage bearer sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Insert demo products if the catalog is empty
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Full name: "name surname [middle name]"
        #[arg(short, long)]
        fio: String,

        /// Account password
        #[arg(short, long, env = "SIMPLETOBUY_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Grant the admin flag to an existing account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the admin flag from an existing account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum SessionsAction {
    /// Delete every expired session
    Prune,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let pool = commands::connect().await?;

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                fio,
                password,
            } => commands::admin::create(&pool, &email, &fio, &password)
                .await
                .map(drop),
            AdminAction::Grant { email } => commands::admin::set_admin(&pool, &email, true).await,
            AdminAction::Revoke { email } => {
                commands::admin::set_admin(&pool, &email, false).await
            }
        },
        Commands::Sessions { action } => match action {
            SessionsAction::Prune => commands::sessions::prune(&pool).await.map(drop),
        },
        Commands::Seed => commands::seed::run(&pool).await.map(drop),
    };

    pool.close().await;
    result
}
