//! Administrative commands for a YaMDB deployment.
//!
//! # Commands
//!
//! - `migrate` - Apply pending database migrations
//! - `create-superuser --username <NAME> --email <EMAIL>` - Create (or
//!   promote) an administrator and issue a confirmation code for it

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yamdb_core::confirmation::{generate_code, hash_code};
use yamdb_core::validation::validate_username;
use yamdb_db::models::user::CreateUser;
use yamdb_db::repositories::UserRepo;

/// Administrative commands for YaMDB.
#[derive(Parser)]
#[command(name = "yamdb-manage")]
#[command(about = "Administrative commands for YaMDB", long_about = None)]
struct Cli {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,

    /// Create an administrator, or promote an existing account.
    ///
    /// Prints a fresh confirmation code that can be exchanged for a token
    /// at `/api/v1/auth/token`.
    #[command(name = "create-superuser")]
    CreateSuperuser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Also deliver the code through the configured mail backend.
        #[arg(long)]
        send_email: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamdb_manage=info,yamdb_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let pool = yamdb_db::create_pool(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    yamdb_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match cli.command {
        Commands::Migrate => {
            tracing::info!("Database migrations applied");
        }
        Commands::CreateSuperuser {
            username,
            email,
            send_email,
        } => create_superuser(&pool, &username, &email, send_email).await?,
    }

    Ok(())
}

async fn create_superuser(
    pool: &yamdb_db::DbPool,
    username: &str,
    email: &str,
    send_email: bool,
) -> Result<()> {
    if let Err(e) = validate_username(username) {
        bail!("Invalid username '{username}': {e}");
    }

    let user = match UserRepo::find_by_username(pool, username).await? {
        Some(existing) if existing.email != email => {
            bail!(
                "User '{username}' already exists with a different email ({})",
                existing.email
            );
        }
        Some(existing) => existing,
        None => {
            if UserRepo::find_by_email(pool, email).await?.is_some() {
                bail!("Email '{email}' already belongs to another user");
            }
            UserRepo::create(pool, &CreateUser::signup(username, email))
                .await
                .context("Failed to create user")?
        }
    };

    let admin = UserRepo::grant_superuser(pool, user.id)
        .await?
        .context("User vanished while being promoted")?;

    let code = generate_code();
    UserRepo::set_confirmation_code(pool, admin.id, &hash_code(&code)).await?;

    tracing::info!(user_id = admin.id, username = %admin.username, "Superuser ready");

    if send_email {
        let mailer = yamdb_mail::build_mailer(&yamdb_mail::EmailConfig::from_env());
        mailer
            .send_confirmation_code(&admin.email, &admin.username, &code)
            .await
            .context("Failed to send confirmation code")?;
    }

    println!("Superuser '{}' ready. Confirmation code: {code}", admin.username);
    Ok(())
}
