//! Operational CLI for the catalog API: schema bootstrap and admin-account
//! provisioning. The first account created on a fresh database gets id 1 and
//! becomes the protected primary admin.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use catalog_api::database;
use catalog_api::repositories::admin_repository;
use catalog_api::schemas::admin::AdminCreateRequest;

#[derive(Parser)]
#[command(name = "catalogctl", about = "Operational tasks for the catalog API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema (idempotent)
    InitDb,

    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let pool = database::connect_from_env()
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::InitDb => {
            database::bootstrap(&pool).await?;
            println!("Schema is up to date.");
        }
        Commands::CreateAdmin { email, name, password } => {
            database::bootstrap(&pool).await?;

            let data = AdminCreateRequest {
                email: Some(email),
                name: Some(name),
                password: Some(password),
            }
            .validate()
            .map_err(|errors| {
                let messages: Vec<String> =
                    errors.into_iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
                anyhow::anyhow!(messages.join("; "))
            })?;

            let mut conn = pool.acquire().await?;
            if admin_repository::email_in_use(&mut conn, &data.email, None).await? {
                bail!("an admin with email {} already exists", data.email);
            }

            let password_hash = bcrypt::hash(&data.password, bcrypt::DEFAULT_COST)?;
            let admin =
                admin_repository::insert(&mut conn, &data.email, &data.name, &password_hash)
                    .await?;

            println!("Created admin {} with id {}.", admin.email, admin.id);
            if admin.id == 1 {
                println!("This account is the primary admin and cannot be disabled or deleted.");
            }
        }
    }

    Ok(())
}
