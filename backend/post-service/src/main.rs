use anyhow::{bail, Context, Result};
use post_service::{build_repository, Config, PostgresPostRepository, StorageBackend};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "post_service=info,db_pool=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        "Configuration loaded: env = {}, backend = {}",
        config.env,
        config.backend.as_str()
    );

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("check");

    match command {
        "migrate" => migrate(&config).await,
        "check" => check(&config).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other)
        }
    }
}

/// Apply the relational schema and exit
async fn migrate(config: &Config) -> Result<()> {
    if config.backend != StorageBackend::Postgres {
        warn!("Storage backend is in-memory; there is no schema to apply");
        return Ok(());
    }

    let db_config = config
        .database
        .clone()
        .context("DATABASE_URL environment variable not set")?;

    // connect() applies the schema
    let repo = PostgresPostRepository::connect(db_config)
        .await
        .context("Failed to apply post schema")?;
    repo.pool().close().await;

    info!("Schema migration completed");
    Ok(())
}

/// Build the configured repository and probe it
async fn check(config: &Config) -> Result<()> {
    let repo = build_repository(config).await?;

    match repo.health_check().await {
        Ok(()) => {
            info!("Post repository is healthy");
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind().as_str(), error = %e, "Post repository health check failed");
            Err(e).context("Health check failed")
        }
    }
}

fn print_usage() {
    println!("Usage: post-service <command>");
    println!();
    println!("Commands:");
    println!("  check    Build the configured repository and run a health check (default)");
    println!("  migrate  Create the posts and comments tables if they do not exist");
    println!("  help     Show this message");
}
