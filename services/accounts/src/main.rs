use std::sync::Arc;

use anyhow::Result;
use common::{
    database::{health_check, init_pool},
    error::DatabaseError,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use accounts::{
    AccountStore, AppConfig, AppState, StorageBackend,
    password::CredentialHasher,
    repositories::{PostRepository, UserRepository},
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("accounts=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting accounts service");

    let config = AppConfig::from_env()?;
    let hasher = CredentialHasher::new(&config.hasher)?;

    let accounts = match config.storage {
        StorageBackend::Postgres => connect_postgres(&config, hasher).await?,
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            AccountStore::in_memory(hasher)
        }
    };

    let app = routes::create_router(AppState::new(accounts));

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("Accounts service listening on {}", config.server_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Accounts service stopped");
    Ok(())
}

async fn connect_postgres(config: &AppConfig, hasher: CredentialHasher) -> Result<AccountStore> {
    let Some(db_config) = &config.database else {
        anyhow::bail!("PostgreSQL storage selected without database configuration");
    };

    let pool = init_pool(db_config).await?;
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    info!("Running database migrations");
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Migrations complete");

    Ok(AccountStore::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(PostRepository::new(pool)),
        hasher,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
