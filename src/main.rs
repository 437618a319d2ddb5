use std::sync::Arc;

use fridge_chef_api::{
    config::Config,
    db::{create_pool, run_migrations, MemoryRecipeStore, PgRecipeStore, RecipeStore},
    routes::{cors_layer, create_router, AppState},
    services::{providers::create_provider, RecipeGenerator},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fridge_chef_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = create_provider(&config);
    let generator = RecipeGenerator::new(provider, config.generation_timeout());
    let store = connect_store(&config).await;
    let state = Arc::new(AppState::new(generator, store));

    let app = create_router(state).layer(cors_layer(&config.allowed_origins()));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens PostgreSQL when configured, otherwise keeps recipes in memory
async fn connect_store(config: &Config) -> Arc<dyn RecipeStore> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, recipes will only be kept in memory");
        return Arc::new(MemoryRecipeStore::new());
    };

    match open_postgres(database_url).await {
        Ok(store) => {
            tracing::info!("Database connection established");
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!(error = %e, "Database unavailable, continuing with in-memory storage");
            Arc::new(MemoryRecipeStore::new())
        }
    }
}

async fn open_postgres(database_url: &str) -> anyhow::Result<PgRecipeStore> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(PgRecipeStore::new(pool))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
