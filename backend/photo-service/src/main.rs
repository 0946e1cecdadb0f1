use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db_pool::{create_pool, DbConfig};
use photo_service::config::Config;
use photo_service::handlers::{self, AppState};
use photo_service::repository::{
    EngagementRepository, GraphRepository, PhotoRepository, UserRepository,
};

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_service=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Photo Service");

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;
    let db_config = DbConfig::from_env("photo-service").map_err(anyhow::Error::msg)?;
    db_config.log_config();

    let pool = create_pool(db_config)
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let state = AppState::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(GraphRepository::new(pool.clone())),
        Arc::new(PhotoRepository::new(pool.clone())),
        Arc::new(EngagementRepository::new(pool)),
    );

    let bind_addr = (config.app.host.clone(), config.app.http_port);
    info!(
        host = %config.app.host,
        port = config.app.http_port,
        "HTTP server listening"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
    .context("HTTP server error")
}
