use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

use ems::auth::jwt::TokenSigner;
use ems::config::{Config, StoreBackend};
use ems::db::init_db;
use ems::docs::ApiDoc;
use ems::engine::RecordEngine;
use ems::routes::{self, RateLimits};
use ems::store::{MemoryRecordStore, MySqlRecordStore, RecordStore};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = config.store_backend.as_ref(), "Server starting...");

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            Arc::new(MySqlRecordStore::new(init_db(url).await?))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store, records are lost on exit");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let engine = Data::new(RecordEngine::new(store));
    let signer = Data::new(TokenSigner::new(&config.jwt_secret, config.token_ttl));
    let limits = RateLimits::from(&config);

    // CORS is handled in front of this service.
    info!(origin = %config.cors_origin, "Expected browser origin");

    let server_addr = config.server_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(engine.clone())
            .app_data(signer.clone())
            .configure(|cfg| routes::configure(cfg, limits))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
