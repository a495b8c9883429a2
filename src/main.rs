use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod service;
mod store;
#[cfg(test)]
mod testing;

use config::Config;
use db::{init_db, init_schema, purge_expired_revocations};

use crate::auth::guard::AccessGuard;
use crate::docs::ApiDoc;
use crate::service::leave::LeaveLifecycle;
use crate::store::mysql::{MySqlLeaveStore, MySqlUserDirectory};
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url, config.storage_timeout()).await?;
    init_schema(&pool).await?;

    let pool_for_purge = pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = purge_expired_revocations(&pool_for_purge).await {
            error!(error = ?e, "Failed to purge expired revocations");
        }
    });

    // Service handles are built once and shared by every worker.
    let guard = Data::new(AccessGuard::new(
        Arc::new(MySqlUserDirectory::new(pool.clone(), config.storage_timeout())),
        config.jwt_secret.clone(),
        config.token_ttl,
    ));
    let lifecycle = Data::new(LeaveLifecycle::new(Arc::new(MySqlLeaveStore::new(
        pool,
        config.storage_timeout(),
    ))));

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .wrap(routes::cors())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(guard.clone())
            .app_data(lifecycle.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await
    .context("Server error")
}
