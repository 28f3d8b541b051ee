//! Folio entry point: loads configuration, wires adapters and serves HTTP.

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use folio::domain::RevalidationWorker;
use folio::inbound::http::health::HealthState;
use folio::inbound::http::session_config::{BuildMode, session_settings_from_env};
use folio::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use folio::outbound::revalidation::{HttpRevalidationClient, RevalidationSettings};
use folio::server::{AppDependencies, ServerConfig, Storage, build_services, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let config = ServerConfig::from_env(&env).map_err(startup_error("server config"))?;
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(startup_error("session config"))?;
    let revalidation = RevalidationSettings::load_from_iter([OsString::from("folio")])
        .map_err(startup_error("revalidation config"))?;

    let storage = match config.database_url() {
        Some(url) => {
            run_migrations(url).await.map_err(startup_error("migrations"))?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(startup_error("database pool"))?;
            Storage::Postgres(pool)
        }
        None => {
            info!("DATABASE_URL not set; articles are kept in memory");
            Storage::in_memory_with_demo_user().map_err(startup_error("demo user"))?
        }
    };

    let codec = Arc::new(
        revalidation
            .path_codec(cfg!(debug_assertions))
            .map_err(startup_error("path codec"))?,
    );
    let base_url = revalidation
        .base_url()
        .map_err(startup_error("revalidation config"))?;
    let client = HttpRevalidationClient::new(base_url, codec.clone(), revalidation.timeout())
        .map_err(startup_error("revalidation client"))?;

    let clock = Arc::new(DefaultClock);
    let services = build_services(storage, codec, revalidation.queue_capacity(), clock.clone());
    let worker = RevalidationWorker::new(Arc::new(client), clock, revalidation.worker_config());
    tokio::spawn(services.jobs.run(worker));

    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(services.http_state),
        session,
        dev_login: config.dev_login(),
    };
    let server = create_server(deps, &config)?;
    info!(addr = %config.bind_addr(), "listening");
    server.await
}

fn startup_error<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> std::io::Error {
    move |error| std::io::Error::other(format!("{context}: {error}"))
}
