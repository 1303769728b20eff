//! Access pipeline server entry-point.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use access_pipeline::inbound::http::credential_config::{BuildMode, credential_settings_from_env};
use access_pipeline::inbound::http::health::{HealthState, drain_on};
use access_pipeline::outbound::persistence::DbPool;
use server::{AppSettings, ServerConfig, create_server};

async fn shutdown_signal(mut terminate: Signal) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(error) = result {
                warn!(%error, "SIGINT handler failed");
            }
            info!("received SIGINT");
        }
        _ = terminate.recv() => info!("received SIGTERM"),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let credential = credential_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid credential configuration")?;

    let mut config = ServerConfig::new(credential, settings.bind_addr());
    if let Some(memory_kib) = settings.password_memory_kib {
        config = config.with_password_memory_kib(memory_kib);
    }
    if let Some(iterations) = settings.password_iterations {
        config = config.with_password_iterations(iterations);
    }
    if let Some(pool_config) = settings.pool_config() {
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let terminate =
        signal(SignalKind::terminate()).wrap_err("failed to register SIGTERM handler")?;
    let health_state = web::Data::new(HealthState::new());
    let addr = settings.bind_addr();
    let server = create_server(health_state.clone(), config).wrap_err("failed to start server")?;
    actix_web::rt::spawn(drain_on(
        shutdown_signal(terminate),
        health_state,
        server.handle(),
    ));
    info!(%addr, "listening");
    server.await.wrap_err("server terminated with an error")
}
