//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use access_pipeline::ApiDoc;
use access_pipeline::domain::auth::AccessPipeline;
use access_pipeline::inbound::http::health::{HealthState, live, ready};
use access_pipeline::inbound::http::routes::configure;
use access_pipeline::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let pipeline: AccessPipeline = http_state.pipeline.clone();
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(|cfg| configure(cfg, &pipeline))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark it ready.
///
/// Built-in signal handling is disabled; callers stop the server through
/// [`drain_on`](access_pipeline::inbound::http::health::drain_on).
///
/// # Errors
///
/// Fails when the handler state cannot be built or the socket cannot be
/// bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(
        build_http_state(&config)
            .map_err(|err| std::io::Error::other(format!("failed to build state: {err}")))?,
    );
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .disable_signals()
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
