//! # Yatube Server
//!
//! The Actix-web application: routes, extractors, HTML views and wiring.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
pub mod views;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use tracing_actix_web::TracingLogger;

use middleware::error::AppError;
use observability::RequestIdMiddleware;
use state::AppState;

/// Build the application with every route and middleware installed.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(TracingLogger::default())
        .app_data(web::Data::new(state))
        // Malformed path parameters (e.g. a non-numeric post id) are plain 404s.
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            AppError::NotFound(err.to_string()).into()
        }))
        .configure(handlers::configure_routes)
        .default_service(web::to(handlers::not_found))
}
