//! # Clubly API
//!
//! The API crate provides the web server for the Clubly advisor-request
//! service. It exposes RESTful endpoints for advisor requests, teacher
//! directories, availability, notifications, clubs, club tasks and meeting
//! bookings.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate input, apply business rules, fan out notifications
//! - **Middleware**: Error mapping shared by every handler
//! - **Config**: Environment configuration
//!
//! Handlers only talk to the repository traits from `clubly_db`, so the
//! router can be driven by Postgres or by mocks.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Error handling shared by the handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    BoxError, Json, Router,
};
use clubly_db::{
    repositories::{
        AdvisorRequestRepository, AvailabilityRepository, ClubRepository,
        MeetingBookingRepository, NotificationRepository, PgAdvisorRequestRepository,
        PgAvailabilityRepository, PgClubRepository, PgMeetingBookingRepository,
        PgNotificationRepository, PgTaskRepository, PgTeacherRepository, TaskRepository,
        TeacherRepository,
    },
    DbPool,
};
use eyre::{Result, WrapErr};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers.
///
/// Every repository sits behind a trait object so tests can swap in the
/// mocks from `clubly_db::mock`.
pub struct ApiState {
    pub teachers: Arc<dyn TeacherRepository>,
    pub clubs: Arc<dyn ClubRepository>,
    pub advisor_requests: Arc<dyn AdvisorRequestRepository>,
    pub availability: Arc<dyn AvailabilityRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub bookings: Arc<dyn MeetingBookingRepository>,
    pub tasks: Arc<dyn TaskRepository>,
}

impl ApiState {
    /// Wires every repository to the same Postgres pool.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            teachers: Arc::new(PgTeacherRepository::new(pool.clone())),
            clubs: Arc::new(PgClubRepository::new(pool.clone())),
            advisor_requests: Arc::new(PgAdvisorRequestRepository::new(pool.clone())),
            availability: Arc::new(PgAvailabilityRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            bookings: Arc::new(PgMeetingBookingRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool)),
        }
    }
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        .merge(routes::advisor_requests::routes())
        .merge(routes::teachers::routes())
        .merge(routes::availability::routes())
        .merge(routes::notifications::routes())
        .merge(routes::clubs::routes())
        .merge(routes::meeting_bookings::routes())
        .merge(routes::tasks::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server with the provided configuration and database pool.
///
/// Installs the global tracing subscriber, builds the router, applies CORS
/// and the request timeout, then serves until the process is stopped.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::postgres(db_pool));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
    }
}
