//! # ridewatch-api
//!
//! HTTP boundary for ridewatch. Handlers extract bearer-token claims,
//! decode JSON bodies, call into `ridewatch-core` and `ridewatch-db`, and
//! translate core errors to status codes.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ridewatch_auth::TokenService;
use ridewatch_db::Database;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use middleware::{build_rate_limiter, GlobalRateLimiter, MakeRequestUuidV7};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
    /// Directory uploaded images are written to and served from.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Assemble state from a database handle and loaded configuration.
    pub fn from_config(db: Database, config: &ServerConfig) -> ridewatch_core::Result<Self> {
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl_secs)?;
        let rate_limiter = if config.rate_limit.enabled {
            Some(Arc::new(build_rate_limiter(&config.rate_limit)?))
        } else {
            None
        };
        Ok(Self {
            db,
            tokens: Arc::new(tokens),
            rate_limiter,
            upload_dir: config.file_storage_path.clone(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

/// Build the full application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    use handlers::*;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi::ApiDoc::openapi()))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/admin/login", post(auth::admin_login))
        // Accounts
        .route("/api/users", get(users::list_users).post(users::register_user))
        .route("/api/users/me", get(users::get_me))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/api/admins", get(admins::list_admins).post(admins::create_admin))
        // Vehicles and cameras
        .route(
            "/api/vehicles",
            get(vehicles::list_vehicles).post(vehicles::create_vehicle),
        )
        .route(
            "/api/vehicles/:id",
            get(vehicles::get_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .route(
            "/api/cameras",
            get(cameras::list_cameras).post(cameras::create_camera),
        )
        .route(
            "/api/cameras/:id",
            get(cameras::get_camera)
                .put(cameras::update_camera)
                .delete(cameras::delete_camera),
        )
        // Sightings
        .route(
            "/api/detections",
            get(detections::list_detections).post(detections::create_detection),
        )
        .route(
            "/api/detections/:id",
            get(detections::get_detection).delete(detections::delete_detection),
        )
        .route(
            "/api/suspects",
            get(suspects::list_suspects).post(suspects::create_suspect),
        )
        .route(
            "/api/suspects/:id",
            get(suspects::get_suspect).delete(suspects::delete_suspect),
        )
        // Images
        .route(
            "/api/images",
            post(images::upload_image).layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route("/api/images/:id", get(images::get_image))
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        // Lost reports
        .route(
            "/api/lost-reports",
            get(lost_reports::list_lost_reports).post(lost_reports::create_lost_report),
        )
        .route(
            "/api/lost-reports/:id",
            get(lost_reports::get_lost_report)
                .patch(lost_reports::update_lost_report)
                .delete(lost_reports::delete_lost_report),
        )
        .route(
            "/api/lost-reports/:id/result",
            get(lost_reports::get_lost_report_result),
        )
        // Middleware
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
