use crate::{
    api::users,
    auth::handlers,
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{Error, HttpRequest, error, guard, middleware::Condition, web};
use std::sync::Arc;
use tracing::debug;

/// Per-IP limits for each route group.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub enabled: bool,
    pub token_per_min: u32,
    pub register_per_min: u32,
    pub api_per_min: u32,
}

impl From<&Config> for RateLimits {
    fn from(config: &Config) -> Self {
        Self {
            enabled: config.rate_limit_enabled,
            token_per_min: config.rate_token_per_min,
            register_per_min: config.rate_register_per_min,
            api_per_min: config.rate_api_per_min,
        }
    }
}

impl RateLimits {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            token_per_min: 0,
            register_per_min: 0,
            api_per_min: 0,
        }
    }
}

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg: GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

// Extractor failures answer with the same `{"message"}` body as every other error.
fn json_error(err: error::JsonPayloadError, _: &HttpRequest) -> Error {
    debug!(error = %err, "Rejected request body");
    AppError::BadRequest("Invalid request body").into()
}

fn query_error(err: error::QueryPayloadError, _: &HttpRequest) -> Error {
    debug!(error = %err, "Rejected query string");
    AppError::BadRequest("Invalid query string").into()
}

pub fn configure(cfg: &mut web::ServiceConfig, limits: RateLimits) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));

    let token_limiter = Arc::new(build_limiter(limits.token_per_min));
    let register_limiter = Arc::new(build_limiter(limits.register_per_min));
    let api_limiter = Arc::new(build_limiter(limits.api_per_min));

    let api = || Condition::new(limits.enabled, api_limiter.clone());

    cfg.route("/", web::get().to(users::index))
        .service(
            web::resource("/jwt")
                .wrap(Condition::new(limits.enabled, token_limiter.clone()))
                .route(web::post().to(handlers::issue_token)),
        )
        .service(
            web::resource("/feedback")
                .wrap(api())
                .route(web::get().to(users::feedback)),
        )
        // POST /users
        .service(
            web::resource("/users")
                .guard(guard::Post())
                .wrap(Condition::new(limits.enabled, register_limiter.clone()))
                .route(web::post().to(users::register)),
        )
        // GET /users
        .service(
            web::resource("/users")
                .wrap(api())
                .route(web::get().to(users::get_users)),
        )
        .service(
            web::resource("/users/admin/{email}")
                .wrap(api())
                .route(web::get().to(handlers::admin_status)),
        )
        // PATCH /users/{id}
        .service(
            web::resource("/users/{id}")
                .wrap(api())
                .route(web::patch().to(users::apply_action)),
        )
        .service(
            web::resource("/users/{id}/performance")
                .wrap(api())
                .route(web::patch().to(users::set_performance)),
        )
        .service(
            web::resource("/users/{id}/communication/reset")
                .wrap(api())
                .route(web::patch().to(users::reset_communication)),
        )
        .service(
            web::resource("/users/{id}/payroll/reset")
                .wrap(api())
                .route(web::patch().to(users::reset_payroll)),
        )
        .service(
            web::resource("/users/{id}/performance/reset")
                .wrap(api())
                .route(web::patch().to(users::reset_performance)),
        )
        .service(
            web::resource("/users/{id}/attendance/delete")
                .wrap(api())
                .route(web::patch().to(users::delete_attendance)),
        );
}
