use crate::{api::leave_request, auth::handlers, config::Config, error::ApiError};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, get, web};
use serde_json::json;
use std::sync::Arc;

#[get("/")]
async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Leave Management System Backend is running."
    }))
}

/// Browser clients live on another origin and send `Authorization`, so every
/// call is preflighted.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    let signin_limiter = Arc::new(build_limiter(config.rate_signin_per_min));
    let signup_limiter = Arc::new(build_limiter(config.rate_signup_per_min));

    // Malformed bodies (bad dates, missing fields) get the same envelope as
    // every other validation failure.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::validation("body", err.to_string()).into()
    }));

    // Public routes
    cfg.service(index)
        .service(
            web::resource("/signup")
                .wrap(signup_limiter)
                .route(web::post().to(handlers::signup)),
        )
        .service(
            web::resource("/signin")
                .wrap(signin_limiter)
                .route(web::post().to(handlers::signin)),
        );

    // Bearer-protected routes; the `Principal` extractor authenticates.
    cfg.service(web::resource("/signout").route(web::post().to(handlers::signout)))
        .service(
            web::resource("/leave")
                .route(web::get().to(leave_request::my_leaves))
                .route(web::post().to(leave_request::create_leave)),
        )
        .service(web::resource("/leaves/all").route(web::get().to(leave_request::all_leaves)))
        .service(
            web::resource("/leave/{leave_id}").route(web::delete().to(leave_request::delete_leave)),
        )
        .service(
            web::resource("/leave/{leave_id}/approve")
                .route(web::post().to(leave_request::approve_leave)),
        )
        .service(
            web::resource("/leave/{leave_id}/reject")
                .route(web::post().to(leave_request::reject_leave)),
        );
}

// SIGNUP / SIGNIN
//  └─ token (TOKEN_TTL, default 1 hour)

// API REQUEST
//  └─ Authorization: Bearer token
//       └─ role looked up per request

// SIGNOUT
//  └─ token jti revoked until expiry
