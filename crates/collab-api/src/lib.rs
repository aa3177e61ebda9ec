//! HTTP surface of the marketplace: cookie sessions, profiles, listings,
//! projects, the two-step match handshake and matches.

pub mod auth;
pub mod error;
pub mod extract;
pub mod listings;
pub mod matches;
pub mod middleware;
pub mod profile;
pub mod projects;
pub mod requests;
pub mod system;
pub mod uploads;
pub mod views;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Multipart overhead on top of the logo itself.
const LOGO_BODY_LIMIT: usize = uploads::MAX_LOGO_SIZE + 64 * 1024;

/// All `/api` routes plus static `/uploads`. CORS and tracing are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(system::health))
        .route("/api/privacy", get(system::privacy))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    let protected_routes = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/consents", post(system::record_consent))
        // profiles
        .route(
            "/api/profile/me",
            get(profile::get_my_profile).put(profile::update_my_profile),
        )
        .route(
            "/api/profile/me/logo",
            post(uploads::upload_logo).layer(DefaultBodyLimit::max(LOGO_BODY_LIMIT)),
        )
        .route("/api/profile/{user_id}", get(profile::get_public_profile))
        // listings
        .route(
            "/api/listings",
            get(listings::search_listings).post(listings::create_listing),
        )
        .route("/api/listings/mine", get(listings::my_listings))
        .route(
            "/api/listings/{id}",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route("/api/listings/{id}/publish", post(listings::publish_listing))
        .route("/api/listings/{id}/unpublish", post(listings::unpublish_listing))
        // projects
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            put(projects::update_project).delete(projects::delete_project),
        )
        // match requests
        .route("/api/match-requests", post(requests::create_request))
        .route("/api/match-requests/incoming", get(requests::incoming_requests))
        .route("/api/match-requests/outgoing", get(requests::outgoing_requests))
        .route("/api/match-requests/{id}/accept", post(requests::accept_request))
        .route("/api/match-requests/{id}/confirm", post(requests::confirm_request))
        .route("/api/match-requests/{id}/reject", post(requests::reject_request))
        .route("/api/match-requests/{id}/cancel", post(requests::cancel_request))
        // matches
        .route("/api/matches", get(matches::list_matches))
        .route("/api/matches/{id}", get(matches::get_match))
        .route("/api/matches/{id}/terminate", post(matches::end_match))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .with_state(state)
}
