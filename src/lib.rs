//! Roadmap service for a feedback board.
//!
//! Administrators arrange ordered columns ("Planned", "In Progress", ...);
//! collaborators place posts into them. See [`api::RoadmapApi`] for the HTTP
//! surface and [`store::RoadmapStore`] for persistence.

use std::sync::Arc;

use poem::{
    middleware::{Cors, Tracing},
    Endpoint, EndpointExt, Route,
};
use poem_openapi::OpenApiService;

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod migration;
pub mod models;
pub mod slug;
pub mod store;
pub mod validate;

use api::{AppState, RoadmapApi};
use auth::Authenticator;
use store::RoadmapStore;

pub const API_PREFIX: &str = "/api/v1";

/// Assemble the HTTP application: the roadmap API under [`API_PREFIX`] and
/// its Swagger UI under `/docs`. Request binding failures are rendered as
/// JSON error envelopes.
pub fn build_app(store: RoadmapStore, authenticator: Arc<Authenticator>) -> impl Endpoint {
    let state = Arc::new(AppState { store });

    let api = OpenApiService::new(
        RoadmapApi::new(state),
        "Roadmap API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(API_PREFIX);
    let ui = api.swagger_ui();

    Route::new()
        .nest(API_PREFIX, api)
        .nest("/docs", ui)
        .catch_all_error(error::render_request_error)
        .with(Cors::new())
        .with(Tracing)
        .data(authenticator)
}
