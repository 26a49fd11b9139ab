//! Family-map data core: builds the user's family graph from service records
//! and answers the filtered, search, and map-line queries the UI needs.
//!
//! The `api`, `auth`, `config`, and `sweeper` modules host that core behind a
//! small HTTP surface.

pub mod api;
pub mod auth;
pub mod classify;
pub mod config;
pub mod error;
pub mod filters;
pub mod graph;
pub mod lines;
pub mod models;
pub mod palette;
pub mod query;
pub mod session;
pub mod sweeper;

#[cfg(test)]
mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, models::SessionRecord};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(api::healthz))
        .route("/v1/sessions", post(api::open_session))
        .route(
            "/v1/sessions/{session_id}",
            get(api::get_session).delete(api::close_session),
        )
        .route(
            "/v1/sessions/{session_id}/family",
            put(api::replace_family),
        )
        .route(
            "/v1/sessions/{session_id}/filters",
            get(api::get_filters).put(api::put_filters),
        )
        .route("/v1/sessions/{session_id}/people", get(api::list_people))
        .route(
            "/v1/sessions/{session_id}/people/{person_id}",
            get(api::get_person),
        )
        .route("/v1/sessions/{session_id}/events", get(api::list_events))
        .route(
            "/v1/sessions/{session_id}/events/{event_id}/lines",
            get(api::event_lines),
        )
        .route("/v1/sessions/{session_id}/search", get(api::search))
        .route(
            "/v1/sessions/{session_id}/event-types",
            get(api::event_types),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
