mod handlers;
mod responses;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use chrono_tz::Tz;
use tower_http::trace::TraceLayer;

pub use responses::*;

use crate::{
    clock::TimeProvider,
    config::{Config, StatusPolicy},
    monitor::Monitor,
};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
    pub timezone: Tz,
    pub status_policy: StatusPolicy,
}

impl AppState {
    pub fn new(config: &Config, clock: Arc<dyn TimeProvider>) -> Self {
        let monitor = Monitor::new(
            config.retention,
            config.wait_time,
            config.credentials.clone(),
            clock,
        );

        Self {
            monitor: Arc::new(monitor),
            timezone: config.timezone,
            status_policy: config.status_policy,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/get_data", get(handlers::get_data))
        .route("/api/put_reset", put(handlers::put_reset))
        .route("/api/update_status", post(handlers::update_status))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
