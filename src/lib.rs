pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod control;
pub mod error;
pub mod format;
pub mod monitor;
pub mod telemetry;
