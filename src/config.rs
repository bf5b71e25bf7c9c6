use chrono::TimeDelta;
use chrono_tz::Tz;
use clap::ValueEnum;

use crate::{auth::CredentialPolicy, telemetry::Retention};

/// How rejected writes map onto HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusPolicy {
    /// Telemetry write failures are all reported as 500, matching deployed devices.
    #[default]
    Legacy,
    /// 400 for bad payloads, 401 for bad credentials, 429 for rate limiting.
    Strict,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub retention: Retention,
    pub wait_time: TimeDelta,
    pub credentials: CredentialPolicy,
    pub timezone: Tz,
    pub status_policy: StatusPolicy,
}

impl Config {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
