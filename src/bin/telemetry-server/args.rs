use anyhow::{Context as _, Result};
use chrono::TimeDelta;
use chrono_tz::Tz;
use clap::Parser;
use home_telemetry::{
    auth::{AuthScope, CredentialPolicy},
    config::{Config, ServerConfig, StatusPolicy},
    telemetry::Retention,
};

#[derive(Debug, Parser)]
#[command(version, about = "Temperature/humidity telemetry and power-reset service")]
pub struct Args {
    #[arg(long, env = "TELEMETRY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "TELEMETRY_PORT", default_value_t = 5000)]
    pub port: u16,

    /// History length that triggers a trim.
    #[arg(long, env = "TELEMETRY_MAX_HISTORY", default_value_t = 15000)]
    pub max_history: usize,

    /// History length left after a trim.
    #[arg(long, env = "TELEMETRY_RETAIN_COUNT", default_value_t = 14800)]
    pub retain_count: usize,

    /// Minimum seconds between accepted telemetry writes.
    #[arg(long, env = "TELEMETRY_WAIT_TIME", default_value_t = 1)]
    pub wait_time: u32,

    #[arg(long, env = "TELEMETRY_CREDENTIALS", hide_env_values = true)]
    pub credentials: Option<String>,

    #[arg(long, env = "TELEMETRY_AUTH_SCOPE", value_enum, default_value_t = AuthScope::All)]
    pub auth_scope: AuthScope,

    #[arg(long, env = "TELEMETRY_STATUS_CODES", value_enum, default_value_t = StatusPolicy::Legacy)]
    pub status_codes: StatusPolicy,

    #[arg(long, env = "TZ", default_value = "UTC")]
    pub timezone: Tz,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        let retention = Retention::new(self.max_history, self.retain_count)
            .context("invalid retention settings")?;
        let credentials = CredentialPolicy::new(self.credentials, self.auth_scope)
            .context("invalid credential settings")?;

        Ok(Config {
            server: ServerConfig {
                host: self.host,
                port: self.port,
            },
            retention,
            wait_time: TimeDelta::seconds(self.wait_time.into()),
            credentials,
            timezone: self.timezone,
            status_policy: self.status_codes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_credentials() {
        let args = Args::try_parse_from(["telemetry-server"]).unwrap();

        assert!(args.into_config().is_err());
    }

    #[test]
    fn parses_full_configuration() {
        let args = Args::try_parse_from([
            "telemetry-server",
            "--port",
            "8080",
            "--max-history",
            "150",
            "--retain-count",
            "100",
            "--credentials",
            "s3cret",
            "--auth-scope",
            "reset",
            "--status-codes",
            "strict",
            "--timezone",
            "Asia/Tokyo",
        ])
        .unwrap();

        let config = args.into_config().unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:8080");
        assert_eq!(config.retention.max_history(), 150);
        assert_eq!(config.retention.retain_count(), 100);
        assert_eq!(config.wait_time, TimeDelta::seconds(1));
        assert_eq!(config.credentials.scope(), AuthScope::Reset);
        assert_eq!(config.status_policy, StatusPolicy::Strict);
        assert_eq!(config.timezone, Tz::Asia__Tokyo);
    }

    #[test]
    fn rejects_retain_count_above_max_history() {
        let args = Args::try_parse_from([
            "telemetry-server",
            "--auth-scope",
            "none",
            "--max-history",
            "150",
            "--retain-count",
            "150",
        ])
        .unwrap();

        assert!(args.into_config().is_err());
    }
}
