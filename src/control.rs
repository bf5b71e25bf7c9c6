use chrono::TimeDelta;
use thiserror::Error;

/// A telemetry write arrived before the configured wait time elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Too fast, last API call was {elapsed} second(s) ago. Wait {wait} second(s)")]
pub struct RateLimitExceeded {
    pub elapsed: i64,
    pub wait: i64,
}

/// Liveness and power-reset bookkeeping.
///
/// `None` means the event has not happened since the process started, which
/// the rate limiter treats as infinitely long ago.
#[derive(Debug, Clone)]
pub struct ControlState {
    last_ping: Option<i64>,
    last_reset_trigger: Option<i64>,
    wait_time: TimeDelta,
}

impl ControlState {
    pub fn new(wait_time: TimeDelta) -> Self {
        Self {
            last_ping: None,
            last_reset_trigger: None,
            wait_time,
        }
    }

    pub fn wait_time(&self) -> TimeDelta {
        self.wait_time
    }

    pub fn check_rate_limit(&self, now: i64) -> Result<(), RateLimitExceeded> {
        let Some(last_ping) = self.last_ping else {
            return Ok(());
        };

        let elapsed = TimeDelta::seconds(now - last_ping);
        if elapsed < self.wait_time {
            return Err(RateLimitExceeded {
                elapsed: elapsed.num_seconds(),
                wait: self.wait_time.num_seconds(),
            });
        }

        Ok(())
    }

    pub fn record_ping(&mut self, now: i64) {
        self.last_ping = Some(now);
    }

    pub fn record_reset_trigger(&mut self, now: i64) {
        self.last_reset_trigger = Some(now);
    }

    pub fn status(&self, now: i64) -> ControlStatus {
        ControlStatus {
            now,
            last_ping: self.last_ping,
            last_reset_trigger: self.last_reset_trigger,
        }
    }
}

/// Point-in-time view of [`ControlState`], taken at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStatus {
    pub now: i64,
    pub last_ping: Option<i64>,
    pub last_reset_trigger: Option<i64>,
}

impl ControlStatus {
    pub fn ping_delta(&self) -> Option<i64> {
        self.last_ping.map(|t| self.now - t)
    }

    pub fn reset_delta(&self) -> Option<i64> {
        self.last_reset_trigger.map(|t| self.now - t)
    }
}
