use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use tracing::debug;

use crate::{
    auth::{Action, CredentialPolicy},
    clock::TimeProvider,
    control::{ControlState, ControlStatus},
    error::{Error, Result},
    telemetry::{Reading, Retention, TelemetryHistory},
};

pub const INVALID_SUBMISSION: &str = "Could not get valid data";
pub const WRONG_SUBMISSION_CREDENTIALS: &str = "Wrong credentials.";
pub const MISSING_RESET_BODY: &str = "No data provided";
pub const WRONG_RESET_CREDENTIALS: &str = "Invalid credentials";

/// A decoded telemetry write from the device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub credentials: Option<String>,
}

/// A decoded power-reset request from the web client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetRequest {
    pub credentials: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accepted {
    pub reading: Reading,
    pub trimmed: usize,
    pub last_reset_trigger: Option<i64>,
}

/// Everything the status endpoint reports, read under a single lock.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub data: Vec<Reading>,
    pub total_records: usize,
    pub control: ControlStatus,
}

#[derive(Debug)]
struct Inner {
    history: TelemetryHistory,
    control: ControlState,
}

/// Owner of the telemetry history and control state.
///
/// Both live behind one mutex so a reader never sees a history that is out of
/// step with the liveness fields, and so the rate-limit check and the append
/// it guards cannot interleave with another write.
pub struct Monitor {
    inner: Mutex<Inner>,
    credentials: CredentialPolicy,
    clock: Arc<dyn TimeProvider>,
}

impl Monitor {
    pub fn new(
        retention: Retention,
        wait_time: TimeDelta,
        credentials: CredentialPolicy,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                history: TelemetryHistory::new(retention),
                control: ControlState::new(wait_time),
            }),
            credentials,
            clock,
        }
    }

    /// Accepts a telemetry write.
    ///
    /// Checks run in order: rate limit, payload, credentials. `None` stands
    /// for a body that could not be decoded. A rejected write leaves both the
    /// history and `last_ping` untouched.
    pub fn submit(&self, submission: Option<Submission>) -> Result<Accepted> {
        let mut inner = self.lock();
        let now = self.clock.unix_now();

        inner.control.check_rate_limit(now)?;

        let Some(submission) = submission else {
            return Err(Error::invalid_request(INVALID_SUBMISSION));
        };

        if !self
            .credentials
            .authorize(Action::UpdateStatus, submission.credentials.as_deref())
        {
            return Err(Error::unauthorized(WRONG_SUBMISSION_CREDENTIALS));
        }

        let reading = Reading::new(now, submission.temperature, submission.humidity);
        let trimmed = inner.history.append(reading);
        if trimmed > 0 {
            debug!(trimmed, remaining = inner.history.len(), "trimmed telemetry history");
        }
        inner.control.record_ping(now);

        Ok(Accepted {
            reading,
            trimmed,
            last_reset_trigger: inner.control.status(now).last_reset_trigger,
        })
    }

    /// Records a power-reset trigger and returns its timestamp.
    ///
    /// When credentials are not required for resets the request body is
    /// optional.
    pub fn trigger_reset(&self, request: Option<ResetRequest>) -> Result<i64> {
        if self.credentials.requires(Action::TriggerReset) {
            let Some(request) = request else {
                return Err(Error::invalid_request(MISSING_RESET_BODY));
            };

            if !self
                .credentials
                .authorize(Action::TriggerReset, request.credentials.as_deref())
            {
                return Err(Error::unauthorized(WRONG_RESET_CREDENTIALS));
            }
        }

        let mut inner = self.lock();
        let now = self.clock.unix_now();
        inner.control.record_reset_trigger(now);

        Ok(now)
    }

    /// Reads the history and control state together. `limit` keeps only the
    /// newest readings in `data`; `total_records` is always the full length.
    pub fn snapshot(&self, limit: Option<usize>) -> Snapshot {
        let inner = self.lock();
        let now = self.clock.unix_now();

        let data = match limit {
            Some(n) => inner.history.tail(n),
            None => inner.history.snapshot(),
        };

        Snapshot {
            data,
            total_records: inner.history.len(),
            control: inner.control.status(now),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().history.is_empty()
    }

    // Every mutation is all-or-nothing, so state behind a poisoned lock is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
