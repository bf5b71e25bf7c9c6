use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::telemetry::Reading;

/// Retention policy for [`TelemetryHistory`].
///
/// Once the history grows past `max_history` it is cut back to the newest
/// `retain_count` readings in one go, so trimming happens at most once every
/// `max_history - retain_count` appends rather than on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    max_history: usize,
    retain_count: usize,
}

impl Retention {
    pub fn new(max_history: usize, retain_count: usize) -> Result<Self> {
        if max_history == 0 {
            bail!("max history must be at least 1");
        }

        if retain_count >= max_history {
            bail!(
                "retain count must be smaller than max history: retain_count={retain_count}, max_history={max_history}"
            );
        }

        Ok(Self {
            max_history,
            retain_count,
        })
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn retain_count(&self) -> usize {
        self.retain_count
    }
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            max_history: 15000,
            retain_count: 14800,
        }
    }
}

/// Bounded, append-only history of readings in arrival order.
#[derive(Debug, Clone)]
pub struct TelemetryHistory {
    readings: VecDeque<Reading>,
    retention: Retention,
}

impl TelemetryHistory {
    pub fn new(retention: Retention) -> Self {
        Self {
            readings: VecDeque::new(),
            retention,
        }
    }

    /// Appends `reading` and applies the retention policy.
    ///
    /// Returns how many of the oldest readings were discarded, which is zero
    /// unless this append pushed the history past `max_history`.
    pub fn append(&mut self, reading: Reading) -> usize {
        self.readings.push_back(reading);

        if self.readings.len() <= self.retention.max_history {
            return 0;
        }

        let excess = self.readings.len() - self.retention.retain_count;
        self.readings.drain(..excess);
        excess
    }

    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.iter().copied().collect()
    }

    /// The newest `n` readings, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Reading> {
        let skip = self.readings.len().saturating_sub(n);
        self.readings.iter().skip(skip).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.back()
    }
}
