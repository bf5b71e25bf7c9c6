use serde::Serialize;

/// A single sensor report, stamped with the server time it was accepted at.
///
/// Either sensor value may be missing when the device failed to read it; the
/// store keeps whatever was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: i64,

    pub temperature: Option<f64>,

    pub humidity: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: i64, temperature: Option<f64>, humidity: Option<f64>) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
        }
    }
}
