use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::{
    error::Error,
    format::{NEVER, readable_or_never},
    monitor::Snapshot,
    telemetry::Reading,
};

pub const SUCCESS: &str = "success";
pub const ERROR: &str = "error";

/// Seconds since an event, or `"Never"` if it has not happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elapsed {
    Seconds(i64),
    Never,
}

impl From<Option<i64>> for Elapsed {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Elapsed::Never, Elapsed::Seconds)
    }
}

impl Serialize for Elapsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Elapsed::Seconds(s) => serializer.serialize_i64(*s),
            Elapsed::Never => serializer.serialize_str(NEVER),
        }
    }
}

/// Body of `GET /api/get_data`.
///
/// Unset timestamps are reported as `0`, with the matching `text_*` and
/// `*_delta` fields set to `"Never"`. The reset time is emitted under both its
/// current and legacy field names. `pc_status` and `last_motion_detected` are
/// fixed values kept for web clients that still read them.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse {
    pub status: &'static str,
    pub data: Vec<Reading>,
    pub total_records: usize,
    pub last_reset: i64,
    pub text_last_reset: String,
    pub last_pwr_trigger: i64,
    pub text_last_pwr_trigger: String,
    pub last_ping: i64,
    pub text_last_ping: String,
    pub ping_delta: Elapsed,
    pub reset_delta: Elapsed,
    pub pc_status: bool,
    pub last_motion_detected: i64,
}

impl DataResponse {
    pub fn new(snapshot: Snapshot, timezone: Tz) -> Self {
        let control = snapshot.control;
        let text_last_reset = readable_or_never(control.last_reset_trigger, timezone);

        Self {
            status: SUCCESS,
            data: snapshot.data,
            total_records: snapshot.total_records,
            last_reset: control.last_reset_trigger.unwrap_or(0),
            text_last_pwr_trigger: text_last_reset.clone(),
            text_last_reset,
            last_pwr_trigger: control.last_reset_trigger.unwrap_or(0),
            last_ping: control.last_ping.unwrap_or(0),
            text_last_ping: readable_or_never(control.last_ping, timezone),
            ping_delta: control.ping_delta().into(),
            reset_delta: control.reset_delta().into(),
            pc_status: false,
            last_motion_detected: 0,
        }
    }
}

/// Body of a successful `POST /api/update_status`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub last_pwr_trigger: i64,
}

/// Body of a successful `PUT /api/put_reset`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub reset_time: i64,
    pub last_pwr_trigger: i64,
    pub readable_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

/// A rejected request, rendered as `{"status":"error","message":...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &Error) -> Self {
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: ERROR,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// The status code each error kind maps to when not constrained by legacy clients.
pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::control::ControlStatus;

    #[test]
    fn unset_fields_render_as_never() {
        let snapshot = Snapshot {
            data: Vec::new(),
            total_records: 0,
            control: ControlStatus {
                now: 1_000,
                last_ping: None,
                last_reset_trigger: None,
            },
        };

        let body = serde_json::to_value(DataResponse::new(snapshot, Tz::UTC)).unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["last_ping"], 0);
        assert_eq!(body["last_reset"], 0);
        assert_eq!(body["text_last_ping"], "Never");
        assert_eq!(body["text_last_reset"], "Never");
        assert_eq!(body["text_last_pwr_trigger"], "Never");
        assert_eq!(body["ping_delta"], "Never");
        assert_eq!(body["reset_delta"], "Never");
        assert_eq!(body["pc_status"], false);
        assert_eq!(body["last_motion_detected"], 0);
    }

    #[test]
    fn set_fields_render_deltas_and_readings() {
        let snapshot = Snapshot {
            data: vec![Reading::new(990, Some(21.5), None)],
            total_records: 1,
            control: ControlStatus {
                now: 1_000,
                last_ping: Some(990),
                last_reset_trigger: Some(900),
            },
        };

        let body = serde_json::to_value(DataResponse::new(snapshot, Tz::UTC)).unwrap();

        assert_eq!(
            body["data"],
            json!([{ "timestamp": 990, "temperature": 21.5, "humidity": null }])
        );
        assert_eq!(body["total_records"], 1);
        assert_eq!(body["last_ping"], 990);
        assert_eq!(body["last_pwr_trigger"], 900);
        assert_eq!(body["ping_delta"], 10);
        assert_eq!(body["reset_delta"], 100);
        assert_eq!(body["text_last_ping"], "Thu Jan  1 00:16:30 1970");
    }

    #[test]
    fn strict_status_codes() {
        assert_eq!(status_for(&Error::invalid_request("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&Error::unauthorized("x")), StatusCode::UNAUTHORIZED);
    }
}
