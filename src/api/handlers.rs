use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    api::{
        AppState,
        responses::{ApiError, DataResponse, ResetResponse, SUCCESS, UpdateResponse, status_for},
    },
    config::StatusPolicy,
    error::Error,
    format::readable_time,
    monitor::{ResetRequest, Submission},
};

#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SubmissionBody {
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    credentials: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResetBody {
    #[serde(default)]
    credentials: Option<String>,
}

/// A `limit` that does not parse is ignored and the full history is returned.
pub async fn get_data(
    State(state): State<AppState>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Json<DataResponse> {
    let limit = match query {
        Ok(Query(query)) => query.limit,
        Err(rejection) => {
            debug!("ignoring unusable query string: {rejection}");
            None
        }
    };
    let snapshot = state.monitor.snapshot(limit);

    Json(DataResponse::new(snapshot, state.timezone))
}

pub async fn update_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UpdateResponse>, ApiError> {
    let submission = decode_object::<SubmissionBody>(&body).map(|b| Submission {
        temperature: b.temperature,
        humidity: b.humidity,
        credentials: b.credentials,
    });

    let accepted = state.monitor.submit(submission).map_err(|err| {
        match &err {
            Error::RateLimited(_) => info!("rejected telemetry write: {err}"),
            _ => warn!("rejected telemetry write: {err}"),
        }

        let status = match state.status_policy {
            StatusPolicy::Legacy => StatusCode::INTERNAL_SERVER_ERROR,
            StatusPolicy::Strict => status_for(&err),
        };
        ApiError::new(status, &err)
    })?;

    debug!(
        timestamp = accepted.reading.timestamp,
        temperature = ?accepted.reading.temperature,
        humidity = ?accepted.reading.humidity,
        "accepted telemetry write"
    );

    Ok(Json(UpdateResponse {
        status: SUCCESS,
        message: "Data updated successfully",
        last_pwr_trigger: accepted.last_reset_trigger.unwrap_or(0),
    }))
}

pub async fn put_reset(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResetResponse>, ApiError> {
    let request = decode_object::<ResetBody>(&body).map(|b| ResetRequest {
        credentials: b.credentials,
    });

    let reset_time = state.monitor.trigger_reset(request).map_err(|err| {
        warn!("rejected power reset: {err}");
        ApiError::new(status_for(&err), &err)
    })?;

    info!(reset_time, "power reset triggered");

    Ok(Json(ResetResponse {
        status: SUCCESS,
        message: "Power trigger updated",
        reset_time,
        last_pwr_trigger: reset_time,
        readable_time: readable_time(reset_time, state.timezone),
    }))
}

/// Decodes a request body that must be a non-empty JSON object.
///
/// Anything else, including `{}` and `null`, counts as no usable data.
fn decode_object<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Option<T> {
    let map: Map<String, Value> = match serde_json::from_slice(body).ok()? {
        Value::Object(map) if !map.is_empty() => map,
        _ => return None,
    };

    serde_json::from_value(Value::Object(map)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_partial_submission() {
        let body: SubmissionBody = decode_object(br#"{"temperature": 21.5}"#).unwrap();

        assert_eq!(body.temperature, Some(21.5));
        assert_eq!(body.humidity, None);
        assert_eq!(body.credentials, None);
    }

    #[test]
    fn null_sensor_values_are_accepted() {
        let body: SubmissionBody =
            decode_object(br#"{"temperature": null, "humidity": 40, "credentials": "x"}"#)
                .unwrap();

        assert_eq!(body.temperature, None);
        assert_eq!(body.humidity, Some(40.0));
    }

    #[test]
    fn rejects_unusable_bodies() {
        assert!(decode_object::<SubmissionBody>(b"").is_none());
        assert!(decode_object::<SubmissionBody>(b"not json").is_none());
        assert!(decode_object::<SubmissionBody>(b"{}").is_none());
        assert!(decode_object::<SubmissionBody>(b"null").is_none());
        assert!(decode_object::<SubmissionBody>(b"[1, 2]").is_none());
        assert!(decode_object::<SubmissionBody>(br#"{"temperature": "warm"}"#).is_none());
    }
}
