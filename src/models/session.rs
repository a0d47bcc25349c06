use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted recognition session as the session store reports it. The id
/// is assigned by the store and opaque to this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub total_recognitions: u64,
    #[serde(default)]
    pub average_confidence: f64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Body of `POST /sessions`. A fresh session always starts with zeroed
/// totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub total_recognitions: u64,
    pub average_confidence: f64,
}

/// Body of `PATCH /sessions/{id}`. Only the fields that are set reach the
/// wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_recognitions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Body of `POST /predictions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPrediction {
    pub session_id: String,
    pub gesture: String,
    pub confidence: f64,
}
