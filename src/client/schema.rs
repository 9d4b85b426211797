//! Per-endpoint wire shapes and their validation into `model` types

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::{
    MultiPingEntry, PingResult, PingStatus, PortResult, PortStatus, SpeedResult, SystemInfo,
};

// ── Envelope handling ────────────────────────────────────────────────

/// Decode a response body.
///
/// An `error` field wins over everything else, then the HTTP status, then
/// the endpoint's schema.
pub(crate) fn decode<W: DeserializeOwned>(
    endpoint: &'static str,
    status: u16,
    body: &str,
) -> Result<W, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode {
        endpoint,
        message: e.to_string(),
    })?;

    if let Some(message) = error_message(&value) {
        return Err(ApiError::Server { endpoint, message });
    }

    if !(200..300).contains(&status) {
        return Err(ApiError::Status { endpoint, status });
    }

    if !value.is_object() {
        return Err(ApiError::malformed(endpoint, "expected a JSON object"));
    }

    serde_json::from_value(value).map_err(|e| ApiError::malformed(endpoint, e.to_string()))
}

fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(Value::Object(obj.clone()).to_string())),
        other => Some(other.to_string()),
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

// ── /api/system-info ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct SystemInfoWire {
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    architecture: Option<String>,
    #[serde(default)]
    processor: Option<String>,
    #[serde(default)]
    cpu_usage: Option<String>,
    #[serde(default)]
    ram_usage: Option<String>,
}

impl From<SystemInfoWire> for SystemInfo {
    fn from(wire: SystemInfoWire) -> Self {
        Self {
            os: non_empty(wire.system),
            version: non_empty(wire.version),
            architecture: non_empty(wire.architecture),
            processor_name: non_empty(wire.processor),
            cpu_usage: non_empty(wire.cpu_usage),
            ram_usage: non_empty(wire.ram_usage),
        }
    }
}

// ── /api/ping ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct PingWire {
    target: String,
    status: PingStatus,
    #[serde(default)]
    response_time: Option<String>,
    #[serde(default)]
    response_time_raw: Option<f64>,
}

impl PingWire {
    pub(crate) fn validate(self, endpoint: &'static str) -> Result<PingResult, ApiError> {
        let response_time = non_empty(self.response_time);
        if self.status.is_reachable() && response_time.is_none() {
            return Err(ApiError::malformed(
                endpoint,
                "reachable target without response_time",
            ));
        }
        Ok(PingResult {
            target: self.target,
            status: self.status,
            response_time,
            response_time_secs: self.response_time_raw,
        })
    }
}

// ── /api/port-test ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct PortWire {
    target: String,
    port: u16,
    status: PortStatus,
}

impl From<PortWire> for PortResult {
    fn from(wire: PortWire) -> Self {
        Self {
            target: wire.target,
            port: wire.port,
            status: wire.status,
        }
    }
}

// ── /api/speed-test ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct SpeedWire {
    download: String,
    upload: String,
    ping: String,
    download_raw: f64,
    upload_raw: f64,
}

impl From<SpeedWire> for SpeedResult {
    fn from(wire: SpeedWire) -> Self {
        Self {
            download: wire.download,
            upload: wire.upload,
            ping: wire.ping,
            download_mbps: wire.download_raw,
            upload_mbps: wire.upload_raw,
        }
    }
}

// ── /api/ping-multiple ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct MultiPingWire {
    results: Vec<MultiPingEntryWire>,
}

#[derive(Debug, Deserialize)]
struct MultiPingEntryWire {
    ip: String,
    status: PingStatus,
    #[serde(default)]
    response_time: Option<String>,
    #[serde(default)]
    response_time_raw: Option<f64>,
}

impl From<MultiPingWire> for Vec<MultiPingEntry> {
    fn from(wire: MultiPingWire) -> Self {
        wire.results
            .into_iter()
            .map(|r| MultiPingEntry {
                ip: r.ip,
                status: r.status,
                response_time: non_empty(r.response_time),
                response_time_secs: r.response_time_raw,
            })
            .collect()
    }
}
