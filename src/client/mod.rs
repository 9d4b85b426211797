//! HTTP client for the diagnostics server
//!
//! All endpoints are plain `GET` requests returning JSON, except the report
//! export which returns a CSV attachment.

pub mod schema;

use std::time::Duration;

use reqwest::header::CONTENT_DISPOSITION;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::model::{MultiPingEntry, PingResult, PortResult, ReportFile, SpeedResult, SystemInfo};
use schema::{MultiPingWire, PingWire, PortWire, SpeedWire, SystemInfoWire};

pub const SYSTEM_INFO: &str = "/api/system-info";
pub const PING: &str = "/api/ping";
pub const PORT_TEST: &str = "/api/port-test";
pub const SPEED_TEST: &str = "/api/speed-test";
pub const PING_MULTIPLE: &str = "/api/ping-multiple";
pub const EXPORT_REPORT: &str = "/api/export-report";

/// Filename used when the server does not name the attachment
pub const DEFAULT_REPORT_NAME: &str = "network_diagnostic_report.csv";

/// The server operations the dashboard depends on.
///
/// Actions are written against this trait so they can run against the real
/// server or an in-memory stand-in.
pub trait DiagnosticsApi: Send + Sync {
    fn system_info(&self) -> Result<SystemInfo, ApiError>;

    fn ping(&self, target: &str) -> Result<PingResult, ApiError>;

    fn port_test(&self, target: &str, port: u16) -> Result<PortResult, ApiError>;

    /// Can take around 30 seconds server-side.
    fn speed_test(&self) -> Result<SpeedResult, ApiError>;

    /// `targets` is forwarded verbatim; the server splits on commas.
    fn ping_multiple(&self, targets: &str) -> Result<Vec<MultiPingEntry>, ApiError>;

    fn export_report(&self) -> Result<ReportFile, ApiError>;
}

/// Blocking `reqwest` implementation of [`DiagnosticsApi`].
///
/// Calls are made from the worker thread, never from the UI thread.
pub struct HttpClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpClient {
    /// Build a client for `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded, so a hung server keeps
    /// the loading indicator up until it answers.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    fn get<W: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<W, ApiError> {
        let url = self.url(endpoint)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        schema::decode(endpoint, status, &body)
    }
}

/// Base URL with a trailing slash so endpoint paths join under it.
fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Pull `filename=` out of a `Content-Disposition` header value.
fn attachment_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

impl DiagnosticsApi for HttpClient {
    fn system_info(&self) -> Result<SystemInfo, ApiError> {
        let wire: SystemInfoWire = self.get(SYSTEM_INFO, &[])?;
        Ok(wire.into())
    }

    fn ping(&self, target: &str) -> Result<PingResult, ApiError> {
        let wire: PingWire = self.get(PING, &[("ip", target.to_string())])?;
        wire.validate(PING)
    }

    fn port_test(&self, target: &str, port: u16) -> Result<PortResult, ApiError> {
        let wire: PortWire = self.get(
            PORT_TEST,
            &[("ip", target.to_string()), ("port", port.to_string())],
        )?;
        Ok(wire.into())
    }

    fn speed_test(&self) -> Result<SpeedResult, ApiError> {
        let wire: SpeedWire = self.get(SPEED_TEST, &[])?;
        Ok(wire.into())
    }

    fn ping_multiple(&self, targets: &str) -> Result<Vec<MultiPingEntry>, ApiError> {
        let wire: MultiPingWire = self.get(PING_MULTIPLE, &[("ips", targets.to_string())])?;
        Ok(wire.into())
    }

    fn export_report(&self) -> Result<ReportFile, ApiError> {
        let url = self.url(EXPORT_REPORT)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: EXPORT_REPORT,
                status: status.as_u16(),
            });
        }

        let filename = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string());
        let bytes = resp.bytes()?.to_vec();

        Ok(ReportFile { filename, bytes })
    }
}
