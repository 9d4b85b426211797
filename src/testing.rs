//! In-memory diagnostics server used by unit tests

use std::collections::HashSet;
use std::sync::Mutex;

use crate::client::{DiagnosticsApi, DEFAULT_REPORT_NAME};
use crate::error::ApiError;
use crate::model::{
    MultiPingEntry, PingResult, PingStatus, PortResult, PortStatus, ReportFile, SpeedResult,
    SystemInfo,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SystemInfo,
    Ping,
    PortTest,
    SpeedTest,
    PingMultiple,
    ExportReport,
}

/// A recorded request
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SystemInfo,
    Ping(String),
    PortTest(String, u16),
    SpeedTest,
    PingMultiple(String),
    ExportReport,
}

/// Answers from fixed data.
///
/// Targets starting with `10.` or equal to `192.168.1.1` are unreachable.
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    failing: HashSet<Endpoint>,
    port_status: PortStatus,
    system_info: SystemInfo,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            port_status: PortStatus::Open,
            system_info: SystemInfo {
                os: Some("Linux".into()),
                version: Some("#1 SMP".into()),
                architecture: None,
                processor_name: Some("x86_64".into()),
                cpu_usage: Some("23.5 %".into()),
                ram_usage: Some("61.0 %".into()),
            },
        }
    }

    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn with_port_status(mut self, status: PortStatus) -> Self {
        self.port_status = status;
        self
    }

    pub fn with_system_info(mut self, info: SystemInfo) -> Self {
        self.system_info = info;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: Endpoint, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(&endpoint) {
            return Err(ApiError::Server {
                endpoint: "fake",
                message: "server exploded".to_string(),
            });
        }
        Ok(())
    }
}

fn reachable(target: &str) -> bool {
    !(target.starts_with("10.") || target == "192.168.1.1")
}

fn latency(target: &str) -> f64 {
    match target {
        "8.8.8.8" => 0.125,
        "1.1.1.1" => 0.0625,
        _ => 0.25,
    }
}

impl DiagnosticsApi for FakeApi {
    fn system_info(&self) -> Result<SystemInfo, ApiError> {
        self.record(Endpoint::SystemInfo, Call::SystemInfo)?;
        Ok(self.system_info.clone())
    }

    fn ping(&self, target: &str) -> Result<PingResult, ApiError> {
        self.record(Endpoint::Ping, Call::Ping(target.to_string()))?;
        Ok(if reachable(target) {
            PingResult {
                target: target.to_string(),
                status: PingStatus::Reachable,
                response_time: Some(format!("{:.2} sec", latency(target))),
                response_time_secs: Some(latency(target)),
            }
        } else {
            PingResult {
                target: target.to_string(),
                status: PingStatus::Unreachable,
                response_time: None,
                response_time_secs: None,
            }
        })
    }

    fn port_test(&self, target: &str, port: u16) -> Result<PortResult, ApiError> {
        self.record(Endpoint::PortTest, Call::PortTest(target.to_string(), port))?;
        Ok(PortResult {
            target: target.to_string(),
            port,
            status: self.port_status,
        })
    }

    fn speed_test(&self) -> Result<SpeedResult, ApiError> {
        self.record(Endpoint::SpeedTest, Call::SpeedTest)?;
        Ok(SpeedResult {
            download: "94.21 Mbps".into(),
            upload: "18.50 Mbps".into(),
            ping: "12.30 ms".into(),
            download_mbps: 94.21,
            upload_mbps: 18.5,
        })
    }

    fn ping_multiple(&self, targets: &str) -> Result<Vec<MultiPingEntry>, ApiError> {
        self.record(Endpoint::PingMultiple, Call::PingMultiple(targets.to_string()))?;
        Ok(targets
            .split(',')
            .map(str::trim)
            .map(|ip| {
                let up = reachable(ip);
                MultiPingEntry {
                    ip: ip.to_string(),
                    status: if up { PingStatus::Reachable } else { PingStatus::Unreachable },
                    response_time: up.then(|| format!("{:.2} sec", latency(ip))),
                    response_time_secs: up.then(|| latency(ip)),
                }
            })
            .collect())
    }

    fn export_report(&self) -> Result<ReportFile, ApiError> {
        self.record(Endpoint::ExportReport, Call::ExportReport)?;
        Ok(ReportFile {
            filename: DEFAULT_REPORT_NAME.to_string(),
            bytes: b"=== System Information ===\nsystem,Linux\n".to_vec(),
        })
    }
}
