//! Diagnostic actions
//!
//! Every action follows the same shape: validate input, show the loader and
//! hide the previous result, call one endpoint, map the response onto the
//! dashboard, log the outcome and clear the loader. The loader is cleared on
//! both success and failure. The dashboard lock is never held across a
//! request.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::client::DiagnosticsApi;
use crate::dashboard::{lock, parse_port, Dashboard, MultiPingRow};
use crate::model::ChartPoint;

/// How a single action ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// Input failed validation, no request was sent
    Rejected,
    /// Transport, decode or server error
    Failed,
}

impl StepOutcome {
    pub fn is_success(self) -> bool {
        self == StepOutcome::Completed
    }
}

pub fn refresh_system_info(state: &Mutex<Dashboard>, api: &dyn DiagnosticsApi) -> StepOutcome {
    {
        let mut dash = lock(state);
        dash.system.loading = true;
        dash.log.info("Fetching system information...");
    }

    let result = api.system_info();

    let mut dash = lock(state);
    let outcome = match result {
        Ok(system) => {
            let percentages = (system.cpu_percent(), system.ram_percent());
            dash.system.info = system;
            if dash.charts.has_system_gauges() {
                if let (Some(cpu), Some(ram)) = percentages {
                    dash.charts.update_system_charts(cpu, ram);
                }
            }
            dash.log.success("System information updated successfully");
            info!("system info refreshed");
            StepOutcome::Completed
        }
        Err(e) => {
            warn!("system info failed: {e}");
            dash.log.error(format!("Error fetching system information: {e}"));
            StepOutcome::Failed
        }
    };
    dash.system.loading = false;
    outcome
}

pub fn run_ping_test(state: &Mutex<Dashboard>, api: &dyn DiagnosticsApi) -> StepOutcome {
    let target = {
        let mut dash = lock(state);
        let target = dash.inputs.ping_target.trim().to_string();
        if target.is_empty() {
            dash.log.warning("Please enter an IP address or domain name");
            return StepOutcome::Rejected;
        }
        dash.ping.begin();
        dash.log.info(format!("Running ping test to {target}..."));
        target
    };

    let result = api.ping(&target);

    let mut dash = lock(state);
    let outcome = match result {
        Ok(ping) => {
            let status = ping.status;
            dash.ping.show(ping);
            let message = format!("Ping to {target} finished: {}", status.as_str());
            if status.is_reachable() {
                dash.log.success(message);
            } else {
                dash.log.error(message);
            }
            info!(target = %target, status = status.as_str(), "ping finished");
            StepOutcome::Completed
        }
        Err(e) => {
            warn!("ping to {target} failed: {e}");
            dash.log.error(format!("Error running ping test: {e}"));
            StepOutcome::Failed
        }
    };
    dash.ping.finish();
    outcome
}

pub fn run_port_test(state: &Mutex<Dashboard>, api: &dyn DiagnosticsApi) -> StepOutcome {
    let (target, port) = {
        let mut dash = lock(state);
        let target = dash.inputs.port_target.trim().to_string();
        if target.is_empty() {
            dash.log.warning("Please enter an IP address");
            return StepOutcome::Rejected;
        }
        let Some(port) = parse_port(&dash.inputs.port) else {
            dash.log.warning("Please enter a valid port number (1-65535)");
            return StepOutcome::Rejected;
        };
        dash.port.begin();
        dash.log.info(format!("Running port test {port} on {target}..."));
        (target, port)
    };

    let result = api.port_test(&target, port);

    let mut dash = lock(state);
    let outcome = match result {
        Ok(probe) => {
            let status = probe.status;
            dash.port.show(probe);
            let message = format!(
                "Port test {port} on {target} finished: {}",
                status.as_str()
            );
            if status.is_open() {
                dash.log.success(message);
            } else {
                dash.log.error(message);
            }
            info!(target = %target, port, status = status.as_str(), "port test finished");
            StepOutcome::Completed
        }
        Err(e) => {
            warn!("port test {target}:{port} failed: {e}");
            dash.log.error(format!("Error running port test: {e}"));
            StepOutcome::Failed
        }
    };
    dash.port.finish();
    outcome
}

pub fn run_speed_test(state: &Mutex<Dashboard>, api: &dyn DiagnosticsApi) -> StepOutcome {
    {
        let mut dash = lock(state);
        dash.speed.begin();
        dash.log.info("Running internet speed test...");
        dash.log.info("The test can take up to 30 seconds, please wait...");
    }

    let result = api.speed_test();

    let mut dash = lock(state);
    let outcome = match result {
        Ok(speed) => {
            dash.charts.update_speed_chart(speed.download_mbps, speed.upload_mbps);
            let message = format!(
                "Internet speed test finished. Download: {}, Upload: {}",
                speed.download, speed.upload
            );
            dash.speed.show(speed);
            dash.log.success(message);
            info!("speed test finished");
            StepOutcome::Completed
        }
        Err(e) => {
            warn!("speed test failed: {e}");
            dash.log.error(format!("Error running speed test: {e}"));
            StepOutcome::Failed
        }
    };
    dash.speed.finish();
    outcome
}

pub fn run_multi_ping_test(state: &Mutex<Dashboard>, api: &dyn DiagnosticsApi) -> StepOutcome {
    let targets = {
        let mut dash = lock(state);
        let targets = dash.inputs.multi_ping_targets.trim().to_string();
        if targets.is_empty() {
            dash.log.warning("Please enter at least one IP address");
            return StepOutcome::Rejected;
        }
        dash.multi_ping.begin();
        dash.log.info("Running multi-ping tests...");
        targets
    };

    let result = api.ping_multiple(&targets);

    let mut guard = lock(state);
    let dash = &mut *guard;
    let outcome = match result {
        Ok(entries) => {
            // Table is cleared, refilled row by row, then the chart follows.
            let table = dash.multi_ping.data.insert(Vec::with_capacity(entries.len()));
            let mut points = Vec::with_capacity(entries.len());
            for entry in &entries {
                table.push(MultiPingRow::from(entry));
                points.push(ChartPoint::from(entry));
            }
            dash.charts.update_multi_ping_chart(&points);
            dash.multi_ping.visible = true;
            dash.log.success("Multi-ping tests finished successfully");
            info!(hosts = entries.len(), "multi-ping finished");
            StepOutcome::Completed
        }
        Err(e) => {
            warn!("multi-ping failed: {e}");
            dash.log.error(format!("Error running multi-ping tests: {e}"));
            StepOutcome::Failed
        }
    };
    dash.multi_ping.finish();
    outcome
}

/// Where exported reports go when no download dir exists
pub fn report_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Download the CSV report and write it into `dir`.
pub fn export_report(
    state: &Mutex<Dashboard>,
    api: &dyn DiagnosticsApi,
    dir: &Path,
) -> StepOutcome {
    {
        let mut dash = lock(state);
        dash.exporting = true;
        dash.log.info("Exporting diagnostic report...");
    }

    let result = api
        .export_report()
        .map_err(|e| e.to_string())
        .and_then(|report| {
            let path = dir.join(&report.filename);
            std::fs::write(&path, &report.bytes)
                .map(|()| path)
                .map_err(|e| format!("could not write report: {e}"))
        });

    let mut dash = lock(state);
    let outcome = match result {
        Ok(path) => {
            dash.log.success(format!("Report exported to {}", path.display()));
            info!(path = %path.display(), "report exported");
            StepOutcome::Completed
        }
        Err(e) => {
            warn!("export failed: {e}");
            dash.log.error(format!("Error exporting report: {e}"));
            StepOutcome::Failed
        }
    };
    dash.exporting = false;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogLevel;
    use crate::model::{PingStatus, PortStatus, SystemInfo, NOT_AVAILABLE};
    use crate::testing::{Call, Endpoint, FakeApi};
    use pretty_assertions::assert_eq;

    fn state() -> Mutex<Dashboard> {
        Mutex::new(Dashboard::default())
    }

    fn last_level(state: &Mutex<Dashboard>) -> LogLevel {
        lock(state).log.entries().last().unwrap().level
    }

    #[test]
    fn system_info_fills_fields_and_gauges() {
        let state = state();
        let api = FakeApi::new();

        assert_eq!(refresh_system_info(&state, &api), StepOutcome::Completed);

        let dash = lock(&state);
        assert!(!dash.system.loading);
        assert_eq!(dash.system.rows()[0].1, "Linux");
        assert_eq!(dash.system.rows()[2].1, NOT_AVAILABLE);
        assert_eq!(dash.charts.cpu.as_ref().unwrap().data().values(), &[23.5, 76.5]);
        assert_eq!(dash.charts.ram.as_ref().unwrap().data().values(), &[61.0, 39.0]);
        assert_eq!(dash.log.entries().last().unwrap().level, LogLevel::Success);
    }

    #[test]
    fn unparsable_usage_leaves_gauges_alone() {
        let state = state();
        lock(&state).charts.update_system_charts(40.0, 70.0);
        let api = FakeApi::new().with_system_info(SystemInfo {
            cpu_usage: Some("N/A".into()),
            ..FakeApi::new().system_info().unwrap()
        });

        assert_eq!(refresh_system_info(&state, &api), StepOutcome::Completed);

        let dash = lock(&state);
        assert_eq!(dash.system.rows()[4], ("CPU USAGE", NOT_AVAILABLE));
        assert_eq!(dash.system.rows()[5].1, "61.0 %");
        assert_eq!(dash.charts.cpu.as_ref().unwrap().data().values(), &[40.0, 60.0]);
        assert_eq!(dash.charts.ram.as_ref().unwrap().data().values(), &[70.0, 30.0]);
        let last = dash.log.entries().last().unwrap();
        assert_eq!(last.level, LogLevel::Success);
        assert_eq!(last.message, "System information updated successfully");
    }

    #[test]
    fn system_info_failure_clears_loader() {
        let state = state();
        let api = FakeApi::new().failing(Endpoint::SystemInfo);

        assert_eq!(refresh_system_info(&state, &api), StepOutcome::Failed);

        let dash = lock(&state);
        assert!(!dash.system.loading);
        let last = dash.log.entries().last().unwrap();
        assert_eq!(last.level, LogLevel::Error);
        assert!(last.message.contains("server exploded"));
    }

    #[test]
    fn blank_inputs_send_no_request() {
        let state = state();
        let api = FakeApi::new();
        lock(&state).inputs = crate::dashboard::Inputs {
            ping_target: "   ".into(),
            port_target: "".into(),
            port: "80".into(),
            multi_ping_targets: "\t".into(),
        };

        assert_eq!(run_ping_test(&state, &api), StepOutcome::Rejected);
        assert_eq!(run_port_test(&state, &api), StepOutcome::Rejected);
        assert_eq!(run_multi_ping_test(&state, &api), StepOutcome::Rejected);

        assert!(api.calls().is_empty());
        let dash = lock(&state);
        assert_eq!(dash.log.len(), 3);
        assert!(dash.log.entries().iter().all(|e| e.level == LogLevel::Warning));
        assert!(!dash.ping.loading && !dash.port.loading && !dash.multi_ping.loading);
    }

    #[test]
    fn invalid_port_is_rejected_before_request() {
        for port in ["0", "65536", "abc"] {
            let state = state();
            let api = FakeApi::new();
            {
                let mut dash = lock(&state);
                dash.inputs.port_target = "192.168.1.1".into();
                dash.inputs.port = port.into();
            }
            assert_eq!(run_port_test(&state, &api), StepOutcome::Rejected, "port {port}");
            assert!(api.calls().is_empty());
            assert_eq!(last_level(&state), LogLevel::Warning);
        }
    }

    #[test]
    fn port_bounds_reach_the_server() {
        for port in ["1", "65535"] {
            let state = state();
            let api = FakeApi::new();
            {
                let mut dash = lock(&state);
                dash.inputs.port_target = " 10.0.0.1 ".into();
                dash.inputs.port = port.into();
            }
            assert_eq!(run_port_test(&state, &api), StepOutcome::Completed);
            assert_eq!(
                api.calls(),
                vec![Call::PortTest("10.0.0.1".into(), port.parse().unwrap())]
            );
        }
    }

    #[test]
    fn ping_sends_trimmed_target_and_shows_card() {
        let state = state();
        let api = FakeApi::new();
        lock(&state).inputs.ping_target = "  8.8.8.8 ".into();

        assert_eq!(run_ping_test(&state, &api), StepOutcome::Completed);

        assert_eq!(api.calls(), vec![Call::Ping("8.8.8.8".into())]);
        let dash = lock(&state);
        let card = dash.ping.shown().unwrap();
        assert_eq!(card.status, PingStatus::Reachable);
        assert!(!dash.ping.loading);
        assert_eq!(
            dash.log.entries().last().unwrap().message,
            "Ping to 8.8.8.8 finished: reachable"
        );
    }

    #[test]
    fn unreachable_ping_logs_error_level() {
        let state = state();
        let api = FakeApi::new();
        lock(&state).inputs.ping_target = "10.255.255.1".into();

        assert_eq!(run_ping_test(&state, &api), StepOutcome::Completed);
        assert_eq!(last_level(&state), LogLevel::Error);
        assert!(lock(&state).ping.visible);
    }

    #[test]
    fn failed_requests_hide_cards_and_clear_loaders() {
        let state = state();
        let api = FakeApi::new()
            .failing(Endpoint::Ping)
            .failing(Endpoint::PortTest)
            .failing(Endpoint::SpeedTest)
            .failing(Endpoint::PingMultiple);
        {
            let mut dash = lock(&state);
            dash.inputs.ping_target = "8.8.8.8".into();
            dash.inputs.port_target = "192.168.1.1".into();
            dash.inputs.multi_ping_targets = "8.8.8.8".into();
            // A previous successful render that must not stay on screen
            dash.speed.show(crate::model::SpeedResult {
                download: "1 Mbps".into(),
                upload: "1 Mbps".into(),
                ping: "1 ms".into(),
                download_mbps: 1.0,
                upload_mbps: 1.0,
            });
        }

        assert_eq!(run_ping_test(&state, &api), StepOutcome::Failed);
        assert_eq!(run_port_test(&state, &api), StepOutcome::Failed);
        assert_eq!(run_speed_test(&state, &api), StepOutcome::Failed);
        assert_eq!(run_multi_ping_test(&state, &api), StepOutcome::Failed);

        let dash = lock(&state);
        for (loading, visible) in [
            (dash.ping.loading, dash.ping.visible),
            (dash.port.loading, dash.port.visible),
            (dash.speed.loading, dash.speed.visible),
            (dash.multi_ping.loading, dash.multi_ping.visible),
        ] {
            assert!(!loading);
            assert!(!visible);
        }
        assert_eq!(dash.log.entries().last().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn port_closed_is_error_styled() {
        let state = state();
        let api = FakeApi::new().with_port_status(PortStatus::Closed);
        {
            let mut dash = lock(&state);
            dash.inputs.port_target = "192.168.1.1".into();
            dash.inputs.port = "22".into();
        }
        assert_eq!(run_port_test(&state, &api), StepOutcome::Completed);
        assert_eq!(last_level(&state), LogLevel::Error);
        assert_eq!(lock(&state).port.shown().unwrap().port, 22);
    }

    #[test]
    fn speed_test_updates_text_and_chart() {
        let state = state();
        let api = FakeApi::new();

        assert_eq!(run_speed_test(&state, &api), StepOutcome::Completed);

        let dash = lock(&state);
        let speed = dash.speed.shown().unwrap();
        assert_eq!(speed.download, "94.21 Mbps");
        assert_eq!(dash.charts.speed.as_ref().unwrap().data().values(), &[94.21, 18.5]);
        let messages: Vec<_> = dash.log.entries().iter().map(|e| e.message.as_str()).collect();
        assert!(messages[1].contains("30 seconds"));
    }

    #[test]
    fn multi_ping_rebuilds_table_and_chart() {
        let state = state();
        let api = FakeApi::new();
        {
            let mut dash = lock(&state);
            dash.inputs.multi_ping_targets = " 8.8.8.8,192.168.1.1,1.1.1.1 ".into();
            dash.multi_ping.show(vec![MultiPingRow {
                ip: "stale".into(),
                status: PingStatus::Reachable,
                response_time: "9 sec".into(),
            }]);
        }

        assert_eq!(run_multi_ping_test(&state, &api), StepOutcome::Completed);
        assert_eq!(
            api.calls(),
            vec![Call::PingMultiple("8.8.8.8,192.168.1.1,1.1.1.1".into())]
        );

        let dash = lock(&state);
        let rows = dash.multi_ping.shown().unwrap();
        let ips: Vec<_> = rows.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, ["8.8.8.8", "192.168.1.1", "1.1.1.1"]);
        assert_eq!(rows[1].response_time, NOT_AVAILABLE);

        let chart = dash.charts.multi_ping.as_ref().unwrap().data();
        assert_eq!(chart.labels(), &["8.8.8.8".to_string(), "1.1.1.1".to_string()]);
        assert_eq!(chart.values(), &[125.0, 62.5]);
    }

    #[test]
    fn export_writes_report_into_dir() {
        let state = state();
        let api = FakeApi::new();
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(export_report(&state, &api, dir.path()), StepOutcome::Completed);

        let written =
            std::fs::read_to_string(dir.path().join("network_diagnostic_report.csv")).unwrap();
        assert!(written.starts_with("=== System Information ==="));
        let dash = lock(&state);
        assert!(!dash.exporting);
        assert_eq!(dash.log.len(), 2);
        assert_eq!(dash.log.entries()[1].level, LogLevel::Success);
    }

    #[test]
    fn export_failure_is_logged() {
        let state = state();
        let api = FakeApi::new().failing(Endpoint::ExportReport);
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(export_report(&state, &api, dir.path()), StepOutcome::Failed);
        assert_eq!(last_level(&state), LogLevel::Error);
        assert!(!lock(&state).exporting);
    }
}
