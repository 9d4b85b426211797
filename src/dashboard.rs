//! Render state of the whole dashboard
//!
//! Everything the UI paints lives here. The worker thread mutates it through
//! [`SharedDashboard`] and the UI reads it every frame.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::charts::{ChartAnchors, Charts};
use crate::log::DiagnosticLog;
use crate::model::{
    MultiPingEntry, PingResult, PingStatus, PortResult, SpeedResult, SystemInfo, NOT_AVAILABLE,
};

pub type SharedDashboard = Arc<Mutex<Dashboard>>;

/// Lock the dashboard, recovering from a poisoned mutex.
pub fn lock(state: &Mutex<Dashboard>) -> MutexGuard<'_, Dashboard> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Free-text inputs, as typed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs {
    pub ping_target: String,
    pub port_target: String,
    pub port: String,
    pub multi_ping_targets: String,
}

/// A result card with its loading indicator
#[derive(Clone, Debug, PartialEq)]
pub struct ResultCard<T> {
    pub loading: bool,
    pub visible: bool,
    pub data: Option<T>,
}

impl<T> Default for ResultCard<T> {
    fn default() -> Self {
        Self {
            loading: false,
            visible: false,
            data: None,
        }
    }
}

impl<T> ResultCard<T> {
    /// Show the loader and hide the previous result
    pub fn begin(&mut self) {
        self.loading = true;
        self.visible = false;
    }

    pub fn show(&mut self, data: T) {
        self.data = Some(data);
        self.visible = true;
    }

    pub fn finish(&mut self) {
        self.loading = false;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Data only while the card is shown
    pub fn shown(&self) -> Option<&T> {
        self.data.as_ref().filter(|_| self.visible)
    }
}

/// The system information block. Always visible, dimmed while loading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemPanel {
    pub loading: bool,
    pub info: SystemInfo,
}

impl SystemPanel {
    /// `(label, value)` rows with the N/A fallback applied
    pub fn rows(&self) -> [(&'static str, &str); 6] {
        let info = &self.info;
        [
            ("OS", or_na(&info.os)),
            ("VERSION", or_na(&info.version)),
            ("ARCH", or_na(&info.architecture)),
            ("CPU", or_na(&info.processor_name)),
            ("CPU USAGE", or_na(&info.cpu_usage)),
            ("RAM USAGE", or_na(&info.ram_usage)),
        ]
    }
}

fn or_na(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NOT_AVAILABLE)
}

/// One rendered row of the multi-ping table
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPingRow {
    pub ip: String,
    pub status: PingStatus,
    pub response_time: String,
}

impl From<&MultiPingEntry> for MultiPingRow {
    fn from(entry: &MultiPingEntry) -> Self {
        Self {
            ip: entry.ip.clone(),
            status: entry.status,
            response_time: entry
                .response_time
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// Response time text for the ping card
pub fn ping_time_display(result: &PingResult) -> &str {
    match (result.status, result.response_time.as_deref()) {
        (PingStatus::Reachable, Some(time)) => time,
        _ => NOT_AVAILABLE,
    }
}

#[derive(Clone, Debug)]
pub struct Dashboard {
    pub inputs: Inputs,
    pub system: SystemPanel,
    pub ping: ResultCard<PingResult>,
    pub port: ResultCard<PortResult>,
    pub speed: ResultCard<SpeedResult>,
    pub multi_ping: ResultCard<Vec<MultiPingRow>>,
    pub exporting: bool,
    pub log: DiagnosticLog,
    pub charts: Charts,
}

impl Dashboard {
    pub fn new(anchors: ChartAnchors) -> Self {
        Self {
            inputs: Inputs {
                port: "80".to_string(),
                ..Inputs::default()
            },
            system: SystemPanel::default(),
            ping: ResultCard::default(),
            port: ResultCard::default(),
            speed: ResultCard::default(),
            multi_ping: ResultCard::default(),
            exporting: false,
            log: DiagnosticLog::new(),
            charts: Charts::setup(anchors),
        }
    }

    pub fn shared(self) -> SharedDashboard {
        Arc::new(Mutex::new(self))
    }

    /// Hide every result card, then reset the log
    pub fn clear_output(&mut self) {
        self.ping.hide();
        self.port.hide();
        self.speed.hide();
        self.multi_ping.hide();
        self.log.clear();
        self.log.info("Display cleared");
    }

    pub fn any_loading(&self) -> bool {
        self.system.loading
            || self.ping.loading
            || self.port.loading
            || self.speed.loading
            || self.multi_ping.loading
            || self.exporting
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(ChartAnchors::default())
    }
}

/// Parse a TCP port from user input.
///
/// Accepts a plain base-10 integer in `1..=65535` after trimming. Unlike a
/// lenient leading-digits parse, `"8.0"`, `"+80"` and `"80abc"` are rejected
/// rather than read as 8 or 80.
pub fn parse_port(input: &str) -> Option<u16> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match input.parse::<u32>() {
        Ok(port @ 1..=65535) => u16::try_from(port).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PortStatus;

    #[test]
    fn port_bounds() {
        assert_eq!(parse_port("1"), Some(1));
        assert_eq!(parse_port("65535"), Some(65535));
        assert_eq!(parse_port(" 443 "), Some(443));
        assert_eq!(parse_port("0"), None);
        assert_eq!(parse_port("65536"), None);
        assert_eq!(parse_port("99999999999"), None);
    }

    #[test]
    fn port_rejects_non_numeric() {
        for input in ["", "   ", "http", "80abc", "-1", "+80", "8.0"] {
            assert_eq!(parse_port(input), None, "{input:?} should be rejected");
        }
    }

    #[test]
    fn system_rows_fall_back_to_na() {
        let panel = SystemPanel {
            loading: false,
            info: SystemInfo {
                os: Some("Linux".into()),
                ..SystemInfo::default()
            },
        };
        let rows = panel.rows();
        assert_eq!(rows[0], ("OS", "Linux"));
        assert!(rows[1..].iter().all(|(_, v)| *v == NOT_AVAILABLE));
    }

    #[test]
    fn hidden_card_shows_nothing() {
        let mut card = ResultCard::default();
        card.show(PortResult {
            target: "h".into(),
            port: 22,
            status: PortStatus::Open,
        });
        assert!(card.shown().is_some());
        card.begin();
        assert!(card.loading);
        assert!(card.shown().is_none());
        assert!(card.data.is_some());
    }

    #[test]
    fn any_loading_tracks_every_loader() {
        let mut dash = Dashboard::default();
        assert!(!dash.any_loading());
        dash.speed.begin();
        assert!(dash.any_loading());
        dash.speed.finish();
        dash.exporting = true;
        assert!(dash.any_loading());
    }

    #[test]
    fn clear_output_hides_cards_and_resets_log() {
        let mut dash = Dashboard::default();
        dash.ping.show(PingResult {
            target: "8.8.8.8".into(),
            status: PingStatus::Reachable,
            response_time: Some("0.01 sec".into()),
            response_time_secs: Some(0.01),
        });
        dash.log.error("old");

        dash.clear_output();

        assert!(!dash.ping.visible);
        assert_eq!(dash.log.len(), 1);
        assert_eq!(dash.log.entries()[0].message, "Display cleared");
    }

    #[test]
    fn unreachable_ping_time_is_na() {
        let result = PingResult {
            target: "10.1.1.1".into(),
            status: PingStatus::Unreachable,
            response_time: Some("ignored".into()),
            response_time_secs: None,
        };
        assert_eq!(ping_time_display(&result), NOT_AVAILABLE);
    }
}
