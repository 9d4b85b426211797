//! Result records returned by the diagnostics server
//!
//! These are the validated forms. Wire shapes live in `client::schema`.

use serde::{Deserialize, Serialize};

/// Placeholder shown for any field the server left out
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemInfo {
    pub os: Option<String>,
    pub version: Option<String>,
    pub architecture: Option<String>,
    pub processor_name: Option<String>,
    /// Display string such as `"12.5 %"`
    pub cpu_usage: Option<String>,
    pub ram_usage: Option<String>,
}

impl SystemInfo {
    /// Numeric prefix of the CPU usage string
    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu_usage.as_deref().and_then(parse_leading_number)
    }

    pub fn ram_percent(&self) -> Option<f64> {
        self.ram_usage.as_deref().and_then(parse_leading_number)
    }
}

/// Outcome of an ICMP probe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PingStatus {
    Reachable,
    Unreachable,
}

impl PingStatus {
    pub fn is_reachable(self) -> bool {
        self == PingStatus::Reachable
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PingStatus::Reachable => "reachable",
            PingStatus::Unreachable => "unreachable",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PingStatus::Reachable => "Reachable",
            PingStatus::Unreachable => "Unreachable",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PingResult {
    pub target: String,
    pub status: PingStatus,
    /// Only present when the target answered
    pub response_time: Option<String>,
    pub response_time_secs: Option<f64>,
}

/// Outcome of a TCP connect attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
}

impl PortStatus {
    pub fn is_open(self) -> bool {
        self == PortStatus::Open
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortStatus::Open => "open",
            PortStatus::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PortStatus::Open => "Open",
            PortStatus::Closed => "Closed",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortResult {
    pub target: String,
    pub port: u16,
    pub status: PortStatus,
}

/// Bandwidth measurement. Display strings feed the text, raw Mbps feed the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedResult {
    pub download: String,
    pub upload: String,
    pub ping: String,
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

/// One row of a multi-host ping
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPingEntry {
    pub ip: String,
    pub status: PingStatus,
    pub response_time: Option<String>,
    pub response_time_secs: Option<f64>,
}

/// Chart input built alongside the multi-ping table
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub ip: String,
    pub status: PingStatus,
    /// Seconds, 0 when the host did not answer
    pub response_time_secs: f64,
}

impl From<&MultiPingEntry> for ChartPoint {
    fn from(entry: &MultiPingEntry) -> Self {
        Self {
            ip: entry.ip.clone(),
            status: entry.status,
            response_time_secs: entry.response_time_secs.unwrap_or(0.0),
        }
    }
}

/// Downloaded report body
#[derive(Clone, Debug, PartialEq)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Parse the numeric prefix of strings like `"42.5 %"`, ignoring leading whitespace.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number_is_extracted_from_percentages() {
        assert_eq!(parse_leading_number("42.5 %"), Some(42.5));
        assert_eq!(parse_leading_number("  7%"), Some(7.0));
        assert_eq!(parse_leading_number("100"), Some(100.0));
        assert_eq!(parse_leading_number("3. %"), Some(3.0));
        assert_eq!(parse_leading_number("-5 %"), Some(-5.0));
    }

    #[test]
    fn non_numeric_usage_has_no_value() {
        assert_eq!(parse_leading_number("N/A"), None);
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("."), None);
    }

    #[test]
    fn chart_point_defaults_missing_time_to_zero() {
        let entry = MultiPingEntry {
            ip: "10.0.0.1".into(),
            status: PingStatus::Unreachable,
            response_time: None,
            response_time_secs: None,
        };
        let point = ChartPoint::from(&entry);
        assert_eq!(point.response_time_secs, 0.0);
        assert_eq!(point.ip, "10.0.0.1");
    }
}
