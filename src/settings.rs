//! Dashboard settings with serialization support

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::charts::ChartAnchors;
use crate::error::SettingsError;
use crate::theme::ThemeMode;

/// Overrides `server_url` when set
pub const SERVER_URL_ENV: &str = "NETDIAG_SERVER_URL";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Inputs the full diagnostic writes before each step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullDiagnosticDefaults {
    pub ping_target: String,
    pub port_target: String,
    pub port: u16,
    pub multi_ping_targets: String,
    /// Keep going after a failed step. Turning it off halts at the first failure.
    pub continue_on_failure: bool,
}

impl Default for FullDiagnosticDefaults {
    fn default() -> Self {
        Self {
            ping_target: "8.8.8.8".to_string(),
            port_target: "192.168.1.1".to_string(),
            port: 80,
            multi_ping_targets: "8.8.8.8,1.1.1.1,192.168.1.1".to_string(),
            continue_on_failure: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub server_url: String,

    /// `None` means requests never time out client-side
    pub request_timeout_secs: Option<u64>,

    /// Persisted theme choice, unset until the user toggles
    pub theme: Option<ThemeMode>,

    pub full_diagnostic: FullDiagnosticDefaults,

    pub charts: ChartAnchors,

    #[serde(skip)]
    path: Option<PathBuf>,

    /// Session-only server URL, never written back
    #[serde(skip)]
    server_override: Option<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: None,
            theme: None,
            full_diagnostic: FullDiagnosticDefaults::default(),
            charts: ChartAnchors::default(),
            path: None,
            server_override: None,
        }
    }
}

impl DashboardSettings {
    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("netdiag-dashboard").join("settings.json"))
    }

    /// Load settings from the config dir or return defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`; a missing or unreadable file yields defaults bound to `path`
    pub fn load_from(path: &Path) -> Self {
        let settings = std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| serde_json::from_str::<Self>(&contents).ok())
            .unwrap_or_default();
        settings.with_path(path.to_path_buf())
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply `NETDIAG_SERVER_URL` when present
    pub fn with_env_overrides(self) -> Self {
        self.with_server_override(std::env::var(SERVER_URL_ENV).ok())
    }

    pub fn with_server_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.server_override = Some(url.trim().to_string());
        }
        self
    }

    /// Server to talk to: the override when set, the saved URL otherwise
    pub fn server_url(&self) -> &str {
        self.server_override.as_deref().unwrap_or(&self.server_url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = self
            .path
            .clone()
            .or_else(Self::settings_path)
            .ok_or(SettingsError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}
