//! Light/Dark theme for the dashboard
//!
//! The chosen mode is persisted as the `theme` key of the settings file.
//! When nothing is saved the OS preference decides, and light wins when
//! that cannot be read.

use egui::Color32;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::settings::DashboardSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn flipped(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Caption of the toggle button, which offers the other mode
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀ LIGHT",
            ThemeMode::Light => "🌙 DARK",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub bg: Color32,
    pub window: Color32,
    pub header: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub text_dim: Color32,
    pub border: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub cpu: Color32,
    pub ram: Color32,
    pub download: Color32,
    pub upload: Color32,
    pub latency: Color32,
}

impl Palette {
    pub const LIGHT: Self = Self {
        bg: Color32::from_rgb(0xe8, 0xe8, 0xe8),
        window: Color32::from_rgb(0xf7, 0xf7, 0xf7),
        header: Color32::from_rgb(0xff, 0xff, 0xff),
        panel: Color32::from_rgb(0xff, 0xff, 0xff),
        text: Color32::from_rgb(0x2a, 0x2a, 0x2a),
        text_dim: Color32::from_rgb(0x88, 0x88, 0x88),
        border: Color32::from_rgb(0xa0, 0xa0, 0xa0),
        accent: Color32::from_rgb(0x2a, 0x2a, 0x2a),
        success: Color32::from_rgb(0x2e, 0x7d, 0x32),
        warning: Color32::from_rgb(0xef, 0x6c, 0x00),
        error: Color32::from_rgb(0xc6, 0x28, 0x28),
        cpu: Color32::from_rgb(0x36, 0xa2, 0xeb),
        ram: Color32::from_rgb(0xff, 0x63, 0x84),
        download: Color32::from_rgb(0x4b, 0xc0, 0xc0),
        upload: Color32::from_rgb(0x99, 0x66, 0xff),
        latency: Color32::from_rgb(0xff, 0x9f, 0x40),
    };

    pub const DARK: Self = Self {
        bg: Color32::from_rgb(0x0f, 0x0f, 0x0f),
        window: Color32::from_rgb(0x1a, 0x1a, 0x1a),
        header: Color32::from_rgb(0x14, 0x14, 0x14),
        panel: Color32::from_rgb(0x22, 0x22, 0x22),
        text: Color32::from_rgb(0xe0, 0xe0, 0xe0),
        text_dim: Color32::from_rgb(0x5c, 0x5c, 0x5c),
        border: Color32::from_rgb(0x33, 0x33, 0x33),
        accent: Color32::from_rgb(0x00, 0xbc, 0xd4), // Cyan
        success: Color32::from_rgb(0x4c, 0xaf, 0x50),
        warning: Color32::from_rgb(0xff, 0x98, 0x00),
        error: Color32::from_rgb(0xf4, 0x43, 0x36),
        cpu: Color32::from_rgb(0x36, 0xa2, 0xeb),
        ram: Color32::from_rgb(0xff, 0x63, 0x84),
        download: Color32::from_rgb(0x4b, 0xc0, 0xc0),
        upload: Color32::from_rgb(0x99, 0x66, 0xff),
        latency: Color32::from_rgb(0xff, 0x9f, 0x40),
    };

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::LIGHT,
            ThemeMode::Dark => Self::DARK,
        }
    }
}

/// Saved choice first, OS preference otherwise
pub fn preferred_theme(saved: Option<ThemeMode>, os: ThemeMode) -> ThemeMode {
    saved.unwrap_or(os)
}

/// Detect system theme (Windows)
#[cfg(target_os = "windows")]
pub fn detect_system_theme() -> ThemeMode {
    use std::process::Command;

    // AppsUseLightTheme: 0 = Dark, 1 = Light
    let output = Command::new("reg")
        .args([
            "query",
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ])
        .output();

    if let Ok(output) = output {
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.contains("0x0") {
            return ThemeMode::Dark;
        } else if stdout.contains("0x1") {
            return ThemeMode::Light;
        }
    }

    ThemeMode::Light
}

/// Detect system theme (macOS). `AppleInterfaceStyle` is only set in dark mode.
#[cfg(target_os = "macos")]
pub fn detect_system_theme() -> ThemeMode {
    use std::process::Command;

    match Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
    {
        Ok(output) if String::from_utf8_lossy(&output.stdout).contains("Dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn detect_system_theme() -> ThemeMode {
    theme_from_gtk(std::env::var("GTK_THEME").ok().as_deref())
}

/// `Adwaita:dark` and friends are dark; anything else, or nothing, is light
pub fn theme_from_gtk(gtk_theme: Option<&str>) -> ThemeMode {
    match gtk_theme {
        Some(name) if name.to_ascii_lowercase().contains("dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// Current mode plus its palette
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeManager {
    mode: ThemeMode,
    palette: Palette,
}

impl ThemeManager {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            palette: Palette::from_mode(mode),
        }
    }

    /// Resolve the starting theme from settings and the OS
    pub fn from_settings(settings: &DashboardSettings, os: ThemeMode) -> Self {
        Self::new(preferred_theme(settings.theme, os))
    }

    /// Resolve the starting theme and persist it
    pub fn startup(settings: &mut DashboardSettings, os: ThemeMode) -> Self {
        let mut theme = Self::from_settings(settings, os);
        theme.apply(theme.mode, settings);
        theme
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Switch to `mode` and persist it
    pub fn apply(&mut self, mode: ThemeMode, settings: &mut DashboardSettings) {
        self.mode = mode;
        self.palette = Palette::from_mode(mode);
        settings.theme = Some(mode);
        if let Err(e) = settings.save() {
            warn!("failed to persist theme: {e}");
        }
    }

    pub fn toggle(&mut self, settings: &mut DashboardSettings) {
        self.apply(self.mode.flipped(), settings);
    }
}

/// Apply the palette to egui visuals
pub fn apply_visuals(ctx: &egui::Context, theme: &ThemeManager) {
    let palette = theme.palette();
    let mut visuals = match theme.mode() {
        ThemeMode::Dark => egui::Visuals::dark(),
        ThemeMode::Light => egui::Visuals::light(),
    };

    visuals.panel_fill = palette.window;
    visuals.window_fill = palette.panel;
    visuals.extreme_bg_color = palette.bg;

    visuals.widgets.noninteractive.fg_stroke.color = palette.text;
    visuals.widgets.inactive.fg_stroke.color = palette.text_dim;
    visuals.widgets.active.fg_stroke.color = palette.text;
    visuals.widgets.hovered.fg_stroke.color = palette.text;

    visuals.widgets.noninteractive.bg_fill = palette.panel;
    visuals.widgets.inactive.bg_fill = palette.panel;

    visuals.selection.bg_fill = palette.accent;

    ctx.set_visuals(visuals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_theme_wins_over_os() {
        assert_eq!(preferred_theme(Some(ThemeMode::Light), ThemeMode::Dark), ThemeMode::Light);
    }

    #[test]
    fn os_preference_applies_when_unset() {
        assert_eq!(preferred_theme(None, ThemeMode::Dark), ThemeMode::Dark);
        assert_eq!(preferred_theme(None, ThemeMode::Light), ThemeMode::Light);
    }

    #[test]
    fn toggle_from_light_persists_dark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = DashboardSettings::default().with_path(path.clone());

        let mut theme = ThemeManager::new(ThemeMode::Light);
        theme.toggle(&mut settings);

        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert_eq!(theme.palette(), &Palette::DARK);
        assert_eq!(settings.theme, Some(ThemeMode::Dark));

        let reloaded = DashboardSettings::load_from(&path);
        assert_eq!(reloaded.theme, Some(ThemeMode::Dark));
        let restarted = ThemeManager::from_settings(&reloaded, ThemeMode::Light);
        assert_eq!(restarted.mode(), ThemeMode::Dark);
    }

    #[test]
    fn startup_persists_resolved_os_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = DashboardSettings::load_from(&path);

        let theme = ThemeManager::startup(&mut settings, ThemeMode::Light);
        assert_eq!(theme.mode(), ThemeMode::Light);

        let reloaded = DashboardSettings::load_from(&path);
        assert_eq!(reloaded.theme, Some(ThemeMode::Light));
        let next_launch = ThemeManager::startup(&mut reloaded.clone(), ThemeMode::Dark);
        assert_eq!(next_launch.mode(), ThemeMode::Light);
    }

    #[test]
    fn toggle_keeps_saved_server_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server_url":"http://saved:5000"}"#).unwrap();
        let mut settings = DashboardSettings::load_from(&path)
            .with_server_override(Some("http://from-env:9999".into()));

        ThemeManager::new(ThemeMode::Dark).toggle(&mut settings);

        let reloaded = DashboardSettings::load_from(&path);
        assert_eq!(reloaded.server_url, "http://saved:5000");
        assert_eq!(reloaded.theme, Some(ThemeMode::Light));
    }

    #[test]
    fn gtk_theme_without_dark_is_light() {
        assert_eq!(theme_from_gtk(Some("Adwaita:dark")), ThemeMode::Dark);
        assert_eq!(theme_from_gtk(Some("Adwaita")), ThemeMode::Light);
        assert_eq!(theme_from_gtk(Some("")), ThemeMode::Light);
        assert_eq!(theme_from_gtk(None), ThemeMode::Light);
    }

    #[test]
    fn toggle_label_offers_other_mode() {
        assert_eq!(ThemeMode::Dark.toggle_label(), "☀ LIGHT");
        assert_eq!(ThemeMode::Light.flipped(), ThemeMode::Dark);
    }

    #[test]
    fn theme_serializes_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
    }
}
