//! Network Diagnostics Dashboard
//!
//! Front end for the diagnostics server's HTTP API.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // Hide console on Windows

use std::sync::Arc;

use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use netdiag_dashboard::settings::DashboardSettings;
use netdiag_dashboard::ui::App;
use netdiag_dashboard::HttpClient;

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("netdiag_dashboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let settings = DashboardSettings::load().with_env_overrides();
    let api = HttpClient::new(settings.server_url(), settings.request_timeout())?;
    info!(server = %api.base_url(), "starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 860.0])
            .with_min_inner_size([560.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Network Diagnostics",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, settings, Arc::new(api))))),
    )?;
    Ok(())
}
