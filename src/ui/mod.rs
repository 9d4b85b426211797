//! eframe application: layout and control wiring

pub mod widgets;

use std::sync::Arc;
use std::time::{Duration, Instant};

use arboard::Clipboard;
use eframe::egui;
use tracing::warn;

use crate::actions::report_dir;
use crate::client::DiagnosticsApi;
use crate::dashboard::{lock, ping_time_display, Dashboard, SharedDashboard};
use crate::log::PLACEHOLDER;
use crate::runner::{Job, Runner};
use crate::settings::DashboardSettings;
use crate::theme::{apply_visuals, detect_system_theme, Palette, ThemeManager};
use widgets::{mono, primary_button, secondary_button, section_header};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// UI intents gathered while the dashboard is locked, handled after
enum Command {
    Run(Job),
    ToggleTheme,
    ClearLog,
    ClearOutput,
    CopyLog,
}

pub struct App {
    theme: ThemeManager,
    settings: DashboardSettings,
    state: SharedDashboard,
    runner: Runner,
    status: String,
    copied_feedback: Option<Instant>,
}

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut settings: DashboardSettings,
        api: Arc<dyn DiagnosticsApi>,
    ) -> Self {
        let theme = ThemeManager::startup(&mut settings, detect_system_theme());
        let state = Dashboard::new(settings.charts).shared();

        let ctx = cc.egui_ctx.clone();
        let runner = Runner::new(
            Arc::clone(&state),
            api,
            settings.full_diagnostic.clone(),
            report_dir(),
            Arc::new(move || ctx.request_repaint()),
        );

        Self {
            theme,
            settings,
            state,
            runner,
            status: "SYS.STATUS: READY".to_string(),
            copied_feedback: None,
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Run(job) => {
                if self.runner.submit(job).is_some() {
                    self.status = "SYS.STATUS: RUNNING...".to_string();
                }
            }
            Command::ToggleTheme => self.theme.toggle(&mut self.settings),
            Command::ClearLog => lock(&self.state).log.clear(),
            Command::ClearOutput => lock(&self.state).clear_output(),
            Command::CopyLog => self.copy_log(),
        }
    }

    fn copy_log(&mut self) {
        let text = lock(&self.state).log.to_text();
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => {
                self.copied_feedback = Some(Instant::now());
                self.status = "SYS.STATUS: LOG COPIED".to_string();
            }
            Err(e) => warn!("clipboard unavailable: {e}"),
        }
    }

    fn header(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        let palette = self.theme.palette();
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(palette.header))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.add_space(20.0);

                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                    ui.painter().rect_filled(rect, 0.0, palette.accent);
                    ui.add_space(10.0);

                    ui.label(
                        egui::RichText::new("NETWORK DIAGNOSTICS")
                            .size(14.0)
                            .strong()
                            .color(palette.text),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(20.0);
                        let label = self.theme.mode().toggle_label();
                        if ui
                            .add(
                                egui::Button::new(mono(label, 9.0, palette.text_dim).strong())
                                    .fill(palette.panel)
                                    .stroke(egui::Stroke::NONE)
                                    .rounding(0.0)
                                    .min_size(egui::vec2(60.0, 24.0)),
                            )
                            .clicked()
                        {
                            commands.push(Command::ToggleTheme);
                        }
                    });
                });
                ui.add_space(12.0);
            });
    }

    fn footer(&self, ctx: &egui::Context) {
        let palette = self.theme.palette();
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::none().fill(palette.window))
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.add_space(25.0);
                    ui.label(mono(&self.status, 9.0, palette.text_dim));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(25.0);
                        ui.label(mono(format!("v{VERSION}"), 9.0, palette.text_dim));
                        ui.add_space(15.0);
                        ui.label(mono(self.settings.server_url(), 9.0, palette.text_dim));
                    });
                });
                ui.add_space(8.0);
            });
    }

    fn log_panel(&self, ctx: &egui::Context, dash: &Dashboard, commands: &mut Vec<Command>) {
        let palette = self.theme.palette();
        egui::TopBottomPanel::bottom("diagnostic_log")
            .resizable(true)
            .default_height(180.0)
            .frame(
                egui::Frame::none()
                    .fill(palette.window)
                    .inner_margin(egui::Margin::symmetric(25.0, 10.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(mono("// DIAGNOSTIC LOG", 10.0, palette.text_dim));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(secondary_button(palette, "CLEAR LOG", 75.0)).clicked() {
                            commands.push(Command::ClearLog);
                        }
                        ui.add_space(5.0);
                        let copy = if self.copied_feedback.is_some() {
                            "COPIED!"
                        } else {
                            "COPY LOG"
                        };
                        if ui.add(secondary_button(palette, copy, 75.0)).clicked() {
                            commands.push(Command::CopyLog);
                        }
                    });
                });
                ui.add_space(5.0);

                egui::Frame::none()
                    .fill(palette.panel)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .stick_to_bottom(true)
                            .show(ui, |ui| {
                                if dash.log.is_placeholder() {
                                    ui.label(mono(PLACEHOLDER, 9.0, palette.text_dim));
                                }
                                for entry in dash.log.entries() {
                                    widgets::log_line(ui, palette, entry);
                                }
                            });
                    });
            });
    }

    fn toolbar(&self, ui: &mut egui::Ui, busy: bool, commands: &mut Vec<Command>) {
        let palette = self.theme.palette();
        ui.horizontal(|ui| {
            let run = if busy { "RUNNING..." } else { "RUN FULL DIAGNOSTIC" };
            if ui
                .add_enabled(!busy, primary_button(palette, run, 170.0))
                .clicked()
            {
                commands.push(Command::Run(Job::FullDiagnostic));
            }
            ui.add_space(8.0);
            if ui
                .add_enabled(!busy, secondary_button(palette, "EXPORT REPORT", 100.0))
                .clicked()
            {
                commands.push(Command::Run(Job::ExportReport));
            }
            ui.add_space(5.0);
            if ui.add(secondary_button(palette, "CLEAR OUTPUT", 100.0)).clicked() {
                commands.push(Command::ClearOutput);
            }
        });
        ui.add_space(15.0);
    }

    fn system_section(
        &self,
        ui: &mut egui::Ui,
        dash: &Dashboard,
        busy: bool,
        commands: &mut Vec<Command>,
    ) {
        let palette = self.theme.palette();
        ui.horizontal(|ui| {
            section_header(ui, palette, "SYSTEM INFORMATION");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!busy, secondary_button(palette, "REFRESH", 65.0))
                    .clicked()
                {
                    commands.push(Command::Run(Job::SystemInfo));
                }
            });
        });

        widgets::card(ui, palette, palette.accent, |ui| {
            if dash.system.loading {
                widgets::loader(ui, palette, "Fetching system information...");
                ui.set_opacity(0.5);
            }
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    for (label, value) in dash.system.rows() {
                        widgets::field_row(ui, palette, label, value);
                    }
                });
                if let Some(cpu) = &dash.charts.cpu {
                    widgets::gauge(ui, palette, cpu, palette.cpu);
                }
                if let Some(ram) = &dash.charts.ram {
                    widgets::gauge(ui, palette, ram, palette.ram);
                }
            });
        });
        ui.add_space(10.0);
    }

    fn ping_section(
        &self,
        ui: &mut egui::Ui,
        dash: &mut Dashboard,
        busy: bool,
        commands: &mut Vec<Command>,
    ) {
        let palette = self.theme.palette();
        section_header(ui, palette, "PING TEST");
        ui.horizontal(|ui| {
            let enter = widgets::text_input(
                ui,
                &mut dash.inputs.ping_target,
                "IP address or domain",
                220.0,
            );
            let clicked = ui.add_enabled(!busy, secondary_button(palette, "PING", 60.0)).clicked();
            if clicked || (enter && !busy) {
                commands.push(Command::Run(Job::Ping));
            }
        });
        if dash.ping.loading {
            widgets::loader(ui, palette, "Pinging...");
        }
        if let Some(result) = dash.ping.shown() {
            let reachable = result.status.is_reachable();
            let accent = if reachable { palette.success } else { palette.error };
            widgets::card(ui, palette, accent, |ui| {
                widgets::field_row(ui, palette, "TARGET", &result.target);
                ui.horizontal(|ui| {
                    widgets::field_label(ui, palette, "STATUS");
                    widgets::status_indicator(ui, reachable, result.status.label(), palette);
                });
                widgets::field_row(ui, palette, "TIME", ping_time_display(result));
            });
        }
        ui.add_space(10.0);
    }

    fn port_section(
        &self,
        ui: &mut egui::Ui,
        dash: &mut Dashboard,
        busy: bool,
        commands: &mut Vec<Command>,
    ) {
        let palette = self.theme.palette();
        section_header(ui, palette, "PORT TEST");
        ui.horizontal(|ui| {
            widgets::text_input(ui, &mut dash.inputs.port_target, "IP address", 160.0);
            let enter = widgets::text_input(ui, &mut dash.inputs.port, "Port", 55.0);
            let clicked = ui.add_enabled(!busy, secondary_button(palette, "TEST", 60.0)).clicked();
            if clicked || (enter && !busy) {
                commands.push(Command::Run(Job::PortTest));
            }
        });
        if dash.port.loading {
            widgets::loader(ui, palette, "Probing port...");
        }
        if let Some(result) = dash.port.shown() {
            let open = result.status.is_open();
            let accent = if open { palette.success } else { palette.error };
            widgets::card(ui, palette, accent, |ui| {
                widgets::field_row(ui, palette, "TARGET", &result.target);
                widgets::field_row(ui, palette, "PORT", &result.port.to_string());
                ui.horizontal(|ui| {
                    widgets::field_label(ui, palette, "STATUS");
                    widgets::status_indicator(ui, open, result.status.label(), palette);
                });
            });
        }
        ui.add_space(10.0);
    }

    fn speed_section(
        &self,
        ui: &mut egui::Ui,
        dash: &Dashboard,
        busy: bool,
        commands: &mut Vec<Command>,
    ) {
        let palette = self.theme.palette();
        ui.horizontal(|ui| {
            section_header(ui, palette, "SPEED TEST");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add_enabled(!busy, secondary_button(palette, "START", 60.0)).clicked() {
                    commands.push(Command::Run(Job::SpeedTest));
                }
            });
        });
        if dash.speed.loading {
            widgets::loader(ui, palette, "Measuring bandwidth, up to 30 seconds...");
        }
        if let Some(result) = dash.speed.shown() {
            widgets::card(ui, palette, palette.download, |ui| {
                widgets::field_row(ui, palette, "DOWNLOAD", &result.download);
                widgets::field_row(ui, palette, "UPLOAD", &result.upload);
                widgets::field_row(ui, palette, "PING", &result.ping);
                if let Some(chart) = &dash.charts.speed {
                    ui.add_space(6.0);
                    widgets::bar_chart(ui, palette, chart, &[palette.download, palette.upload]);
                }
            });
        }
        ui.add_space(10.0);
    }

    fn multi_ping_section(
        &self,
        ui: &mut egui::Ui,
        dash: &mut Dashboard,
        busy: bool,
        commands: &mut Vec<Command>,
    ) {
        let palette = self.theme.palette();
        section_header(ui, palette, "MULTI-PING");
        ui.horizontal(|ui| {
            let enter = widgets::text_input(
                ui,
                &mut dash.inputs.multi_ping_targets,
                "8.8.8.8,1.1.1.1,192.168.1.1",
                260.0,
            );
            let clicked = ui.add_enabled(!busy, secondary_button(palette, "RUN", 60.0)).clicked();
            if clicked || (enter && !busy) {
                commands.push(Command::Run(Job::MultiPing));
            }
        });
        if dash.multi_ping.loading {
            widgets::loader(ui, palette, "Pinging hosts...");
        }
        if let Some(rows) = dash.multi_ping.shown() {
            widgets::card(ui, palette, palette.latency, |ui| {
                egui::Grid::new("multi_ping_table")
                    .striped(true)
                    .num_columns(3)
                    .spacing([20.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(mono("TARGET", 9.0, palette.text_dim));
                        ui.label(mono("STATUS", 9.0, palette.text_dim));
                        ui.label(mono("TIME", 9.0, palette.text_dim));
                        ui.end_row();
                        for row in rows {
                            ui.label(mono(&row.ip, 10.0, palette.text));
                            let up = row.status.is_reachable();
                            widgets::status_indicator(ui, up, row.status.label(), palette);
                            ui.label(mono(&row.response_time, 10.0, palette.text));
                            ui.end_row();
                        }
                    });
                if let Some(chart) = &dash.charts.multi_ping {
                    ui.add_space(6.0);
                    widgets::bar_chart(ui, palette, chart, &[palette.latency]);
                }
            });
        }
    }
}

fn palette_background(palette: &Palette) -> egui::Frame {
    egui::Frame::none().fill(palette.window).inner_margin(25.0)
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        apply_visuals(ctx, &self.theme);

        if let Some(instant) = self.copied_feedback {
            if instant.elapsed().as_secs() >= 2 {
                self.copied_feedback = None;
                self.status = "SYS.STATUS: READY".to_string();
            }
        }

        let busy = self.runner.is_running();
        if !busy && self.status.ends_with("RUNNING...") {
            self.status = "SYS.STATUS: READY".to_string();
        }

        let mut commands = Vec::new();
        self.header(ctx, &mut commands);
        self.footer(ctx);

        {
            let state = Arc::clone(&self.state);
            let mut dash = lock(&state);
            if busy || dash.any_loading() {
                // Worker updates land between notifications
                ctx.request_repaint_after(Duration::from_millis(100));
            }

            self.log_panel(ctx, &dash, &mut commands);

            egui::CentralPanel::default()
                .frame(palette_background(self.theme.palette()))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            self.toolbar(ui, busy, &mut commands);
                            self.system_section(ui, &dash, busy, &mut commands);
                            self.ping_section(ui, &mut dash, busy, &mut commands);
                            self.port_section(ui, &mut dash, busy, &mut commands);
                            self.speed_section(ui, &dash, busy, &mut commands);
                            self.multi_ping_section(ui, &mut dash, busy, &mut commands);
                        });
                });
        }

        for command in commands {
            self.handle(command);
        }
    }
}
