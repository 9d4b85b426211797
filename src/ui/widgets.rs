//! Painted widgets: cards, status badges, gauges and bar charts

use std::f32::consts::{FRAC_PI_2, TAU};

use egui::{Align2, Color32, FontFamily, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};

use crate::charts::{BarChart, GaugeChart};
use crate::log::{LogEntry, LogLevel};
use crate::theme::Palette;

pub fn mono(text: impl Into<String>, size: f32, color: Color32) -> RichText {
    RichText::new(text).size(size).family(FontFamily::Monospace).color(color)
}

/// `// TITLE` caption above a section
pub fn section_header(ui: &mut egui::Ui, palette: &Palette, title: &str) {
    ui.label(mono(format!("// {title}"), 10.0, palette.text_dim));
    ui.add_space(5.0);
}

/// Panel frame with a left accent bar
pub fn card<R>(
    ui: &mut egui::Ui,
    palette: &Palette,
    accent: Color32,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    let inner = egui::Frame::none()
        .fill(palette.panel)
        .inner_margin(egui::Margin::symmetric(15.0, 10.0))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let top = ui.cursor().min;
            let inner = add_contents(ui);
            let bottom = ui.min_rect().max.y;
            let bar = Rect::from_min_max(
                Pos2::new(top.x - 15.0, top.y - 10.0),
                Pos2::new(top.x - 12.0, bottom + 10.0),
            );
            ui.painter().rect_filled(bar, 0.0, accent);
            inner
        })
        .inner;
    ui.add_space(5.0);
    inner
}

pub fn primary_button(palette: &Palette, text: &str, width: f32) -> egui::Button<'static> {
    egui::Button::new(mono(text, 11.0, Color32::WHITE).strong())
        .fill(palette.accent)
        .stroke(Stroke::NONE)
        .rounding(0.0)
        .min_size(egui::vec2(width, 28.0))
}

pub fn secondary_button(palette: &Palette, text: &str, width: f32) -> egui::Button<'static> {
    egui::Button::new(mono(text, 9.0, palette.text).strong())
        .fill(palette.panel)
        .stroke(Stroke::new(1.0, palette.border))
        .rounding(0.0)
        .min_size(egui::vec2(width, 22.0))
}

/// Single-line monospace input; returns true when Enter was pressed in it
pub fn text_input(ui: &mut egui::Ui, value: &mut String, hint: &str, width: f32) -> bool {
    let response = ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(width)
            .font(egui::TextStyle::Monospace),
    );
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

/// Coloured dot followed by a label
pub fn status_indicator(ui: &mut egui::Ui, ok: bool, label: &str, palette: &Palette) {
    let color = if ok { palette.success } else { palette.error };
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), Sense::hover());
        ui.painter().circle_filled(rect.center(), 5.0, color);
        ui.label(mono(label, 10.0, color).strong());
    });
}

/// Fixed-width caption in front of a field
pub fn field_label(ui: &mut egui::Ui, palette: &Palette, label: &str) {
    ui.add_sized([90.0, 14.0], egui::Label::new(mono(label, 9.0, palette.text_dim)));
}

/// `LABEL  value` row
pub fn field_row(ui: &mut egui::Ui, palette: &Palette, label: &str, value: &str) {
    ui.horizontal(|ui| {
        field_label(ui, palette, label);
        ui.label(mono(value, 10.0, palette.text));
    });
}

pub fn loader(ui: &mut egui::Ui, palette: &Palette, text: &str) {
    ui.horizontal(|ui| {
        ui.add(egui::Spinner::new().size(12.0).color(palette.accent));
        ui.label(mono(text, 9.0, palette.text_dim));
    });
}

fn arc_points(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Pos2> {
    let segments = ((sweep.abs() / TAU) * 64.0).ceil().max(2.0) as usize;
    (0..=segments)
        .map(|i| {
            let angle = start + sweep * i as f32 / segments as f32;
            center + radius * Vec2::angled(angle)
        })
        .collect()
}

/// Doughnut gauge with the used percentage in the middle
pub fn gauge(ui: &mut egui::Ui, palette: &Palette, chart: &GaugeChart, color: Color32) {
    let size = 90.0;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size + 14.0), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = Pos2::new(rect.center().x, rect.min.y + size / 2.0);
    let radius = size / 2.0 - 8.0;
    let width = radius * 0.3;

    painter.circle_stroke(center, radius, Stroke::new(width, color.gamma_multiply(0.2)));

    let used = chart.used();
    let fraction = (used / 100.0).clamp(0.0, 1.0) as f32;
    if fraction > 0.0 {
        let points = arc_points(center, radius, -FRAC_PI_2, TAU * fraction);
        painter.add(egui::Shape::line(points, Stroke::new(width, color)));
    }

    painter.text(
        center,
        Align2::CENTER_CENTER,
        format!("{used:.0}%"),
        FontId::monospace(12.0),
        palette.text,
    );
    painter.text(
        Pos2::new(center.x, rect.max.y - 6.0),
        Align2::CENTER_CENTER,
        chart.title,
        FontId::monospace(9.0),
        palette.text_dim,
    );
}

/// Vertical bars from zero, scaled to the largest value
pub fn bar_chart(ui: &mut egui::Ui, palette: &Palette, chart: &BarChart, colors: &[Color32]) {
    let height = 130.0;
    let width = ui.available_width().min(420.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);

    let plot = Rect::from_min_max(
        Pos2::new(rect.min.x + 40.0, rect.min.y + 14.0),
        Pos2::new(rect.max.x - 8.0, rect.max.y - 18.0),
    );
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, palette.border),
    );
    painter.line_segment(
        [plot.left_top(), plot.left_bottom()],
        Stroke::new(1.0, palette.border),
    );
    painter.text(
        Pos2::new(rect.min.x, rect.min.y),
        Align2::LEFT_TOP,
        format!("{} ({})", chart.title, chart.unit),
        FontId::monospace(8.0),
        palette.text_dim,
    );

    let data = chart.data();
    if data.is_empty() {
        painter.text(
            plot.center(),
            Align2::CENTER_CENTER,
            "no data",
            FontId::monospace(9.0),
            palette.text_dim,
        );
        return;
    }

    let max = data.values().iter().copied().fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { max } else { 1.0 };
    painter.text(
        plot.left_top() - egui::vec2(4.0, 0.0),
        Align2::RIGHT_CENTER,
        format!("{scale:.0}"),
        FontId::monospace(8.0),
        palette.text_dim,
    );

    let slot = plot.width() / data.len() as f32;
    let bar_width = (slot * 0.6).min(60.0);
    for (i, (label, value)) in data.iter().enumerate() {
        let color = colors.get(i % colors.len().max(1)).copied().unwrap_or(palette.accent);
        let x = plot.min.x + slot * (i as f32 + 0.5);
        let bar_height = ((value.max(0.0) / scale) as f32) * plot.height();
        let bar = Rect::from_min_max(
            Pos2::new(x - bar_width / 2.0, plot.max.y - bar_height),
            Pos2::new(x + bar_width / 2.0, plot.max.y),
        );
        painter.rect_filled(bar, 0.0, color);
        painter.text(
            Pos2::new(x, bar.min.y - 2.0),
            Align2::CENTER_BOTTOM,
            format!("{value:.1}"),
            FontId::monospace(8.0),
            palette.text,
        );
        painter.text(
            Pos2::new(x, plot.max.y + 3.0),
            Align2::CENTER_TOP,
            label,
            FontId::monospace(8.0),
            palette.text_dim,
        );
    }
}

pub fn level_color(level: LogLevel, palette: &Palette) -> Color32 {
    match level {
        LogLevel::Info => palette.text,
        LogLevel::Success => palette.success,
        LogLevel::Warning => palette.warning,
        LogLevel::Error => palette.error,
    }
}

pub fn log_line(ui: &mut egui::Ui, palette: &Palette, entry: &LogEntry) {
    ui.horizontal_wrapped(|ui| {
        ui.label(mono(format!("[{}]", entry.time), 9.0, palette.text_dim));
        ui.label(mono(&entry.message, 9.0, level_color(entry.level, palette)));
    });
}
