use eframe::egui::{
    self, CornerRadius, Frame, Key, Margin, RichText, ScrollArea, Stroke, TextEdit, Vec2,
};

use super::charts;
use super::controller::DashboardController;
use super::style;
use crate::pipeline::{PredictionReport, Predictor};

pub const WINDOW_TITLE: &str = "Online Exam Performance Predictor";
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(640.0, 480.0);
const INPUT_LABEL: &str = "Enter Student Roll No (1-50)";

pub struct DashboardApp {
    controller: DashboardController,
}

impl DashboardApp {
    pub fn new(ctx: &egui::Context, predictor: Predictor) -> Self {
        install_visuals(ctx);
        Self {
            controller: DashboardController::new(predictor),
        }
    }

    fn render_input(&mut self, ui: &mut egui::Ui) {
        ui.label(INPUT_LABEL);
        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.controller.input)
                    .hint_text("e.g. 12")
                    .desired_width(160.0),
            );
            let entered =
                response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
            if ui.button("Predict").clicked() || entered {
                self.controller.submit();
            }
        });
        if let Some(status) = self.controller.status() {
            ui.label(RichText::new(&status.text).color(style::status_color(status.tone)));
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(WINDOW_TITLE);
                ui.add_space(8.0);
                self.render_input(ui);
                if let Some(report) = self.controller.report() {
                    ui.separator();
                    render_report(ui, report);
                }
            });
        });
    }
}

fn render_report(ui: &mut egui::Ui, report: &PredictionReport) {
    let record = &report.record;
    egui::Grid::new("student_record")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            let rows = [
                ("Roll No", record.roll_no.to_string()),
                ("Name", record.name.clone()),
                ("Hours Studied", record.hours_studied.to_string()),
                ("Sleep Hours", record.sleep_hours.to_string()),
                ("Attendance", format!("{}%", record.attendance)),
                ("Internet Usage", record.internet_usage.clone()),
                ("Score", record.score.to_string()),
            ];
            for (label, value) in rows {
                ui.label(RichText::new(label).color(style::palette().text_muted));
                ui.label(value);
                ui.end_row();
            }
        });
    ui.add_space(8.0);

    let verdict_color = style::severity_color(report.result.severity());
    Frame::new()
        .stroke(Stroke::new(2.0, verdict_color))
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::same(12))
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!("Prediction: {}", report.result.text()))
                    .heading()
                    .color(verdict_color),
            );
        });
    ui.add_space(6.0);
    Frame::new()
        .fill(style::USAGE_BOX_COLOR)
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::same(10))
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!(
                    "Internet Usage: {} (intensity {})",
                    record.internet_usage, report.usage_intensity
                ))
                .color(egui::Color32::WHITE),
            );
        });
    ui.add_space(12.0);

    charts::bar_chart(ui, "Hours Studied vs Score", &report.study_vs_score);
    ui.add_space(12.0);
    charts::donut_chart(ui, "Usage, Attendance and Sleep", &report.category_mix);
}

pub fn install_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    style::apply_visuals(&mut visuals);
    ctx.set_visuals(visuals);
}

/// Minimal fallback app to display initialization errors.
pub struct LaunchError {
    message: String,
}

impl LaunchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start the predictor");
                ui.label(RichText::new(&self.message).color(style::FAIL_COLOR));
            });
        });
    }
}
