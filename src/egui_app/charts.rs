//! Painter-drawn charts for a single prediction report.

use std::f32::consts::{FRAC_PI_2, TAU};

use egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, StrokeKind, Ui};

use super::style;
use crate::pipeline::ChartValue;

const BAR_CHART_HEIGHT: f32 = 220.0;
const BAR_LABEL_SPACE: f32 = 18.0;
const DONUT_SIZE: f32 = 220.0;
const DONUT_HOLE: f32 = 0.4;
const ARC_SEGMENT: f32 = TAU / 96.0;

/// Bar heights scaled so the largest value fills `max_height`.
pub fn bar_heights(values: &[f32], max_height: f32) -> Vec<f32> {
    let peak = values.iter().copied().fold(0.0_f32, f32::max);
    if peak <= 0.0 {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|value| value.max(0.0) / peak * max_height)
        .collect()
}

/// `(start, end)` angles in radians, clockwise from twelve o'clock.
/// Negative values count as zero; an all-zero series yields no slices.
pub fn slice_angles(values: &[f32]) -> Vec<(f32, f32)> {
    let total: f32 = values.iter().map(|value| value.max(0.0)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0;
    values
        .iter()
        .map(|value| {
            let end = start + value.max(0.0) / total * TAU;
            let slice = (start, end);
            start = end;
            slice
        })
        .collect()
}

pub fn bar_chart(ui: &mut Ui, title: &str, values: &[ChartValue]) {
    ui.label(egui::RichText::new(title).strong());
    let width = ui.available_width().min(420.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, BAR_CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);
    let palette = style::palette();
    painter.rect_stroke(rect, 0.0, style::inner_border(), StrokeKind::Inside);

    let plot_top = rect.top() + BAR_LABEL_SPACE;
    let baseline = rect.bottom() - BAR_LABEL_SPACE;
    painter.line_segment(
        [
            Pos2::new(rect.left() + 8.0, baseline),
            Pos2::new(rect.right() - 8.0, baseline),
        ],
        Stroke::new(1.0, palette.text_muted),
    );

    let raw: Vec<f32> = values.iter().map(|entry| entry.value).collect();
    let heights = bar_heights(&raw, baseline - plot_top);
    let slot = width / values.len().max(1) as f32;
    let bar_width = slot * 0.5;
    let font = FontId::proportional(12.0);
    for (index, (entry, height)) in values.iter().zip(heights).enumerate() {
        let center_x = rect.left() + slot * (index as f32 + 0.5);
        let bar = egui::Rect::from_min_max(
            Pos2::new(center_x - bar_width / 2.0, baseline - height),
            Pos2::new(center_x + bar_width / 2.0, baseline),
        );
        painter.rect_filled(bar, 0.0, style::series_color(index));
        painter.text(
            Pos2::new(center_x, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            format_value(entry.value),
            font.clone(),
            palette.text_primary,
        );
        painter.text(
            Pos2::new(center_x, baseline + 2.0),
            Align2::CENTER_TOP,
            entry.category,
            font.clone(),
            palette.text_muted,
        );
    }
}

pub fn donut_chart(ui: &mut Ui, title: &str, values: &[ChartValue]) {
    ui.label(egui::RichText::new(title).strong());
    ui.horizontal(|ui| {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(DONUT_SIZE, DONUT_SIZE), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let outer = DONUT_SIZE / 2.0 - 4.0;
        let inner = outer * DONUT_HOLE;
        let raw: Vec<f32> = values.iter().map(|entry| entry.value).collect();
        for (index, (start, end)) in slice_angles(&raw).into_iter().enumerate() {
            paint_ring_segment(&painter, center, inner, outer, start, end, style::series_color(index));
        }

        ui.vertical(|ui| {
            for (index, entry) in values.iter().enumerate() {
                legend_row(ui, style::series_color(index), entry);
            }
        });
    });
}

fn paint_ring_segment(
    painter: &egui::Painter,
    center: Pos2,
    inner: f32,
    outer: f32,
    start: f32,
    end: f32,
    color: Color32,
) {
    // Quads between consecutive arc points stay convex.
    let steps = ((end - start) / ARC_SEGMENT).ceil().max(1.0) as usize;
    let step = (end - start) / steps as f32;
    for i in 0..steps {
        let a0 = start + step * i as f32;
        let a1 = a0 + step;
        let points = vec![
            polar(center, outer, a0),
            polar(center, outer, a1),
            polar(center, inner, a1),
            polar(center, inner, a0),
        ];
        painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
    }
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    let theta = angle - FRAC_PI_2;
    Pos2::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
}

fn legend_row(ui: &mut Ui, color: Color32, entry: &ChartValue) {
    ui.horizontal(|ui| {
        let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
        ui.painter().rect_filled(swatch, 0.0, color);
        ui.label(format!("{}: {}", entry.category, format_value(entry.value)));
    });
}

fn format_value(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
