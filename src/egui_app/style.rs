use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use super::controller::StatusTone;
use crate::pipeline::Severity;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_ice: Color32,
    pub warning: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(10, 10, 12),
        bg_secondary: Color32::from_rgb(26, 28, 30),
        bg_tertiary: Color32::from_rgb(42, 44, 48),
        panel_outline: Color32::from_rgb(38, 42, 48),
        grid_soft: Color32::from_rgb(30, 32, 36),
        text_primary: Color32::from_rgb(185, 192, 200),
        text_muted: Color32::from_rgb(140, 146, 155),
        accent_ice: Color32::from_rgb(167, 217, 255),
        warning: Color32::from_rgb(200, 128, 96),
    }
}

pub const PASS_COLOR: Color32 = Color32::from_rgb(0x00, 0xcc, 0x66);
pub const FAIL_COLOR: Color32 = Color32::from_rgb(0xff, 0x4d, 0x4d);
pub const USAGE_BOX_COLOR: Color32 = Color32::from_rgb(0x1e, 0x90, 0xff);

/// Fill colors for chart categories, cycled in order.
pub const SERIES_COLORS: [Color32; 3] = [
    Color32::from_rgb(0x63, 0x6e, 0xfa),
    Color32::from_rgb(0xef, 0x55, 0x3b),
    Color32::from_rgb(0x00, 0xcc, 0x96),
];

pub fn series_color(index: usize) -> Color32 {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Positive => PASS_COLOR,
        Severity::Negative => FAIL_COLOR,
    }
}

pub fn status_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Info => palette().accent_ice,
        StatusTone::Warning => palette().warning,
        StatusTone::Error => FAIL_COLOR,
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = FAIL_COLOR;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_ice);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rectilinear(&mut visuals.widgets.inactive, palette);
    set_rectilinear(&mut visuals.widgets.hovered, palette);
    set_rectilinear(&mut visuals.widgets.active, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
}

fn set_rectilinear(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn inner_border() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}
