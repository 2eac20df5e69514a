//! Theme definitions for the patcher UI
//!
//! Provides color constants, styling utilities, and theme configuration
//! for a dark, patch-cable aesthetic.

use eframe::egui::{self, Color32, Rounding, Stroke, Vec2};

/// Background colors
pub mod background {
    use super::Color32;

    /// Main canvas background - deep dark blue
    pub const MAIN: Color32 = Color32::from_rgb(26, 26, 46);

    /// Grid line color - subtle
    pub const GRID: Color32 = Color32::from_rgb(40, 40, 60);

    /// Node box background
    pub const NODE: Color32 = Color32::from_rgb(35, 35, 55);

    /// Widget background (buttons, inputs)
    pub const WIDGET: Color32 = Color32::from_rgb(45, 45, 70);

    /// Widget background when hovered
    pub const WIDGET_HOVERED: Color32 = Color32::from_rgb(55, 55, 85);

    /// Widget background when active/pressed
    pub const WIDGET_ACTIVE: Color32 = Color32::from_rgb(65, 65, 100);
}

/// Text colors
pub mod text {
    use super::Color32;

    /// Primary text - bright white
    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);

    /// Secondary text - dimmed
    pub const SECONDARY: Color32 = Color32::from_rgb(160, 160, 175);

    /// Accent/highlight text
    pub const ACCENT: Color32 = Color32::from_rgb(130, 180, 255);
}

/// UI accent colors
pub mod accent {
    use super::Color32;

    /// Primary accent - blue
    pub const PRIMARY: Color32 = Color32::from_rgb(66, 165, 245);

    /// Selected node outline
    pub const SELECTION: Color32 = Color32::from_rgb(130, 180, 255);

    /// Working edge while dragging
    pub const WORKING_EDGE: Color32 = Color32::from_rgb(240, 240, 245);

    /// Error - red
    pub const ERROR: Color32 = Color32::from_rgb(239, 83, 80);
}

/// Grid spacing for the background pattern
pub const GRID_SPACING: f32 = 20.0;

/// Thickness of cable curves
pub const EDGE_WIDTH: f32 = 3.0;

/// Side length of slot buttons
pub const SLOT_SIZE: f32 = 12.0;

/// Width of node boxes
pub const NODE_WIDTH: f32 = 160.0;

/// Standard rounding for UI elements
pub const ROUNDING: Rounding = Rounding {
    nw: 6.0,
    ne: 6.0,
    sw: 6.0,
    se: 6.0,
};

/// Smaller rounding for compact elements
pub const ROUNDING_SMALL: Rounding = Rounding {
    nw: 4.0,
    ne: 4.0,
    sw: 4.0,
    se: 4.0,
};

/// Apply the dark patcher theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let visuals = &mut style.visuals;
    visuals.dark_mode = true;

    visuals.window_fill = background::NODE;
    visuals.window_stroke = Stroke::new(1.0, Color32::from_rgb(60, 60, 80));
    visuals.window_rounding = ROUNDING;

    visuals.panel_fill = background::MAIN;

    visuals.widgets.noninteractive.bg_fill = background::WIDGET;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text::SECONDARY);
    visuals.widgets.noninteractive.rounding = ROUNDING_SMALL;

    visuals.widgets.inactive.bg_fill = background::WIDGET;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.inactive.rounding = ROUNDING_SMALL;

    visuals.widgets.hovered.bg_fill = background::WIDGET_HOVERED;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.hovered.rounding = ROUNDING_SMALL;

    visuals.widgets.active.bg_fill = background::WIDGET_ACTIVE;
    visuals.widgets.active.fg_stroke = Stroke::new(1.5, accent::PRIMARY);
    visuals.widgets.active.rounding = ROUNDING_SMALL;

    visuals.widgets.open.bg_fill = background::WIDGET_ACTIVE;
    visuals.widgets.open.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.open.rounding = ROUNDING_SMALL;

    visuals.selection.bg_fill = accent::PRIMARY.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent::PRIMARY);

    visuals.hyperlink_color = text::ACCENT;
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 35);
    visuals.code_bg_color = Color32::from_rgb(35, 35, 50);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);
    style.spacing.button_padding = Vec2::new(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);

    ctx.set_style(style);
}

/// Draw a grid background pattern on a painter
pub fn draw_grid_background(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 0.0, background::MAIN);

    let mut x = rect.left() - (rect.left() % GRID_SPACING);
    while x <= rect.right() {
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            Stroke::new(1.0, background::GRID),
        );
        x += GRID_SPACING;
    }

    let mut y = rect.top() - (rect.top() % GRID_SPACING);
    while y <= rect.bottom() {
        painter.line_segment(
            [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
            Stroke::new(1.0, background::GRID),
        );
        y += GRID_SPACING;
    }
}
