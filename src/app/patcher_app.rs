//! Main application struct for the patcher demo.
//!
//! Draws the patch as node boxes with slot buttons and cable curves, and
//! feeds pointer input into the editor session. Every editing decision
//! lives in the session; this file is presentation only.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::nodes;
use crate::patcher::{EditorSession, InletRef, NodeDescriptor, OutletRef, SlotAddr};
use crate::wiring::InstanceId;

use super::theme;

/// Row height of one slot line inside a node box.
const SLOT_ROW_HEIGHT: f32 = 20.0;

/// Height of the node header strip.
const NODE_HEADER_HEIGHT: f32 = 26.0;

/// Main application state for the patcher demo.
pub struct PatcherApp {
    session: EditorSession,
    theme_applied: bool,
    /// Node being moved by a body drag, with the grab offset.
    node_drag: Option<(InstanceId, Vec2)>,
    /// Last file/editing status line for the toolbar.
    status: Option<String>,
}

impl PatcherApp {
    /// Creates the app with the built-in node library.
    pub fn new() -> Self {
        Self {
            session: EditorSession::new("Untitled", nodes::basic_registry()),
            theme_applied: false,
            node_drag: None,
            status: None,
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new("PATCHBAY")
                    .size(18.0)
                    .color(theme::text::PRIMARY)
                    .strong(),
            );
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new(self.session.name().to_string())
                    .color(theme::text::SECONDARY),
            );

            ui.separator();

            if ui.button("Save…").clicked() {
                self.save_with_dialog();
            }
            if ui.button("Load…").clicked() {
                self.load_with_dialog();
            }

            ui.separator();

            let undo = egui::Button::new("⟲ Undo");
            if ui.add_enabled(self.session.can_undo(), undo).clicked() {
                self.session.undo();
            }
            let redo = egui::Button::new("⟳ Redo");
            if ui.add_enabled(self.session.can_redo(), redo).clicked() {
                self.session.redo();
            }

            ui.separator();

            if ui.button("Clean Up").clicked() {
                let removed = self.session.cleanup_orphans();
                self.status = Some(format!("Removed {} orphaned bindings", removed));
            }

            if let Some(status) = &self.status {
                ui.separator();
                ui.label(egui::RichText::new(status).color(theme::text::SECONDARY));
            }
        });
    }

    fn save_with_dialog(&mut self) {
        let dialog = rfd::FileDialog::new()
            .add_filter("Patch", &["json"])
            .set_file_name(format!("{}.json", self.session.name()));
        if let Some(path) = dialog.save_file() {
            self.status = Some(match self.session.save(&path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(err) => format!("Save failed: {}", err),
            });
        }
    }

    fn load_with_dialog(&mut self) {
        let dialog = rfd::FileDialog::new().add_filter("Patch", &["json"]);
        if let Some(path) = dialog.pick_file() {
            self.status = Some(match self.session.load(&path) {
                Ok(()) => format!("Loaded {}", path.display()),
                Err(err) => format!("Load failed: {}", err),
            });
        }
    }

    /// Total box size for a descriptor.
    fn node_size(descriptor: &NodeDescriptor) -> Vec2 {
        let rows = (descriptor.inlets.len() + descriptor.outlets.len()) as f32;
        Vec2::new(
            theme::NODE_WIDTH,
            NODE_HEADER_HEIGHT + rows * SLOT_ROW_HEIGHT + 8.0,
        )
    }

    fn node_rect(&self, descriptor: &NodeDescriptor, origin: Pos2) -> Rect {
        // Positions live in the patch, so un-synced descriptor positions
        // never go stale while a node is being dragged.
        let pos = self
            .session
            .patch()
            .position(descriptor.id)
            .unwrap_or(descriptor.position);
        Rect::from_min_size(
            origin + Vec2::new(pos.x, pos.y),
            Self::node_size(descriptor),
        )
    }

    /// Draws one node box and records its slot rectangles in the layout.
    fn draw_node(&mut self, ui: &mut egui::Ui, descriptor: &NodeDescriptor, origin: Pos2) {
        let rect = self.node_rect(descriptor, origin);
        let selected = self.session.selection() == Some(descriptor.id);
        let painter = ui.painter();

        painter.rect_filled(rect, theme::ROUNDING, theme::background::NODE);
        let outline = if selected {
            Stroke::new(2.0, theme::accent::SELECTION)
        } else {
            Stroke::new(1.0, Color32::from_rgb(60, 60, 80))
        };
        painter.rect_stroke(rect, theme::ROUNDING, outline);

        // Header strip tinted by category.
        let category = self
            .session
            .patch()
            .node(descriptor.id)
            .map(|n| n.info().category);
        let header = Rect::from_min_size(
            rect.min,
            Vec2::new(rect.width(), NODE_HEADER_HEIGHT),
        );
        if let Some(category) = category {
            painter.rect_filled(
                header,
                theme::ROUNDING_SMALL,
                category.color().gamma_multiply(0.35),
            );
        }
        painter.text(
            header.left_center() + Vec2::new(8.0, 0.0),
            Align2::LEFT_CENTER,
            &descriptor.display_name,
            FontId::proportional(13.0),
            theme::text::PRIMARY,
        );

        // Inlet rows on the left, then outlet rows on the right.
        let mut y = rect.top() + NODE_HEADER_HEIGHT;
        for inlet in &descriptor.inlets {
            let button = Rect::from_min_size(
                Pos2::new(rect.left() + 4.0, y + (SLOT_ROW_HEIGHT - theme::SLOT_SIZE) / 2.0),
                Vec2::splat(theme::SLOT_SIZE),
            );
            painter.rect_filled(button, 2.0, inlet.payload.color());
            painter.text(
                Pos2::new(button.right() + 6.0, y + SLOT_ROW_HEIGHT / 2.0),
                Align2::LEFT_CENTER,
                &inlet.label,
                FontId::proportional(11.0),
                theme::text::SECONDARY,
            );
            self.session.layout_mut().set_rect(
                SlotAddr::Inlet(InletRef::new(descriptor.id, inlet.member)),
                button,
            );
            y += SLOT_ROW_HEIGHT;
        }
        for outlet in &descriptor.outlets {
            let button = Rect::from_min_size(
                Pos2::new(
                    rect.right() - 4.0 - theme::SLOT_SIZE,
                    y + (SLOT_ROW_HEIGHT - theme::SLOT_SIZE) / 2.0,
                ),
                Vec2::splat(theme::SLOT_SIZE),
            );
            let color = outlet
                .payload
                .map(|p| p.color())
                .unwrap_or(theme::text::SECONDARY);
            painter.rect_filled(button, 2.0, color);
            painter.text(
                Pos2::new(button.left() - 6.0, y + SLOT_ROW_HEIGHT / 2.0),
                Align2::RIGHT_CENTER,
                &outlet.label,
                FontId::proportional(11.0),
                theme::text::SECONDARY,
            );
            self.session.layout_mut().set_rect(
                SlotAddr::Outlet(OutletRef::new(descriptor.id, outlet.member)),
                button,
            );
            y += SLOT_ROW_HEIGHT;
        }
    }

    /// Draws a cable curve between two anchor points.
    fn draw_cable(painter: &egui::Painter, from: Pos2, to: Pos2, color: Color32) {
        let bend = ((to.x - from.x).abs() * 0.5).clamp(30.0, 80.0);
        let shape = egui::epaint::CubicBezierShape::from_points_stroke(
            [
                from,
                from + Vec2::new(bend, 0.0),
                to - Vec2::new(bend, 0.0),
                to,
            ],
            false,
            Color32::TRANSPARENT,
            Stroke::new(theme::EDGE_WIDTH, color),
        );
        painter.add(shape);
    }

    fn draw_edges(&self, ui: &mut egui::Ui) {
        let painter = ui.painter();
        for edge in self.session.graph().edges() {
            let from = self
                .session
                .layout()
                .anchor(&SlotAddr::Outlet(edge.from.clone()));
            let to = self
                .session
                .layout()
                .anchor(&SlotAddr::Inlet(edge.to.clone()));
            let (Some(from), Some(to)) = (from, to) else {
                continue;
            };
            let color = self
                .session
                .graph()
                .node(edge.from.node)
                .and_then(|n| n.outlet(&edge.from.member))
                .and_then(|o| o.payload)
                .map(|p| p.color())
                .unwrap_or(theme::text::SECONDARY);
            Self::draw_cable(painter, from, to, color);
        }

        if let Some((from, to)) = self.session.working_edge() {
            Self::draw_cable(painter, from, to, theme::accent::WORKING_EDGE);
        }
    }

    /// Routes raw pointer and key input into the session.
    fn handle_input(&mut self, ui: &egui::Ui, origin: Pos2, canvas: Rect) {
        let (pointer, pressed, released, escape) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if escape {
            self.session.cancel_gesture();
            self.node_drag = None;
        }

        let Some(pos) = pointer else {
            return;
        };

        if pressed && canvas.contains(pos) {
            if self.session.layout().hit_test(pos).is_some() {
                self.session.pointer_pressed(pos);
            } else if let Some(id) = self.node_at(pos, origin) {
                self.session.select(Some(id));
                let node_pos = self.session.patch().position(id).unwrap_or_default();
                let grab = pos - (origin + Vec2::new(node_pos.x, node_pos.y));
                self.node_drag = Some((id, grab));
            } else {
                self.session.select(None);
            }
        }

        if let Some((id, grab)) = self.node_drag {
            let new_pos = pos - grab - origin.to_vec2();
            self.session
                .move_node(id, glam::Vec2::new(new_pos.x, new_pos.y));
        } else {
            self.session.pointer_moved(pos);
        }

        if released {
            if self.node_drag.take().is_none() {
                self.session.pointer_released(pos);
            }
        }
    }

    fn node_at(&self, pos: Pos2, origin: Pos2) -> Option<InstanceId> {
        // Topmost node wins: descriptors draw in hierarchy order.
        self.session
            .graph()
            .nodes()
            .iter()
            .rev()
            .find(|d| self.node_rect(d, origin).contains(pos))
            .map(|d| d.id)
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, delete, copy, paste) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift,
                i.modifiers.command
                    && (i.key_pressed(egui::Key::Y)
                        || (i.modifiers.shift && i.key_pressed(egui::Key::Z))),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.modifiers.command && i.key_pressed(egui::Key::C),
                i.modifiers.command && i.key_pressed(egui::Key::V),
            )
        });

        if undo {
            self.session.undo();
        }
        if redo {
            self.session.redo();
        }
        if delete {
            if let Some(id) = self.session.selection() {
                self.session.delete_node(id);
            }
        }
        if copy {
            self.session.copy_selected();
        }
        if paste {
            self.session.paste(glam::Vec2::new(60.0, 60.0));
        }
    }

    fn context_menu(&mut self, response: &egui::Response, origin: Pos2) {
        let click_pos = response.interact_pointer_pos().unwrap_or(origin);
        response.context_menu(|ui| {
            ui.label(egui::RichText::new("Add Node").color(theme::text::SECONDARY));
            ui.separator();
            let infos: Vec<_> = self.session.registry().list_nodes().to_vec();
            for info in infos {
                let label = format!("{} / {}", info.category.name(), info.name);
                if ui.button(label).clicked() {
                    let pos = click_pos - origin.to_vec2();
                    self.session
                        .add_node(info.id, glam::Vec2::new(pos.x, pos.y));
                    ui.close_menu();
                }
            }
        });
    }
}

impl Default for PatcherApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for PatcherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.session.sync();

            let canvas = ui.available_rect_before_wrap();
            let origin = canvas.min;
            theme::draw_grid_background(ui.painter(), canvas);

            let response = ui.interact(canvas, ui.id().with("canvas"), Sense::click());
            self.context_menu(&response, origin);

            // Rebuild the slot layout while drawing the node boxes.
            self.session.layout_mut().clear();
            let descriptors: Vec<NodeDescriptor> = self.session.graph().nodes().to_vec();
            for descriptor in &descriptors {
                self.draw_node(ui, descriptor, origin);
            }

            self.draw_edges(ui);
            self.handle_input(ui, origin, canvas);

            // Keep painting while a cable follows the pointer.
            if self.session.interaction().is_active() {
                ctx.request_repaint();
            }
        });
    }
}
