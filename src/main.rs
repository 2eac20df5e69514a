//! Patchbay - a node-based reactive wiring patcher
//!
//! Entry point for the demo editor application.

use eframe::egui;
use patchbay::app::PatcherApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Patchbay"),
        ..Default::default()
    };

    eframe::run_native(
        "Patchbay",
        options,
        Box::new(|_cc| Ok(Box::new(PatcherApp::new()))),
    )
}
