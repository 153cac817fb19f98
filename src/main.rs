// main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod canvas3d;
mod card;
mod form;
mod interact;
mod layout;
mod mesh;
mod pick;
mod raster;
mod text;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CardSpin")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1000.0, 640.0]),
        centered: true,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "CardSpin",
        options,
        Box::new(|cc| {
            let app = app::CardSpinApp::new(cc)?;
            Ok(Box::new(app))
        }),
    )
}
