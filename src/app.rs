// app.rs
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use egui::{CentralPanel, Context, RichText, SidePanel, TopBottomPanel};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use crate::canvas3d::{draw_card_canvas, FaceTextures};
use crate::card::CardDoc;
use crate::form;
use crate::interact::PointerState;
use crate::layout;
use crate::mesh::CardMesh;
use crate::pick::Camera;
use crate::raster;
use crate::text::{FontError, FontStore};

fn get_app_dir() -> PathBuf {
    let base = if cfg!(target_os = "windows") { std::env::var("APPDATA").ok() }
        else if cfg!(target_os = "macos") { std::env::var("HOME").ok().map(|h| format!("{}/Library/Application Support", h)) }
        else                              { std::env::var("HOME").ok().map(|h| format!("{}/.config", h)) };
    let mut p = PathBuf::from(base.unwrap_or_else(|| ".".into()));
    p.push("CardSpin");
    let _ = std::fs::create_dir_all(&p);
    p
}

fn theme_file() -> PathBuf { get_app_dir().join("cardspin_theme.json") }

#[derive(Serialize, Deserialize)]
struct ThemePref { dark_mode: bool }

type LogoResult = Result<RgbaImage, String>;

pub struct CardSpinApp {
    doc: CardDoc,
    mesh: CardMesh,
    camera: Camera,
    yaw: f32,
    pointer: PointerState,
    fonts: FontStore,
    textures: FaceTextures,
    /// Pending logo decode; the worker thread sends exactly one result.
    logo_rx: Option<mpsc::Receiver<LogoResult>>,
    dark_mode: bool,
    status_message: String,
    status_timer: f32,
}

impl CardSpinApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, FontError> {
        let fonts = FontStore::load()?;
        let layout = layout::get();
        let mut doc = CardDoc::from_layout(layout);
        raster::render_all(&mut doc, &fonts);

        let dark_mode = std::fs::read_to_string(theme_file()).ok()
            .and_then(|s| serde_json::from_str::<ThemePref>(&s).ok())
            .map(|t| t.dark_mode).unwrap_or(true);
        cc.egui_ctx.set_theme(if dark_mode { egui::Theme::Dark } else { egui::Theme::Light });

        Ok(Self {
            doc,
            mesh: CardMesh::new(layout.card.width, layout.card.height, layout.card.depth),
            camera: Camera::default(),
            yaw: 0.0,
            pointer: PointerState::default(),
            fonts,
            textures: FaceTextures::default(),
            logo_rx: None,
            dark_mode,
            status_message: String::new(),
            status_timer: 0.0,
        })
    }

    pub fn set_status(&mut self, msg: &str, dur: f32) {
        self.status_message = msg.to_string(); self.status_timer = dur;
    }

    // Decode off the UI thread; update() polls the channel each frame.
    fn start_logo_load(&mut self, path: PathBuf) {
        log::info!("loading logo from {}", path.display());
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(image::open(&path).map(|i| i.to_rgba8()).map_err(|e| e.to_string()));
        });
        self.logo_rx = Some(rx);
    }

    fn poll_logo(&mut self) {
        let Some(rx) = &self.logo_rx else { return };
        match rx.try_recv() {
            Ok(Ok(img)) => {
                self.doc.set_logo(Some(Arc::new(img)));
                raster::render_all(&mut self.doc, &self.fonts);
                self.set_status("✅ Logo loaded", 2.0);
                self.logo_rx = None;
            }
            Ok(Err(e)) => {
                log::warn!("logo decode failed: {e}");
                self.set_status("❌ Could not load that image", 3.0);
                self.logo_rx = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => self.logo_rx = None,
        }
    }

    /// Back to the embedded layout; a loaded logo survives the reset.
    fn reset_layout(&mut self) {
        let logo = self.doc.logo();
        self.doc = CardDoc::from_layout(layout::get());
        self.doc.set_logo(logo);
        raster::render_all(&mut self.doc, &self.fonts);
        self.set_status("✅ Layout reset", 2.0);
    }
}

impl eframe::App for CardSpinApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_logo();

        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("CardSpin").strong());
                ui.add_space(12.0);
                ui.label(RichText::new(&self.status_message).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(8.0);
                    if ui.button(if self.dark_mode { "☀ Light" } else { "🌙 Dark" }).clicked() {
                        self.dark_mode = !self.dark_mode;
                        ctx.set_theme(if self.dark_mode { egui::Theme::Dark } else { egui::Theme::Light });
                        let _ = std::fs::write(theme_file(),
                            serde_json::json!({"dark_mode": self.dark_mode}).to_string());
                    }
                });
            });
            ui.add_space(4.0);
        });

        let outcome = SidePanel::left("editor").min_width(300.0).max_width(420.0)
            .show(ctx, |ui| form::draw_form_panel(ui, &mut self.doc, layout::get(), self.logo_rx.is_some()))
            .inner;
        if outcome.changed {
            raster::render_all(&mut self.doc, &self.fonts);
        }
        if outcome.open_logo {
            let picked = rfd::FileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg"])
                .pick_file();
            if let Some(path) = picked { self.start_logo_load(path); }
        }
        if outcome.clear_logo {
            self.doc.set_logo(None);
            raster::render_all(&mut self.doc, &self.fonts);
            self.set_status("Logo cleared", 2.0);
        }
        if outcome.reset {
            self.reset_layout();
        }

        CentralPanel::default().show(ctx, |ui| {
            let sz = ui.available_size();
            draw_card_canvas(ui, &mut self.doc, &mut self.camera, &mut self.yaw,
                &mut self.pointer, &self.fonts, &mut self.textures, &self.mesh, sz);
        });

        if self.logo_rx.is_some() { ctx.request_repaint(); }
        if self.status_timer > 0.0 {
            self.status_timer -= ctx.input(|i| i.stable_dt);
            if self.status_timer <= 0.0 { self.status_message.clear(); }
            ctx.request_repaint();
        }
    }
}
