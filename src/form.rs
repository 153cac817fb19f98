// form.rs
use egui::{Grid, ScrollArea, Ui};
use crate::card::{CardDoc, Face};
use crate::layout::{ElementDef, Layout};

/// What the form wants done this frame. `changed` means some text or color
/// edit landed and both face textures need a repaint.
#[derive(Default)]
pub struct FormOutcome {
    pub changed: bool,
    pub open_logo: bool,
    pub clear_logo: bool,
    pub reset: bool,
}

pub fn draw_form_panel(ui: &mut Ui, doc: &mut CardDoc, layout: &Layout, logo_loading: bool) -> FormOutcome {
    let mut out = FormOutcome::default();
    ScrollArea::vertical().show(ui, |ui| {
        for face in Face::ALL {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(match face {
                Face::Front => "Front",
                Face::Back => "Back",
            }).strong());
            ui.add_space(4.0);
            out.changed |= draw_face_fields(ui, doc, layout, face);
            ui.separator();
        }

        ui.add_space(4.0);
        ui.label(egui::RichText::new("Style").strong());
        ui.add_space(4.0);
        Grid::new("style").num_columns(2).spacing([8.0, 4.0]).show(ui, |ui| {
            ui.label("Background:");
            out.changed |= ui.color_edit_button_srgba(&mut doc.style.background).changed();
            ui.end_row();
            ui.label("Text:");
            out.changed |= ui.color_edit_button_srgba(&mut doc.style.foreground).changed();
            ui.end_row();
        });
        ui.separator();

        ui.add_space(4.0);
        ui.label(egui::RichText::new("Logo").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if logo_loading {
                ui.spinner();
                ui.label("Loading...");
            } else {
                out.open_logo = ui.button("Open image...").clicked();
                if doc.logo().is_some() {
                    out.clear_logo = ui.button("Clear").clicked();
                }
            }
        });
        ui.separator();

        ui.add_space(4.0);
        out.reset = ui.button("Reset layout").clicked();
    });
    out
}

// One text field per text element, keyed and labeled by the embedded layout.
// Image elements are covered by the logo section, not listed here.
fn draw_face_fields(ui: &mut Ui, doc: &mut CardDoc, layout: &Layout, face: Face) -> bool {
    let defs = match face { Face::Front => &layout.front, Face::Back => &layout.back };
    Grid::new(face.label()).num_columns(2).spacing([8.0, 4.0]).show(ui, |ui| {
        defs.iter().fold(false, |ch, def| {
            let ElementDef::Text { key, label, .. } = def else { return ch };
            ui.label(format!("{label}:"));
            let changed = doc.sheet_mut(face).text_mut(key)
                .is_some_and(|text| ui.text_edit_singleline(text).changed());
            ui.end_row();
            ch | changed
        })
    }).inner
}
