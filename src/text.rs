// text.rs — font discovery (fontdb) plus metrics and glyph coverage
// (rusttype). The two traits are the seam between the document/renderer and
// the real font stack, so hit-testing and rasterization stay testable
// without system fonts.
use std::collections::HashMap;
use rusttype::{point, Font, Scale};
use thiserror::Error;
use crate::card::{FontSpec, Slant, Weight};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    /// Distance from baseline to top, positive.
    pub ascent: f32,
    /// Distance from baseline to bottom, positive.
    pub descent: f32,
}

pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> TextMetrics;
}

/// Full text backend: metrics plus per-pixel glyph coverage. Coverage
/// coordinates are relative to the pen origin on the baseline; `emit`
/// receives (dx, dy, coverage in 0..=1).
pub trait Typeface: TextMeasure {
    fn for_each_coverage(&self, text: &str, font: &FontSpec, emit: &mut dyn FnMut(i32, i32, f32));
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("no system sans-serif font found")]
    NoSansSerif,
    #[error("system font face {0:?} could not be parsed")]
    Unreadable(String),
}

pub struct FontStore {
    faces: HashMap<(Weight, Slant), Font<'static>>,
}

impl FontStore {
    pub fn load() -> Result<Self, FontError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut faces = HashMap::new();
        for weight in [Weight::Normal, Weight::Bold] {
            for slant in [Slant::Normal, Slant::Italic] {
                let query = fontdb::Query {
                    families: &[fontdb::Family::SansSerif],
                    weight: match weight {
                        Weight::Normal => fontdb::Weight::NORMAL,
                        Weight::Bold => fontdb::Weight::BOLD,
                    },
                    style: match slant {
                        Slant::Normal => fontdb::Style::Normal,
                        Slant::Italic => fontdb::Style::Italic,
                    },
                    ..fontdb::Query::default()
                };
                let Some(id) = db.query(&query) else {
                    log::warn!("no sans-serif face for {weight:?}/{slant:?}, will fall back");
                    continue;
                };
                let parsed = db
                    .with_face_data(id, |data, index| Font::try_from_vec_and_index(data.to_vec(), index))
                    .flatten();
                match parsed {
                    Some(font) => { faces.insert((weight, slant), font); }
                    None if weight == Weight::Normal && slant == Slant::Normal => {
                        let name = db.face(id).map(|f| f.post_script_name.clone()).unwrap_or_default();
                        return Err(FontError::Unreadable(name));
                    }
                    None => log::warn!("unreadable face for {weight:?}/{slant:?}, will fall back"),
                }
            }
        }
        if !faces.contains_key(&(Weight::Normal, Slant::Normal)) {
            return Err(FontError::NoSansSerif);
        }
        log::debug!("loaded {} sans-serif face(s)", faces.len());
        Ok(Self { faces })
    }

    fn face(&self, spec: &FontSpec) -> &Font<'static> {
        self.faces.get(&(spec.weight, spec.slant))
            .or_else(|| self.faces.get(&(spec.weight, Slant::Normal)))
            .unwrap_or(&self.faces[&(Weight::Normal, Slant::Normal)])
    }
}

impl TextMeasure for FontStore {
    fn measure(&self, text: &str, font: &FontSpec) -> TextMetrics {
        let face = self.face(font);
        let scale = Scale::uniform(font.size);
        let vm = face.v_metrics(scale);
        let width = face.layout(text, scale, point(0.0, 0.0)).last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        TextMetrics { width, ascent: vm.ascent, descent: -vm.descent }
    }
}

impl Typeface for FontStore {
    fn for_each_coverage(&self, text: &str, font: &FontSpec, emit: &mut dyn FnMut(i32, i32, f32)) {
        let face = self.face(font);
        let scale = Scale::uniform(font.size);
        for glyph in face.layout(text, scale, point(0.0, 0.0)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| emit(bb.min.x + gx as i32, bb.min.y + gy as i32, v));
            }
        }
    }
}
