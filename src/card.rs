// card.rs — the card document: two faces, each a pixel buffer plus an ordered
// element list. Owned by the app and passed explicitly to the interaction
// state machine and the texture renderer; nothing here touches the GPU.
use std::sync::Arc;
use egui::{Color32, ColorImage};
use image::RgbaImage;
use serde::Deserialize;
use crate::layout::{self, ElementDef, Layout};
use crate::text::TextMeasure;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face { Front, Back }

impl Face {
    pub const ALL: [Face; 2] = [Face::Front, Face::Back];
    pub fn label(self) -> &'static str {
        match self { Face::Front => "front", Face::Back => "back" }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weight { #[default] Normal, Bold }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slant { #[default] Normal, Italic }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign { #[default] Left, Center, Right }

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec { pub size: f32, pub weight: Weight, pub slant: Slant }

impl FontSpec {
    pub fn plain(size: f32) -> Self { Self { size, weight: Weight::Normal, slant: Slant::Normal } }
}

#[derive(Clone, Debug)]
pub enum Element {
    Text { text: String, x: f32, y: f32, font: FontSpec, align: HAlign },
    Image { image: Option<Arc<RgbaImage>>, x: f32, y: f32, width: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox { pub x: f32, pub y: f32, pub width: f32, pub height: f32 }

impl BBox {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

impl Element {
    /// Anchor in canvas pixels: text baseline origin, or image rect origin.
    pub fn anchor(&self) -> (f32, f32) {
        match self {
            Element::Text { x, y, .. } | Element::Image { x, y, .. } => (*x, *y),
        }
    }

    pub fn set_anchor(&mut self, nx: f32, ny: f32) {
        match self {
            Element::Text { x, y, .. } | Element::Image { x, y, .. } => { *x = nx; *y = ny; }
        }
    }

    /// Hit region, recomputed on every call: text metrics shift with content
    /// and font. `None` means not hit-testable (empty text, unloaded image).
    pub fn bbox(&self, measurer: &dyn TextMeasure) -> Option<BBox> {
        match self {
            Element::Text { text, .. } if text.is_empty() => None,
            Element::Text { text, x, y, font, align } => {
                let m = measurer.measure(text, font);
                let x = match align {
                    HAlign::Left   => *x,
                    HAlign::Center => *x - m.width / 2.0,
                    HAlign::Right  => *x - m.width,
                };
                Some(BBox { x, y: *y - m.ascent, width: m.width, height: m.ascent + m.descent })
            }
            Element::Image { image: None, .. } => None,
            Element::Image { x, y, width, height, .. } =>
                Some(BBox { x: *x, y: *y, width: *width, height: *height }),
        }
    }
}

pub struct FaceSheet {
    /// Backing store for the face's 3D texture. Mutated only by the texture
    /// renderer, always together with `dirty`.
    pub pixels: ColorImage,
    pub dirty: bool,
    /// Insertion order is the stacking order: the last entry draws topmost
    /// and wins hit-testing ties.
    pub elements: Vec<(String, Element)>,
}

impl FaceSheet {
    fn new(width: usize, height: usize, fill: Color32, elements: Vec<(String, Element)>) -> Self {
        Self { pixels: ColorImage::filled([width, height], fill), dirty: true, elements }
    }

    pub fn element(&self, key: &str) -> Option<&Element> {
        self.elements.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn element_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn text_mut(&mut self, key: &str) -> Option<&mut String> {
        match self.element_mut(key) {
            Some(Element::Text { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// Topmost element containing the point, if any.
    pub fn hit_test(&self, px: f32, py: f32, measurer: &dyn TextMeasure) -> Option<&str> {
        self.elements.iter().rev()
            .find(|(_, el)| el.bbox(measurer).is_some_and(|bb| bb.contains(px, py)))
            .map(|(k, _)| k.as_str())
    }
}

pub struct CardStyle { pub background: Color32, pub foreground: Color32 }

pub struct CardDoc {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub front: FaceSheet,
    pub back: FaceSheet,
    pub style: CardStyle,
}

impl CardDoc {
    pub fn from_layout(layout: &Layout) -> Self {
        let style = CardStyle {
            background: layout::color32(layout.style.background),
            foreground: layout::color32(layout.style.foreground),
        };
        let build = |defs: &[ElementDef]| -> Vec<(String, Element)> {
            defs.iter().map(|def| (def.key().to_string(), match def {
                ElementDef::Text { text, x, y, size, weight, slant, align, .. } => Element::Text {
                    text: text.clone(), x: *x, y: *y,
                    font: FontSpec { size: *size, weight: *weight, slant: *slant },
                    align: *align,
                },
                ElementDef::Image { x, y, width, height, .. } => Element::Image {
                    image: None, x: *x, y: *y, width: *width, height: *height,
                },
            })).collect()
        };
        let (w, h) = (layout.canvas.width, layout.canvas.height);
        Self {
            canvas_width: w,
            canvas_height: h,
            front: FaceSheet::new(w, h, style.background, build(&layout.front)),
            back: FaceSheet::new(w, h, style.background, build(&layout.back)),
            style,
        }
    }

    pub fn sheet(&self, face: Face) -> &FaceSheet {
        match face { Face::Front => &self.front, Face::Back => &self.back }
    }

    pub fn sheet_mut(&mut self, face: Face) -> &mut FaceSheet {
        match face { Face::Front => &mut self.front, Face::Back => &mut self.back }
    }

    /// The logo image is shared by every image element on the card; `None`
    /// stops it from drawing and from hit-testing.
    pub fn set_logo(&mut self, image: Option<Arc<RgbaImage>>) {
        for sheet in [&mut self.front, &mut self.back] {
            for (_, el) in &mut sheet.elements {
                if let Element::Image { image: slot, .. } = el { *slot = image.clone(); }
            }
        }
    }

    pub fn logo(&self) -> Option<Arc<RgbaImage>> {
        [&self.front, &self.back].into_iter()
            .flat_map(|s| s.elements.iter())
            .find_map(|(_, el)| match el {
                Element::Image { image, .. } => image.clone(),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{TextMetrics, TextMeasure};

    /// 10px advance per char, ascent 8, descent 2 — predictable boxes.
    struct StubMeasure;
    impl TextMeasure for StubMeasure {
        fn measure(&self, text: &str, _font: &FontSpec) -> TextMetrics {
            TextMetrics { width: text.chars().count() as f32 * 10.0, ascent: 8.0, descent: 2.0 }
        }
    }

    fn text_el(text: &str, x: f32, y: f32, align: HAlign) -> Element {
        Element::Text { text: text.into(), x, y, font: FontSpec::plain(16.0), align }
    }

    #[test]
    fn bbox_alignment_shifts_origin() {
        let m = StubMeasure;
        // "card" measures 40 wide
        let left = text_el("card", 100.0, 50.0, HAlign::Left).bbox(&m).unwrap();
        assert_eq!((left.x, left.y), (100.0, 42.0));
        assert_eq!((left.width, left.height), (40.0, 10.0));
        let center = text_el("card", 100.0, 50.0, HAlign::Center).bbox(&m).unwrap();
        assert_eq!(center.x, 80.0);
        let right = text_el("card", 100.0, 50.0, HAlign::Right).bbox(&m).unwrap();
        assert_eq!(right.x, 60.0);
    }

    #[test]
    fn empty_text_has_no_bbox() {
        assert!(text_el("", 10.0, 10.0, HAlign::Left).bbox(&StubMeasure).is_none());
    }

    #[test]
    fn null_image_has_no_bbox_regardless_of_rect() {
        let el = Element::Image { image: None, x: -50.0, y: 9000.0, width: 200.0, height: 200.0 };
        assert!(el.bbox(&StubMeasure).is_none());
    }

    #[test]
    fn hit_test_prefers_last_inserted() {
        let sheet = FaceSheet::new(64, 64, Color32::WHITE, vec![
            ("under".into(), text_el("wide text under", 10.0, 30.0, HAlign::Left)),
            ("over".into(),  text_el("over", 10.0, 30.0, HAlign::Left)),
        ]);
        // (15, 28) is inside both boxes; the later entry is topmost
        assert_eq!(sheet.hit_test(15.0, 28.0, &StubMeasure), Some("over"));
        // (100, 28) only falls inside the wider, lower element
        assert_eq!(sheet.hit_test(100.0, 28.0, &StubMeasure), Some("under"));
        assert_eq!(sheet.hit_test(500.0, 500.0, &StubMeasure), None);
    }

    #[test]
    fn doc_builds_from_layout_with_logo_unset() {
        let doc = CardDoc::from_layout(crate::layout::get());
        assert_eq!(doc.front.elements.len(), 3);
        assert_eq!(doc.back.elements.len(), 2);
        assert!(doc.logo().is_none());
        // unloaded logo must not be pickable anywhere on its rect
        assert_eq!(doc.back.hit_test(500.0, 350.0, &StubMeasure), None);
        // the slogan is still pickable through its centered box
        assert_eq!(doc.back.hit_test(500.0, 195.0, &StubMeasure), Some("slogan"));
    }
}
