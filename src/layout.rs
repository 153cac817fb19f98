// layout.rs — default card layout, loaded once via OnceLock; shared by card and app.
use std::sync::OnceLock;
use serde::Deserialize;
use egui::Color32;
use crate::card::{HAlign, Slant, Weight};

#[derive(Debug, Clone, Deserialize)]
pub struct CanvasSize { pub width: usize, pub height: usize }

#[derive(Debug, Clone, Deserialize)]
pub struct CardDims { pub width: f32, pub height: f32, pub depth: f32 }

#[derive(Debug, Clone, Deserialize)]
pub struct StyleDefaults { pub background: [u8; 3], pub foreground: [u8; 3] }

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementDef {
    Text {
        key: String,
        #[serde(default)] label: String,
        text: String,
        x: f32, y: f32,
        size: f32,
        #[serde(default)] weight: Weight,
        #[serde(default)] slant: Slant,
        #[serde(default)] align: HAlign,
    },
    Image {
        key: String,
        x: f32, y: f32,
        width: f32, height: f32,
    },
}

impl ElementDef {
    pub fn key(&self) -> &str {
        match self {
            ElementDef::Text { key, .. } | ElementDef::Image { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Layout {
    pub canvas: CanvasSize,
    pub card: CardDims,
    pub style: StyleDefaults,
    pub front: Vec<ElementDef>,
    pub back: Vec<ElementDef>,
}

pub fn color32(rgb: [u8; 3]) -> Color32 { Color32::from_rgb(rgb[0], rgb[1], rgb[2]) }

// include_str! requires compile-time paths; all assets must be listed here.
fn asset(name: &str) -> Result<&'static str, String> {
    match name {
        "card_layout.json" => Ok(include_str!("../assets/card_layout.json")),
        _ => Err(format!("Asset '{name}' not embedded. Add it to layout.rs asset() to embed at compile time.")),
    }
}

pub fn load<T: for<'de> Deserialize<'de>>(name: &str) -> Result<T, String> {
    serde_json::from_str(asset(name)?).map_err(|e| format!("Parse error in {name}: {e}"))
}

static LAYOUT: OnceLock<Layout> = OnceLock::new();

pub fn get() -> &'static Layout {
    LAYOUT.get_or_init(|| load("card_layout.json")
        .expect("card_layout.json missing or malformed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_layout_parses() {
        let layout = get();
        assert_eq!(layout.canvas.width, 1024);
        assert_eq!(layout.canvas.height, 512);
        let front: Vec<&str> = layout.front.iter().map(ElementDef::key).collect();
        assert_eq!(front, ["name", "title", "contact"]);
        let back: Vec<&str> = layout.back.iter().map(ElementDef::key).collect();
        assert_eq!(back, ["slogan", "logo"]);
    }

    #[test]
    fn slogan_is_centered_italic() {
        let slogan = layout_text("slogan");
        let ElementDef::Text { align, slant, .. } = slogan else { panic!("slogan is text") };
        assert_eq!(*align, HAlign::Center);
        assert_eq!(*slant, Slant::Italic);
    }

    fn layout_text(key: &str) -> &'static ElementDef {
        get().back.iter().chain(&get().front).find(|e| e.key() == key).unwrap()
    }

    #[test]
    fn unknown_asset_is_an_error() {
        assert!(load::<Layout>("nope.json").is_err());
    }
}
