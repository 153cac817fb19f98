// raster.rs — repaints a face's pixel buffer from its element list and flags
// the derived 3D texture for upload. CPU-side only; the canvas widget owns
// the actual GPU handles.
use egui::{Color32, ColorImage};
use image::RgbaImage;
use crate::card::{CardDoc, Element, Face, FaceSheet, HAlign};
use crate::text::Typeface;

/// Clears the face to the background color, draws every element in stacking
/// order (bottom to top), then marks the texture dirty. Idempotent for
/// unchanged element state.
pub fn render_face(doc: &mut CardDoc, face: Face, fonts: &dyn Typeface) {
    let bg = doc.style.background;
    let fg = doc.style.foreground;
    let FaceSheet { pixels, dirty, elements } = doc.sheet_mut(face);

    pixels.pixels.fill(bg);
    for (_, el) in elements.iter() {
        match el {
            Element::Text { text, .. } if text.is_empty() => {}
            Element::Text { text, x, y, font, align } => {
                let width = fonts.measure(text, font).width;
                let pen_x = match align {
                    HAlign::Left   => *x,
                    HAlign::Center => *x - width / 2.0,
                    HAlign::Right  => *x - width,
                };
                let (ox, oy) = (pen_x.round() as i32, y.round() as i32);
                fonts.for_each_coverage(text, font, &mut |dx, dy, cov| {
                    blend_coverage(pixels, ox + dx, oy + dy, fg, cov);
                });
            }
            Element::Image { image: Some(img), x, y, width, height } => {
                blit_scaled(pixels, img, *x, *y, *width, *height);
            }
            Element::Image { image: None, .. } => {}
        }
    }
    *dirty = true;
}

/// Repaints both faces; the form panel calls this on every edit and the app
/// once at startup.
pub fn render_all(doc: &mut CardDoc, fonts: &dyn Typeface) {
    for face in Face::ALL {
        render_face(doc, face, fonts);
    }
}

fn blend_coverage(buf: &mut ColorImage, px: i32, py: i32, fg: Color32, cov: f32) {
    let [w, h] = buf.size;
    if px < 0 || py < 0 || px >= w as i32 || py >= h as i32 || cov <= 0.0 {
        return;
    }
    let idx = py as usize * w + px as usize;
    buf.pixels[idx] = lerp_color(buf.pixels[idx], fg, cov.min(1.0));
}

// Nearest-neighbor scale into the rect, alpha-blended over the buffer.
// Clipped at the buffer edge: elements may be dragged off-canvas.
fn blit_scaled(buf: &mut ColorImage, img: &RgbaImage, x: f32, y: f32, width: f32, height: f32) {
    let (tw, th) = (width.round() as i32, height.round() as i32);
    if tw <= 0 || th <= 0 || img.width() == 0 || img.height() == 0 {
        return;
    }
    let [bw, bh] = buf.size;
    let (ox, oy) = (x.round() as i32, y.round() as i32);
    for ty in 0..th {
        let py = oy + ty;
        if py < 0 || py >= bh as i32 { continue; }
        let sy = (ty as u32 * img.height() / th as u32).min(img.height() - 1);
        for tx in 0..tw {
            let px = ox + tx;
            if px < 0 || px >= bw as i32 { continue; }
            let sx = (tx as u32 * img.width() / tw as u32).min(img.width() - 1);
            let [r, g, b, a] = img.get_pixel(sx, sy).0;
            if a == 0 { continue; }
            let idx = py as usize * bw + px as usize;
            let src = Color32::from_rgb(r, g, b);
            buf.pixels[idx] = lerp_color(buf.pixels[idx], src, a as f32 / 255.0);
        }
    }
}

fn lerp_color(dst: Color32, src: Color32, t: f32) -> Color32 {
    let ch = |d: u8, s: u8| (d as f32 + (s as f32 - d as f32) * t).round() as u8;
    Color32::from_rgb(ch(dst.r(), src.r()), ch(dst.g(), src.g()), ch(dst.b(), src.b()))
}
