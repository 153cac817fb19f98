// canvas3d.rs
use egui::{Color32, Pos2, Rect, Response, Sense, Stroke, TextureHandle, TextureOptions, Ui, Vec2};
use glam::{Mat3, Vec3};
use crate::card::{CardDoc, Face};
use crate::interact::PointerState;
use crate::mesh::CardMesh;
use crate::pick::{self, Camera};
use crate::raster;
use crate::text::FontStore;

/// GPU handles for the two face textures, created lazily on first upload.
#[derive(Default)]
pub struct FaceTextures {
    front: Option<TextureHandle>,
    back: Option<TextureHandle>,
}

impl FaceTextures {
    fn slot(&mut self, face: Face) -> &mut Option<TextureHandle> {
        match face { Face::Front => &mut self.front, Face::Back => &mut self.back }
    }

    /// Pushes any dirty face buffer to the GPU and clears its flag.
    fn sync(&mut self, ui: &Ui, doc: &mut CardDoc) {
        for face in Face::ALL {
            let sheet = doc.sheet_mut(face);
            if !sheet.dirty && self.slot(face).is_some() { continue; }
            let image = sheet.pixels.clone();
            sheet.dirty = false;
            match self.slot(face) {
                Some(handle) => handle.set(image, TextureOptions::LINEAR),
                slot => *slot = Some(ui.ctx().load_texture(
                    format!("card_{}", face.label()), image, TextureOptions::LINEAR)),
            }
        }
    }
}

pub fn draw_card_canvas(
    ui: &mut Ui,
    doc: &mut CardDoc,
    cam: &mut Camera,
    yaw: &mut f32,
    pointer: &mut PointerState,
    fonts: &FontStore,
    textures: &mut FaceTextures,
    mesh: &CardMesh,
    size: Vec2,
) -> Response {
    let (resp, p) = ui.allocate_painter(size, Sense::click_and_drag());
    p.rect_filled(resp.rect, 0.0, if ui.visuals().dark_mode { Color32::from_gray(18) } else { Color32::from_gray(80) });

    let button_area = draw_view_buttons(ui, yaw, resp.rect);

    // Capture on raw pointer press, before egui's drag threshold displaces the
    // position. drag_started() fires too late: the grab offset would be wrong.
    let just_pressed = resp.hovered() && ui.input(|i| i.pointer.primary_pressed());
    if just_pressed {
        if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
            if !button_area.contains(pos) {
                let hit = pick::pick(pos, resp.rect, cam, mesh, *yaw, doc.canvas_width, doc.canvas_height);
                pointer.pointer_down(doc, hit, fonts, pos.x);
                // no element under the ray means rotation mode
            }
        }
    }
    if resp.dragged() {
        if let Some(pos) = resp.interact_pointer_pos() {
            let hit = pick::pick(pos, resp.rect, cam, mesh, *yaw, doc.canvas_width, doc.canvas_height);
            if let Some(face) = pointer.pointer_move(doc, yaw, hit, pos.x) {
                raster::render_face(doc, face, fonts);
            }
        }
    }
    if resp.drag_stopped() || ui.input(|i| i.pointer.primary_released()) {
        pointer.pointer_up();
    }

    if resp.hovered() {
        let s = ui.input(|i| i.smooth_scroll_delta.y);
        if s != 0.0 { cam.zoom(s); }
    }

    textures.sync(ui, doc);
    draw_card(&p, doc, cam, *yaw, textures, mesh, resp.rect);

    p.text(resp.rect.min + Vec2::new(8., 6.), egui::Align2::LEFT_TOP,
        match pointer {
            PointerState::DraggingElement(d) => match d.face {
                Face::Front => "Moving front element...",
                Face::Back => "Moving back element...",
            },
            PointerState::RotatingObject { .. } => "Rotating card...",
            PointerState::Idle => "Drag text/logo: move   Drag elsewhere: rotate   Scroll: zoom",
        },
        egui::FontId::proportional(11.0), Color32::from_rgba_premultiplied(200, 200, 200, 120));
    resp
}

// Painter's algorithm is enough for a convex box: cull what faces away, sort
// the rest far to near.
fn draw_card(
    p: &egui::Painter,
    doc: &CardDoc,
    cam: &Camera,
    yaw: f32,
    textures: &mut FaceTextures,
    mesh: &CardMesh,
    rect: Rect,
) {
    let rot = Mat3::from_rotation_y(yaw);
    let eye = cam.eye();

    struct Draw { corners: [Pos2; 4], depth: f32, face: Option<Face>, normal: Vec3 }
    let mut draws: Vec<Draw> = Vec::new();

    for quad in mesh.quads() {
        let normal = rot * quad.normal;
        let center = rot * quad.center();
        if normal.dot(eye - center) <= 0.0 { continue; }
        let projected: Option<Vec<Pos2>> = quad.corners.iter()
            .map(|v| cam.project(rot * v.pos, rect))
            .collect();
        let Some(corners) = projected else { continue };
        draws.push(Draw {
            corners: [corners[0], corners[1], corners[2], corners[3]],
            depth: (eye - center).length(),
            face: quad.side.card_face(),
            normal,
        });
    }
    draws.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    for d in draws {
        let [tl, tr, bl, br] = d.corners;
        match d.face {
            Some(face) => {
                let Some(handle) = textures.slot(face).as_ref() else { continue };
                let mut tex = egui::Mesh::with_texture(handle.id());
                let uvs = [Pos2::new(0.0, 0.0), Pos2::new(1.0, 0.0), Pos2::new(0.0, 1.0), Pos2::new(1.0, 1.0)];
                for (pos, uv) in [tl, tr, bl, br].into_iter().zip(uvs) {
                    tex.vertices.push(egui::epaint::Vertex { pos, uv, color: Color32::WHITE });
                }
                tex.indices.extend([0, 2, 3, 0, 3, 1]);
                p.add(egui::Shape::mesh(tex));
            }
            None => {
                // rim: flat card color shaded by how much it faces the camera
                let shade = d.normal.normalize().z.abs() * 0.4 + 0.6;
                let ch = |c: u8| (c as f32 * shade) as u8;
                let bg = doc.style.background;
                let fill = Color32::from_rgb(ch(bg.r()), ch(bg.g()), ch(bg.b()));
                p.add(egui::Shape::convex_polygon(
                    vec![tl, tr, br, bl], fill, Stroke::new(1.0, Color32::from_black_alpha(40))));
            }
        }
    }
}

fn draw_view_buttons(ui: &mut Ui, yaw: &mut f32, rect: Rect) -> Rect {
    let btn_size = Vec2::new(54.0, 28.0);
    let spacing = 6.0;
    let pad = 12.0;

    let views = [
        ("Front", 0.0, Color32::from_rgb(100, 180, 255)),
        ("Back", std::f32::consts::PI, Color32::from_rgb(0, 200, 220)),
    ];

    let total_width = (btn_size.x + spacing) * views.len() as f32 - spacing;
    let start_x = rect.center().x - total_width / 2.0;
    let y = rect.min.y + pad;

    let button_area = Rect::from_min_size(
        Pos2::new(start_x - spacing, y - spacing),
        Vec2::new(total_width + spacing * 2.0, btn_size.y + spacing * 2.0),
    );

    for (i, (label, target, color)) in views.iter().enumerate() {
        let btn_pos = Pos2::new(start_x + (btn_size.x + spacing) * i as f32, y);
        let btn_rect = Rect::from_min_size(btn_pos, btn_size);

        let hovered = ui.rect_contains_pointer(btn_rect);
        let clicked = hovered && ui.input(|i| i.pointer.primary_clicked());

        // compare against the wrapped angle so a full spin still lights up
        let wrapped = (*yaw - target).rem_euclid(std::f32::consts::TAU);
        let is_active = wrapped < 0.1 || wrapped > std::f32::consts::TAU - 0.1;

        if clicked { *yaw = *target; }

        let (opacity_mult, border_alpha, shadow_alpha) = if is_active {
            (0.55, 200, 80)
        } else if hovered {
            (0.4, 140, 60)
        } else {
            (0.25, 90, 40)
        };

        let bg = color.linear_multiply(opacity_mult);
        let border = Color32::from_rgba_premultiplied(
            ((color.r() as u16 + 155) / 2).min(255) as u8,
            ((color.g() as u16 + 155) / 2).min(255) as u8,
            ((color.b() as u16 + 155) / 2).min(255) as u8,
            border_alpha,
        );

        let painter = ui.painter();
        painter.rect_filled(btn_rect.translate(Vec2::new(1.5, 2.0)), 5.0, Color32::from_black_alpha(shadow_alpha));
        painter.rect_filled(btn_rect, 5.0, bg);

        let stroke_width = if is_active { 2.0 } else { 1.5 };
        painter.rect_stroke(btn_rect, 5.0, Stroke::new(stroke_width, border), egui::StrokeKind::Outside);

        if is_active {
            let inner_rect = btn_rect.shrink(3.0);
            painter.rect_stroke(inner_rect, 3.0, Stroke::new(1.0, Color32::from_rgba_premultiplied(255, 255, 255, 120)), egui::StrokeKind::Inside);
        }

        let text_color = Color32::from_rgba_premultiplied(255, 255, 255, if is_active { 240 } else { 180 });
        painter.text(
            btn_rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(if is_active { 12.5 } else { 12.0 }),
            text_color,
        );
    }

    button_area
}
