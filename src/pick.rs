// pick.rs — pointer position → camera ray → card face hit → canvas pixels.
// The camera sits on +Z looking at the origin; the card owns the rotation,
// so rays are cast in object space instead of rotating twelve triangles.
use egui::{Pos2, Rect};
use glam::{Mat3, Vec3};
use crate::card::Face;
use crate::mesh::{self, CardMesh};

pub struct Camera {
    /// Eye distance along +Z, driven by the scroll wheel.
    pub distance: f32,
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { distance: 5.0, fov_y: 75f32.to_radians() }
    }
}

impl Camera {
    const MIN_DISTANCE: f32 = 2.0;
    const MAX_DISTANCE: f32 = 15.0;

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.005)
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// Ray through a pointer position, in world space.
    pub fn ray_through(&self, pointer: Pos2, viewport: Rect) -> (Vec3, Vec3) {
        let ndc_x = ((pointer.x - viewport.min.x) / viewport.width()) * 2.0 - 1.0;
        let ndc_y = -(((pointer.y - viewport.min.y) / viewport.height()) * 2.0 - 1.0);
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * viewport.aspect_ratio();
        let dir = Vec3::new(ndc_x * half_w, ndc_y * half_h, -1.0).normalize();
        (self.eye(), dir)
    }

    /// Perspective projection to viewport pixels; `None` behind the eye.
    pub fn project(&self, p: Vec3, viewport: Rect) -> Option<Pos2> {
        let v = p - self.eye();
        let z = -v.z;
        if z < 0.01 {
            return None;
        }
        let half_h = (self.fov_y * 0.5).tan();
        let half_w = half_h * viewport.aspect_ratio();
        Some(Pos2::new(
            viewport.center().x + (v.x / (z * half_w)) * viewport.width() * 0.5,
            viewport.center().y - (v.y / (z * half_h)) * viewport.height() * 0.5,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceHit {
    pub face: Face,
    /// Canvas pixel coordinates on that face.
    pub x: f32,
    pub y: f32,
}

/// Nearest intersection only. Rim hits and misses both resolve to `None`;
/// that is normal interaction flow, not an error.
pub fn pick(
    pointer: Pos2,
    viewport: Rect,
    camera: &Camera,
    card: &CardMesh,
    yaw: f32,
    canvas_width: usize,
    canvas_height: usize,
) -> Option<FaceHit> {
    let (origin, dir) = camera.ray_through(pointer, viewport);
    let unrotate = Mat3::from_rotation_y(-yaw);
    let (origin, dir) = (unrotate * origin, unrotate * dir);

    let mut nearest: Option<(f32, usize, f32, f32)> = None;
    for idx in 0..CardMesh::TRIANGLE_COUNT {
        let [a, b, c] = card.triangle(idx);
        if let Some((t, u, v)) = ray_triangle(origin, dir, a.pos, b.pos, c.pos) {
            if nearest.is_none_or(|(best, ..)| t < best) {
                nearest = Some((t, idx, u, v));
            }
        }
    }
    let (_, idx, u, v) = nearest?;
    let face = mesh::face_for_triangle(idx)?;

    let [a, b, c] = card.triangle(idx);
    let uv = a.uv * (1.0 - u - v) + b.uv * u + c.uv * v;
    Some(FaceHit {
        face,
        x: uv.x * canvas_width as f32,
        // texture v grows upward, canvas y downward
        y: (1.0 - uv.y) * canvas_height as f32,
    })
}

// Möller–Trumbore; returns (t, barycentric u, barycentric v).
fn ray_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<(f32, f32, f32)> {
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-7 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > 1e-4).then_some((t, u, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn setup() -> (CardMesh, Camera, Rect) {
        let mesh = CardMesh::new(7.0, 4.0, 0.1);
        let camera = Camera::default();
        let viewport = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 800.0));
        (mesh, camera, viewport)
    }

    #[test]
    fn center_hit_resolves_to_canvas_midpoint() {
        let (mesh, camera, viewport) = setup();
        let hit = pick(viewport.center(), viewport, &camera, &mesh, 0.0, 1024, 512).unwrap();
        assert_eq!(hit.face, Face::Front);
        assert!((hit.x - 512.0).abs() < 0.5, "x was {}", hit.x);
        assert!((hit.y - 256.0).abs() < 0.5, "y was {}", hit.y);
    }

    #[test]
    fn flipped_card_exposes_the_back() {
        let (mesh, camera, viewport) = setup();
        let hit = pick(viewport.center(), viewport, &camera, &mesh, PI, 1024, 512).unwrap();
        assert_eq!(hit.face, Face::Back);
        assert!((hit.x - 512.0).abs() < 0.5);
        assert!((hit.y - 256.0).abs() < 0.5);
    }

    #[test]
    fn uv_maps_linearly_across_the_face() {
        let (mesh, camera, viewport) = setup();
        // project a known object point: 30% across, 40% down the front face
        let p = Vec3::new(-3.5 + 0.3 * 7.0, 2.0 - 0.4 * 4.0, 0.05);
        let screen = camera.project(p, viewport).unwrap();
        let hit = pick(screen, viewport, &camera, &mesh, 0.0, 1024, 512).unwrap();
        assert_eq!(hit.face, Face::Front);
        assert!((hit.x - 0.3 * 1024.0).abs() < 1.0, "x was {}", hit.x);
        assert!((hit.y - 0.4 * 512.0).abs() < 1.0, "y was {}", hit.y);
    }

    #[test]
    fn pointer_off_the_card_misses() {
        let (mesh, camera, viewport) = setup();
        assert_eq!(pick(Pos2::new(1.0, 1.0), viewport, &camera, &mesh, 0.0, 1024, 512), None);
    }

    #[test]
    fn edge_on_card_hits_a_rim_not_a_face() {
        let (mesh, camera, viewport) = setup();
        // quarter turn: the right rim faces the camera head-on
        assert_eq!(pick(viewport.center(), viewport, &camera, &mesh, PI / 2.0, 1024, 512), None);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom(1e6);
        assert_eq!(camera.distance, 2.0);
        camera.zoom(-1e7);
        assert_eq!(camera.distance, 15.0);
    }
}
