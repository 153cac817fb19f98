// mesh.rs — the card box: 6 quads, 12 triangles, fixed triangle-index
// layout. Quad order (and so triangle ranges) follows the classic box
// convention: right 0-1, left 2-3, top 4-5, bottom 6-7, front 8-9, back
// 10-11. Only front and back are interactive; the four rims are trim.
use glam::{Vec2, Vec3};
use crate::card::Face;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxSide { Right, Left, Top, Bottom, Front, Back }

impl BoxSide {
    const ORDER: [BoxSide; 6] = [
        BoxSide::Right, BoxSide::Left, BoxSide::Top,
        BoxSide::Bottom, BoxSide::Front, BoxSide::Back,
    ];

    pub fn card_face(self) -> Option<Face> {
        match self {
            BoxSide::Front => Some(Face::Front),
            BoxSide::Back => Some(Face::Back),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: Vec3,
    /// Texture coordinate; v grows upward, so canvas y is `(1 - v) * height`.
    pub uv: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct Quad {
    /// Corners in [top-left, top-right, bottom-left, bottom-right] order as
    /// seen from outside the box.
    pub corners: [Vertex; 4],
    pub normal: Vec3,
    pub side: BoxSide,
}

impl Quad {
    pub fn center(&self) -> Vec3 {
        self.corners.iter().map(|v| v.pos).sum::<Vec3>() / 4.0
    }
}

pub struct CardMesh {
    quads: [Quad; 6],
}

impl CardMesh {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        let (w, h, d) = (width / 2.0, height / 2.0, depth / 2.0);
        let v = |pos: Vec3, u: f32, vv: f32| Vertex { pos, uv: Vec2::new(u, vv) };
        // [tl, tr, bl, br] with uv (0,1) (1,1) (0,0) (1,0)
        let quad = |tl: Vec3, tr: Vec3, bl: Vec3, br: Vec3, normal: Vec3, side: BoxSide| Quad {
            corners: [v(tl, 0.0, 1.0), v(tr, 1.0, 1.0), v(bl, 0.0, 0.0), v(br, 1.0, 0.0)],
            normal,
            side,
        };
        let quads = BoxSide::ORDER.map(|side| match side {
            BoxSide::Right => quad(
                Vec3::new(w, h, d), Vec3::new(w, h, -d),
                Vec3::new(w, -h, d), Vec3::new(w, -h, -d),
                Vec3::X, side),
            BoxSide::Left => quad(
                Vec3::new(-w, h, -d), Vec3::new(-w, h, d),
                Vec3::new(-w, -h, -d), Vec3::new(-w, -h, d),
                Vec3::NEG_X, side),
            BoxSide::Top => quad(
                Vec3::new(-w, h, -d), Vec3::new(w, h, -d),
                Vec3::new(-w, h, d), Vec3::new(w, h, d),
                Vec3::Y, side),
            BoxSide::Bottom => quad(
                Vec3::new(-w, -h, d), Vec3::new(w, -h, d),
                Vec3::new(-w, -h, -d), Vec3::new(w, -h, -d),
                Vec3::NEG_Y, side),
            BoxSide::Front => quad(
                Vec3::new(-w, h, d), Vec3::new(w, h, d),
                Vec3::new(-w, -h, d), Vec3::new(w, -h, d),
                Vec3::Z, side),
            BoxSide::Back => quad(
                Vec3::new(w, h, -d), Vec3::new(-w, h, -d),
                Vec3::new(w, -h, -d), Vec3::new(-w, -h, -d),
                Vec3::NEG_Z, side),
        });
        Self { quads }
    }

    pub fn quads(&self) -> &[Quad; 6] {
        &self.quads
    }

    /// One of the 12 triangles, in the fixed global index order.
    pub fn triangle(&self, idx: usize) -> [Vertex; 3] {
        let [tl, tr, bl, br] = self.quads[idx / 2].corners;
        if idx % 2 == 0 { [tl, bl, br] } else { [tl, br, tr] }
    }

    pub const TRIANGLE_COUNT: usize = 12;
}

/// Which logical face a triangle index belongs to; rims are not interactive.
pub fn face_for_triangle(idx: usize) -> Option<Face> {
    match idx {
        8 | 9 => Some(Face::Front),
        10 | 11 => Some(Face::Back),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_ranges_map_to_faces() {
        for idx in 0..8 {
            assert_eq!(face_for_triangle(idx), None, "rim triangle {idx}");
        }
        assert_eq!(face_for_triangle(8), Some(Face::Front));
        assert_eq!(face_for_triangle(9), Some(Face::Front));
        assert_eq!(face_for_triangle(10), Some(Face::Back));
        assert_eq!(face_for_triangle(11), Some(Face::Back));
    }

    #[test]
    fn windings_agree_with_stored_normals() {
        let mesh = CardMesh::new(7.0, 4.0, 0.1);
        for idx in 0..CardMesh::TRIANGLE_COUNT {
            let [a, b, c] = mesh.triangle(idx);
            let n = (b.pos - a.pos).cross(c.pos - b.pos);
            let stored = mesh.quads()[idx / 2].normal;
            assert!(n.dot(stored) > 0.0, "triangle {idx} winds against its normal");
        }
    }

    #[test]
    fn face_uv_corners_span_unit_square() {
        let mesh = CardMesh::new(7.0, 4.0, 0.1);
        for quad in mesh.quads() {
            let uvs: Vec<Vec2> = quad.corners.iter().map(|v| v.uv).collect();
            assert_eq!(uvs, [Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0),
                             Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        }
    }

    #[test]
    fn front_face_top_left_is_negative_x_positive_y() {
        let mesh = CardMesh::new(7.0, 4.0, 0.1);
        let front = &mesh.quads()[4];
        assert_eq!(front.side, BoxSide::Front);
        let tl = front.corners[0].pos;
        assert!(tl.x < 0.0 && tl.y > 0.0 && tl.z > 0.0);
    }
}
