// interact.rs — press/move/release state machine. The press decides once
// whether the gesture moves an element or spins the card; the mode never
// changes mid-drag.
use crate::card::{CardDoc, Face};
use crate::pick::FaceHit;
use crate::text::TextMeasure;

/// Radians of yaw per device pixel of horizontal drag.
pub const ROTATE_SENSITIVITY: f32 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub face: Face,
    pub key: String,
    /// Grab point minus element anchor, in canvas pixels. Kept constant so
    /// the element does not snap its anchor to the pointer.
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    DraggingElement(DragSession),
    RotatingObject { last_x: f32 },
}

impl PointerState {
    /// Press: an element under the pointer starts an element drag, anything
    /// else (rim, background, bare canvas) starts a rotation.
    pub fn pointer_down(
        &mut self,
        doc: &CardDoc,
        hit: Option<FaceHit>,
        measurer: &dyn TextMeasure,
        device_x: f32,
    ) {
        *self = match hit.and_then(|hit| {
            let key = doc.sheet(hit.face).hit_test(hit.x, hit.y, measurer)?;
            let (ax, ay) = doc.sheet(hit.face).element(key)?.anchor();
            Some(DragSession {
                face: hit.face,
                key: key.to_string(),
                offset_x: hit.x - ax,
                offset_y: hit.y - ay,
            })
        }) {
            Some(session) => PointerState::DraggingElement(session),
            None => PointerState::RotatingObject { last_x: device_x },
        };
    }

    /// Move: repositions the dragged element or turns the card. Returns the
    /// face whose texture now needs repainting, if any.
    pub fn pointer_move(
        &mut self,
        doc: &mut CardDoc,
        yaw: &mut f32,
        hit: Option<FaceHit>,
        device_x: f32,
    ) -> Option<Face> {
        match self {
            PointerState::Idle => None,
            PointerState::DraggingElement(drag) => {
                // pointer slid off the card: element holds position until the
                // ray lands on a face again
                let hit = hit?;
                let el = doc.sheet_mut(drag.face).element_mut(&drag.key)?;
                el.set_anchor(hit.x - drag.offset_x, hit.y - drag.offset_y);
                Some(drag.face)
            }
            PointerState::RotatingObject { last_x } => {
                *yaw += (device_x - *last_x) * ROTATE_SENSITIVITY;
                *last_x = device_x;
                None
            }
        }
    }

    pub fn pointer_up(&mut self) {
        *self = PointerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Element, FontSpec, HAlign};
    use crate::text::{TextMetrics, TextMeasure};

    struct StubMeasure;
    impl TextMeasure for StubMeasure {
        fn measure(&self, text: &str, _font: &FontSpec) -> TextMetrics {
            TextMetrics { width: text.chars().count() as f32 * 10.0, ascent: 8.0, descent: 2.0 }
        }
    }

    fn doc() -> CardDoc {
        let mut doc = CardDoc::from_layout(crate::layout::get());
        doc.front.elements = vec![
            ("under".into(), Element::Text {
                text: "underneath".into(), x: 100.0, y: 100.0,
                font: FontSpec::plain(16.0), align: HAlign::Left,
            }),
            ("over".into(), Element::Text {
                text: "over".into(), x: 100.0, y: 100.0,
                font: FontSpec::plain(16.0), align: HAlign::Left,
            }),
        ];
        doc
    }

    fn front_hit(x: f32, y: f32) -> Option<FaceHit> {
        Some(FaceHit { face: Face::Front, x, y })
    }

    #[test]
    fn press_on_overlap_grabs_topmost() {
        let doc = doc();
        let mut state = PointerState::default();
        // (110, 95) is inside both boxes
        state.pointer_down(&doc, front_hit(110.0, 95.0), &StubMeasure, 0.0);
        match &state {
            PointerState::DraggingElement(d) => {
                assert_eq!(d.key, "over");
                assert_eq!((d.offset_x, d.offset_y), (10.0, -5.0));
            }
            other => panic!("expected element drag, got {other:?}"),
        }
    }

    #[test]
    fn drag_preserves_grab_offset_and_leaves_yaw_alone() {
        let mut doc = doc();
        let mut state = PointerState::default();
        let mut yaw = 0.3;
        state.pointer_down(&doc, front_hit(110.0, 95.0), &StubMeasure, 400.0);
        state.pointer_move(&mut doc, &mut yaw, front_hit(200.0, 150.0), 450.0);
        assert_eq!(doc.front.element("over").unwrap().anchor(), (190.0, 155.0));
        state.pointer_move(&mut doc, &mut yaw, front_hit(50.0, 60.0), 300.0);
        assert_eq!(doc.front.element("over").unwrap().anchor(), (40.0, 65.0));
        assert_eq!(yaw, 0.3);
        // the element underneath never moved
        assert_eq!(doc.front.element("under").unwrap().anchor(), (100.0, 100.0));
    }

    #[test]
    fn drag_reports_face_to_repaint() {
        let mut doc = doc();
        let mut state = PointerState::default();
        let mut yaw = 0.0;
        state.pointer_down(&doc, front_hit(110.0, 95.0), &StubMeasure, 0.0);
        assert_eq!(state.pointer_move(&mut doc, &mut yaw, front_hit(120.0, 95.0), 10.0), Some(Face::Front));
        // off the card: no move, no repaint
        assert_eq!(state.pointer_move(&mut doc, &mut yaw, None, 20.0), None);
        assert_eq!(doc.front.element("over").unwrap().anchor(), (110.0, 100.0));
    }

    #[test]
    fn press_on_bare_canvas_rotates() {
        let mut doc = doc();
        let mut state = PointerState::default();
        let mut yaw = 0.0;
        // on the face but outside every element box
        state.pointer_down(&doc, front_hit(900.0, 480.0), &StubMeasure, 640.0);
        assert_eq!(state, PointerState::RotatingObject { last_x: 640.0 });
        assert_eq!(state.pointer_move(&mut doc, &mut yaw, front_hit(900.0, 480.0), 690.0), None);
        assert!((yaw - 0.5).abs() < 1e-6);
        state.pointer_move(&mut doc, &mut yaw, None, 670.0);
        assert!((yaw - 0.3).abs() < 1e-6);
        // elements never moved
        assert_eq!(doc.front.element("over").unwrap().anchor(), (100.0, 100.0));
    }

    #[test]
    fn press_off_the_card_rotates_too() {
        let doc = doc();
        let mut state = PointerState::default();
        state.pointer_down(&doc, None, &StubMeasure, 12.0);
        assert_eq!(state, PointerState::RotatingObject { last_x: 12.0 });
    }

    #[test]
    fn release_returns_to_idle_from_every_state() {
        let doc = doc();
        for mut state in [
            PointerState::Idle,
            PointerState::RotatingObject { last_x: 5.0 },
        ] {
            state.pointer_up();
            assert_eq!(state, PointerState::Idle);
        }
        let mut state = PointerState::default();
        state.pointer_down(&doc, front_hit(110.0, 95.0), &StubMeasure, 0.0);
        state.pointer_up();
        assert_eq!(state, PointerState::Idle);
    }

    #[test]
    fn move_while_idle_is_inert() {
        let mut doc = doc();
        let mut state = PointerState::Idle;
        let mut yaw = 1.0;
        assert_eq!(state.pointer_move(&mut doc, &mut yaw, front_hit(110.0, 95.0), 77.0), None);
        assert_eq!(yaw, 1.0);
    }
}
