// The cursor overlay: three follower layers driven by pointer events.
// Owns all of its mutable state; events mutate it immediately, tick()
// advances it one frame.

use super::events::{PointerEvent, Target};
use super::follower::{
    DOT_PRESS_SCALE, Follower, GLOW_DAMPING, Point, RING_DAMPING, RING_PRESS_SCALE,
};

/// Input capability of the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputProfile {
    /// A pointer is present.
    Pointer,
    /// Touch-only; the overlay is skipped entirely.
    TouchOnly,
}

/// Which layer a renderable position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Glow,
    Ring,
    Dot,
}

/// One renderable layer: position and scale.
#[derive(Debug, Clone, Copy)]
pub struct Layer {
    pub kind: LayerKind,
    pub pos: Point,
    pub scale: f32,
}

/// Pointer overlay state: one instant layer and two lagging ones.
pub struct CursorOverlay {
    pointer: Point,
    dot: Follower,
    ring: Follower,
    glow: Follower,
    hover: bool,
    pressed: bool,
}

impl CursorOverlay {
    /// Mount the overlay with all layers at the viewport center.
    ///
    /// Touch-only devices get nothing: no layers, no event handling, no
    /// frame loop.
    pub fn mount(viewport: (f32, f32), profile: InputProfile) -> Option<Self> {
        if profile == InputProfile::TouchOnly {
            return None;
        }

        let center = Point::new(viewport.0 / 2.0, viewport.1 / 2.0);
        Some(Self {
            pointer: center,
            dot: Follower::new(center, 1.0),
            ring: Follower::new(center, RING_DAMPING),
            glow: Follower::new(center, GLOW_DAMPING),
            hover: false,
            pressed: false,
        })
    }

    /// Apply one pointer event. Position updates are unsmoothed; smoothing
    /// happens only in `tick`.
    pub fn apply(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Moved { x, y } => {
                self.pointer = Point::new(*x, *y);
            }
            PointerEvent::Over { target } => {
                if target.is_interactive() {
                    self.hover = true;
                }
            }
            PointerEvent::Out { target } => {
                if target.is_interactive() {
                    self.hover = false;
                }
            }
            PointerEvent::Down => {
                self.pressed = true;
                self.dot.scale = DOT_PRESS_SCALE;
                self.ring.scale = RING_PRESS_SCALE;
            }
            PointerEvent::Up => {
                self.pressed = false;
                self.dot.scale = 1.0;
                self.ring.scale = 1.0;
            }
        }
    }

    /// Advance one animation frame: the dot snaps to the pointer, the ring
    /// and glow lag behind with their damping factors.
    pub fn tick(&mut self) {
        self.dot.advance(self.pointer);
        self.ring.advance(self.pointer);
        self.glow.advance(self.pointer);
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Whether the hover marker is set (pointer over an interactive target).
    pub fn hover_active(&self) -> bool {
        self.hover
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Layers in paint order: glow below, then ring, dot on top.
    pub fn layers(&self) -> [Layer; 3] {
        [
            Layer {
                kind: LayerKind::Glow,
                pos: self.glow.pos,
                scale: self.glow.scale,
            },
            Layer {
                kind: LayerKind::Ring,
                pos: self.ring.pos,
                scale: self.ring.scale,
            },
            Layer {
                kind: LayerKind::Dot,
                pos: self.dot.pos,
                scale: self.dot.scale,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::events::Element;

    fn overlay() -> CursorOverlay {
        CursorOverlay::mount((800.0, 600.0), InputProfile::Pointer).unwrap()
    }

    fn layer(overlay: &CursorOverlay, kind: LayerKind) -> Layer {
        *overlay
            .layers()
            .iter()
            .find(|layer| layer.kind == kind)
            .unwrap()
    }

    #[test]
    fn test_touch_only_mounts_nothing() {
        assert!(CursorOverlay::mount((800.0, 600.0), InputProfile::TouchOnly).is_none());
    }

    #[test]
    fn test_layers_start_at_viewport_center() {
        let overlay = overlay();
        for layer in overlay.layers() {
            assert_eq!(layer.pos, Point::new(400.0, 300.0));
            assert_eq!(layer.scale, 1.0);
        }
    }

    #[test]
    fn test_dot_tracks_pointer_exactly() {
        let mut overlay = overlay();

        overlay.apply(&PointerEvent::Moved { x: 12.5, y: 77.25 });
        overlay.tick();

        assert_eq!(layer(&overlay, LayerKind::Dot).pos, Point::new(12.5, 77.25));
        // The lagging layers have not caught up after one frame.
        assert_ne!(layer(&overlay, LayerKind::Ring).pos, overlay.pointer());
        assert_ne!(layer(&overlay, LayerKind::Glow).pos, overlay.pointer());
    }

    #[test]
    fn test_ring_converges_faster_than_glow() {
        let mut overlay = overlay();
        overlay.apply(&PointerEvent::Moved { x: 0.0, y: 0.0 });

        for _ in 0..10 {
            overlay.tick();
        }

        let ring_gap = layer(&overlay, LayerKind::Ring).pos.distance(overlay.pointer());
        let glow_gap = layer(&overlay, LayerKind::Glow).pos.distance(overlay.pointer());
        assert!(ring_gap < glow_gap);
    }

    #[test]
    fn test_hover_marker_follows_over_and_out() {
        let mut overlay = overlay();
        let link = Target::of(Element::tag("a"));
        let text = Target::of(Element::tag("p"));

        overlay.apply(&PointerEvent::Over {
            target: text.clone(),
        });
        assert!(!overlay.hover_active());

        overlay.apply(&PointerEvent::Over {
            target: link.clone(),
        });
        assert!(overlay.hover_active());

        // Leaving a non-interactive target changes nothing.
        overlay.apply(&PointerEvent::Out { target: text });
        assert!(overlay.hover_active());

        overlay.apply(&PointerEvent::Out { target: link });
        assert!(!overlay.hover_active());
    }

    #[test]
    fn test_press_scales_dot_and_ring_only() {
        let mut overlay = overlay();

        overlay.apply(&PointerEvent::Down);
        assert!(overlay.pressed());
        assert_eq!(layer(&overlay, LayerKind::Dot).scale, DOT_PRESS_SCALE);
        assert_eq!(layer(&overlay, LayerKind::Ring).scale, RING_PRESS_SCALE);
        assert_eq!(layer(&overlay, LayerKind::Glow).scale, 1.0);

        overlay.apply(&PointerEvent::Up);
        assert!(!overlay.pressed());
        assert_eq!(layer(&overlay, LayerKind::Dot).scale, 1.0);
        assert_eq!(layer(&overlay, LayerKind::Ring).scale, 1.0);
    }

    #[test]
    fn test_paint_order_is_glow_ring_dot() {
        let overlay = overlay();
        let kinds: Vec<LayerKind> = overlay.layers().iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, vec![LayerKind::Glow, LayerKind::Ring, LayerKind::Dot]);
    }
}
