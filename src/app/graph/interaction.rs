use eframe::egui::{Rect, Response, Ui, Vec2, vec2};

use super::super::render_utils::{DEFAULT_CHART_HEIGHT, ViewTransform};
use super::super::{TransformAnimation, ViewModel};

pub(in crate::app) const RESTART_ALPHA: f32 = 0.3;
pub(in crate::app) const RESIZE_DEBOUNCE_SECS: f64 = 0.35;
pub(in crate::app) const RESET_ANIM_SECS: f64 = 0.75;

// d3's default transition easing.
fn ease_cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - ((-2.0 * t) + 2.0).powi(3) / 2.0
    }
}

impl ViewModel {
    pub(in crate::app) fn center_for_width(width: f32) -> Vec2 {
        vec2(width / 2.0, DEFAULT_CHART_HEIGHT / 2.0)
    }

    /// Drag start on a node: re-energize the layout if no other interaction
    /// already did, then hold the node at the pointer.
    pub(in crate::app) fn begin_node_drag(&mut self, index: usize, point: Vec2) {
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        if self.active_interactions == 0 {
            sim.reheat(RESTART_ALPHA);
            if self.scheduler.is_idle() {
                self.scheduler.restart();
            }
        }
        self.active_interactions += 1;
        sim.pin(index, point);
        self.dragged_node = Some(index);
    }

    pub(in crate::app) fn update_node_drag(&mut self, point: Vec2) {
        if let (Some(index), Some(sim)) = (self.dragged_node, self.sim.as_mut()) {
            sim.pin(index, point);
        }
    }

    /// Drag end: release the pin; the decay floor is cleared only once the
    /// last active interaction lets go.
    pub(in crate::app) fn end_node_drag(&mut self) {
        let Some(index) = self.dragged_node.take() else {
            return;
        };

        if let Some(sim) = self.sim.as_mut() {
            sim.unpin(index);
            self.active_interactions = self.active_interactions.saturating_sub(1);
            if self.active_interactions == 0 {
                sim.cool();
            }
        }
    }

    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.transform.zoom_about(pointer - rect.left_top(), factor);
    }

    pub(in crate::app) fn request_reset(&mut self) {
        self.pending_reset = true;
    }

    /// Recenter + restart. `force` is the explicit reset button; the resize
    /// path passes false so nothing happens unless the width actually moved.
    pub(in crate::app) fn reset_graph(&mut self, force: bool, now: f64) {
        let prior_width = self.applied_width;
        self.applied_width = self.observed_width;

        if !force && prior_width == self.applied_width {
            return;
        }

        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        log::debug!(
            "recentering layout for width {} (forced: {force})",
            self.applied_width
        );
        sim.set_center(Self::center_for_width(self.applied_width));
        sim.set_alpha(RESTART_ALPHA);
        self.scheduler.restart();
        self.reset_anim = Some(TransformAnimation {
            from: self.transform,
            started: now,
        });
    }

    pub(in crate::app) fn observe_width(&mut self, width: f32, now: f64) {
        if (width - self.observed_width).abs() <= 0.5 {
            return;
        }

        self.observed_width = width;
        self.resize_pending_since = Some(now);
    }

    /// Trailing-edge debounce: returns the seconds left in the quiet period
    /// while a resize is pending, otherwise applies it.
    pub(in crate::app) fn poll_resize(&mut self, now: f64) -> Option<f64> {
        let since = self.resize_pending_since?;
        let elapsed = now - since;
        if elapsed < RESIZE_DEBOUNCE_SECS {
            return Some(RESIZE_DEBOUNCE_SECS - elapsed);
        }

        self.resize_pending_since = None;
        self.reset_graph(false, now);
        None
    }

    /// Eases the transform back to identity; returns true while the
    /// animation still has frames left.
    pub(in crate::app) fn advance_reset_animation(&mut self, now: f64) -> bool {
        let Some(anim) = self.reset_anim else {
            return false;
        };

        let t = ((now - anim.started) / RESET_ANIM_SECS) as f32;
        if t >= 1.0 {
            self.transform = ViewTransform::IDENTITY;
            self.reset_anim = None;
            return false;
        }

        self.transform = ViewTransform::lerp(
            anim.from,
            ViewTransform::IDENTITY,
            ease_cubic_in_out(t.max(0.0)),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PageNode;

    fn model() -> ViewModel {
        let paths = vec![
            vec![
                PageNode { title: "A".into() },
                PageNode { title: "B".into() },
                PageNode { title: "C".into() },
            ],
            vec![
                PageNode { title: "A".into() },
                PageNode { title: "D".into() },
                PageNode { title: "C".into() },
            ],
        ];
        let mut model = ViewModel::new(&paths);
        model.ensure_simulation(800.0);
        model
    }

    #[test]
    fn reset_is_idempotent_on_the_view_transform() {
        let mut model = model();
        model.transform = ViewTransform {
            x: 50.0,
            y: 30.0,
            k: 2.0,
        };

        model.observe_width(800.0, 0.0);
        model.reset_graph(true, 0.0);
        assert!(model.advance_reset_animation(0.2));
        assert!(!model.advance_reset_animation(1.0));
        assert_eq!(model.transform, ViewTransform::IDENTITY);

        model.reset_graph(true, 2.0);
        assert!(!model.advance_reset_animation(3.0));
        assert_eq!(model.transform, ViewTransform::IDENTITY);
    }

    #[test]
    fn drag_lifecycle_pins_and_releases() {
        let mut model = model();

        // Let the layout go idle first.
        {
            let sim = model.sim.as_mut().unwrap();
            while model.scheduler.on_frame(sim) {}
        }
        assert!(model.scheduler.is_idle());

        model.begin_node_drag(1, vec2(120.0, 90.0));
        assert!(!model.scheduler.is_idle());
        let sim = model.sim.as_ref().unwrap();
        assert_eq!(sim.nodes()[1].pin, Some(vec2(120.0, 90.0)));
        assert!(sim.alpha() >= RESTART_ALPHA);

        model.update_node_drag(vec2(140.0, 95.0));
        assert_eq!(
            model.sim.as_ref().unwrap().nodes()[1].pin,
            Some(vec2(140.0, 95.0))
        );

        model.end_node_drag();
        let sim = model.sim.as_mut().unwrap();
        assert_eq!(sim.nodes()[1].pin, None);

        // Floor cleared: the layout can settle again.
        for _ in 0..1000 {
            sim.step();
        }
        assert!(sim.alpha() <= 1e-3);
    }

    #[test]
    fn reset_during_drag_does_not_cool_the_floor() {
        let mut model = model();

        model.begin_node_drag(0, vec2(10.0, 10.0));
        model.observe_width(800.0, 0.0);
        model.reset_graph(true, 0.0);

        // The drag's floor survives the reset; alpha cannot decay away.
        let sim = model.sim.as_mut().unwrap();
        for _ in 0..500 {
            sim.step();
        }
        assert!(sim.alpha() >= RESTART_ALPHA);

        model.end_node_drag();
        let sim = model.sim.as_mut().unwrap();
        for _ in 0..1000 {
            sim.step();
        }
        assert!(sim.alpha() <= 1e-3);
    }

    #[test]
    fn resize_relayout_is_debounced_and_conditional() {
        let mut model = model();
        assert_eq!(model.applied_width, 800.0);

        model.observe_width(1000.0, 1.0);
        assert!(model.poll_resize(1.1).is_some());
        assert_eq!(model.applied_width, 800.0);

        // Still inside the quiet period after another burst.
        model.observe_width(1100.0, 1.2);
        assert!(model.poll_resize(1.3).is_some());

        assert!(model.poll_resize(1.6).is_none());
        assert_eq!(model.applied_width, 1100.0);
        assert!(!model.scheduler.is_idle());
        assert!((model.sim.as_ref().unwrap().alpha() - RESTART_ALPHA).abs() < 1e-6);
    }

    #[test]
    fn unchanged_width_never_triggers_relayout() {
        let mut model = model();
        let alpha_before = model.sim.as_ref().unwrap().alpha();

        model.observe_width(800.0, 5.0);
        assert!(model.resize_pending_since.is_none());
        assert!(model.poll_resize(6.0).is_none());
        assert_eq!(model.sim.as_ref().unwrap().alpha(), alpha_before);
        assert!(model.reset_anim.is_none());
    }

    #[test]
    fn zoom_factor_math_anchors_on_the_pointer() {
        let mut model = model();
        model.transform = ViewTransform {
            x: 12.0,
            y: -8.0,
            k: 1.0,
        };

        let anchor = vec2(100.0, 200.0);
        let world_before = (anchor - vec2(model.transform.x, model.transform.y)) / model.transform.k;
        model.transform.zoom_about(anchor, 1.15);
        let world_after = (anchor - vec2(model.transform.x, model.transform.y)) / model.transform.k;
        assert!((world_after - world_before).length() < 1e-3);
    }
}
