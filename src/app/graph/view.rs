use std::time::Duration;

use eframe::egui::{
    self, Align2, Color32, FontId, OpenUrl, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};

use crate::util::wikipedia_page_url;

use super::super::render_utils::{
    circle_visible, darker, degree_color, draw_background, screen_to_world, world_to_screen,
};
use super::super::sim::{ForceSimulation, SimNode};
use super::super::ViewModel;

const BASE_NODE_RADIUS: f32 = 6.0;
const ENDPOINT_NODE_RADIUS: f32 = 10.0;

impl ViewModel {
    pub(in crate::app) fn ensure_simulation(&mut self, width: f32) {
        if self.sim.is_some() {
            return;
        }

        self.observed_width = width;
        self.applied_width = width;
        self.sim = Some(ForceSimulation::new(
            &self.graph,
            Self::center_for_width(width),
            self.config,
        ));

        if !self.graph.is_empty() {
            self.scheduler.start();
        }
    }

    fn node_radius(&self, node: &SimNode) -> f32 {
        let is_target = self.target_id.as_deref() == Some(node.id.as_str());
        if node.degree == 0 || is_target {
            ENDPOINT_NODE_RADIUS
        } else {
            BASE_NODE_RADIUS
        }
    }

    fn hit_test(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        let sim = self.sim.as_ref()?;
        if !rect.contains(pointer) {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (index, node) in sim.nodes().iter().enumerate() {
            let position = world_to_screen(rect, self.transform, node.pos);
            let hit_radius = ((self.node_radius(node) * self.transform.k) + 4.0).max(8.0);
            let distance = position.distance(pointer);
            if distance <= hit_radius && best.is_none_or(|(_, nearest)| distance < nearest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.transform);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No paths to display.",
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
            return;
        }

        self.ensure_simulation(rect.width());
        let now = ui.input(|input| input.time);

        self.handle_graph_zoom(ui, rect, &response);

        // Pointer handling happens before this frame's batch so a fresh pin
        // is honored by the very next integration step.
        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .and_then(|pointer| self.hit_test(rect, pointer));
        let drag_pointer = response.interact_pointer_pos();

        if response.drag_started() {
            match (hovered, drag_pointer) {
                (Some(index), Some(pointer)) => {
                    self.begin_node_drag(index, screen_to_world(rect, self.transform, pointer));
                }
                _ => self.panning = true,
            }
        }
        if response.dragged() {
            if self.dragged_node.is_some() {
                if let Some(pointer) = drag_pointer {
                    self.update_node_drag(screen_to_world(rect, self.transform, pointer));
                }
            } else if self.panning {
                self.transform.translate(response.drag_delta());
            }
        }
        if response.drag_stopped() {
            self.end_node_drag();
            self.panning = false;
        }

        if response.clicked()
            && let (Some(index), Some(sim)) = (hovered, self.sim.as_ref())
        {
            let url = wikipedia_page_url(&sim.nodes()[index].id);
            ui.ctx().open_url(OpenUrl::new_tab(url));
        }

        if self.pending_reset {
            self.pending_reset = false;
            self.reset_graph(true, now);
        }
        self.observe_width(rect.width(), now);
        let debounce_remaining = self.poll_resize(now);
        let animating = self.advance_reset_animation(now);

        let mut keep_running = false;
        if let Some(sim) = self.sim.as_mut() {
            keep_running = self.scheduler.on_frame(sim);
        }

        if keep_running || animating {
            ui.ctx().request_repaint();
        }
        if let Some(remaining) = debounce_remaining {
            ui.ctx().request_repaint_after(Duration::from_secs_f64(remaining));
        }

        if hovered.is_some() || self.dragged_node.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.dragged_node.is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        // Publish: paint from the post-batch state.
        let Some(sim) = self.sim.as_ref() else {
            return;
        };
        let zoom = self.transform.k;
        let screen_positions = sim
            .nodes()
            .iter()
            .map(|node| world_to_screen(rect, self.transform, node.pos))
            .collect::<Vec<_>>();
        let screen_radii = sim
            .nodes()
            .iter()
            .map(|node| (self.node_radius(node) * zoom).clamp(2.0, 40.0))
            .collect::<Vec<_>>();

        let edge_stroke = Stroke::new(
            (1.2 * zoom).clamp(0.5, 3.0),
            Color32::from_rgba_unmultiplied(130, 140, 150, 200),
        );
        for &(source, target) in sim.edges() {
            let start = screen_positions[source];
            let end = screen_positions[target];
            let delta = end - start;
            if delta.length_sq() < 1.0 {
                continue;
            }

            let direction = delta / delta.length();
            let tip = end - (direction * (screen_radii[target] + 2.0));
            let arrow = (6.0 * zoom).clamp(3.0, 12.0);
            let perp = vec2(-direction.y, direction.x) * (arrow * 0.45);
            let base = tip - (direction * arrow);

            painter.line_segment([start, base], edge_stroke);
            painter.add(Shape::convex_polygon(
                vec![tip, base + perp, base - perp],
                edge_stroke.color,
                Stroke::NONE,
            ));
        }

        for (index, node) in sim.nodes().iter().enumerate() {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, position, radius + 140.0) {
                continue;
            }

            let fill = degree_color(node.degree);
            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(position, radius, Stroke::new(1.5, darker(fill)));
            painter.text(
                position + vec2(radius + 5.0, 0.0),
                Align2::LEFT_CENTER,
                &node.title,
                FontId::proportional(12.0),
                Color32::from_gray(235),
            );
        }
    }
}
