use eframe::egui::{Sense, Stroke, Ui, vec2};

use super::super::render_utils::{darker, degree_color};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_legend(&self, ui: &mut Ui) {
        ui.heading("Legend");
        ui.separator();
        ui.add_space(4.0);

        if self.legend.is_empty() {
            ui.label("Nothing loaded.");
            return;
        }

        for (degree, label) in self.legend.iter().enumerate() {
            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(vec2(16.0, 16.0), Sense::hover());
                let color = degree_color(degree);
                ui.painter().circle_filled(swatch.center(), 6.0, color);
                ui.painter()
                    .circle_stroke(swatch.center(), 6.0, Stroke::new(1.5, darker(color)));
                ui.label(label);
            });
        }

        ui.add_space(12.0);
        ui.separator();
        ui.label("Drag to pan. Scroll to zoom.");
        ui.label("Click a node to open its Wikipedia page.");
        ui.label("Drag a node to pin it under the pointer.");
    }
}
