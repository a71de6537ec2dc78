use eframe::egui::{self, Align, Context, Layout};

use crate::paths::{self, PageNode};

use super::super::render_utils::ViewTransform;
use super::super::scheduler::TickScheduler;
use super::super::sim::ForceConfig;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(paths: &[Vec<PageNode>]) -> Self {
        let graph = paths::build_graph(paths);
        let target_id = paths::target_title(paths).map(str::to_owned);
        let legend = paths::legend_labels(paths);

        Self {
            path_count: paths.len(),
            graph,
            target_id,
            legend,
            config: ForceConfig::default(),
            sim: None,
            scheduler: TickScheduler::new(),
            transform: ViewTransform::IDENTITY,
            reset_anim: None,
            dragged_node: None,
            panning: false,
            active_interactions: 0,
            observed_width: 0.0,
            applied_width: 0.0,
            resize_pending_since: None,
            pending_reset: false,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("pathviz");
                    ui.separator();
                    ui.label(format!("paths: {}", self.path_count));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    if let Some(target) = &self.target_id {
                        ui.label(format!("target: {target}"));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let reset_button = ui
                            .button("Reset layout")
                            .on_hover_text("Recenter the layout and zoom back to the default view.");
                        if reset_button.clicked() {
                            self.request_reset();
                        }
                    });
                });
            });

        egui::SidePanel::left("legend")
            .resizable(false)
            .default_width(230.0)
            .show(ctx, |ui| self.draw_legend(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    pub(in crate::app) fn teardown(&mut self) {
        self.scheduler.stop();
    }
}
