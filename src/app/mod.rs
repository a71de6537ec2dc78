use eframe::egui::Context;

use crate::paths::{PageNode, PathGraph};

mod graph;
mod render_utils;
mod scheduler;
mod sim;
mod ui;

use render_utils::ViewTransform;
use scheduler::TickScheduler;
use sim::{ForceConfig, ForceSimulation};

pub struct PathVizApp {
    model: ViewModel,
}

struct ViewModel {
    graph: PathGraph,
    target_id: Option<String>,
    legend: Vec<String>,
    path_count: usize,
    config: ForceConfig,
    sim: Option<ForceSimulation>,
    scheduler: TickScheduler,
    transform: ViewTransform,
    reset_anim: Option<TransformAnimation>,
    dragged_node: Option<usize>,
    panning: bool,
    active_interactions: usize,
    observed_width: f32,
    applied_width: f32,
    resize_pending_since: Option<f64>,
    pending_reset: bool,
}

#[derive(Clone, Copy)]
struct TransformAnimation {
    from: ViewTransform,
    started: f64,
}

impl PathVizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, paths: &[Vec<PageNode>]) -> Self {
        Self {
            model: ViewModel::new(paths),
        }
    }
}

impl eframe::App for PathVizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.model.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.model.teardown();
    }
}
