mod graph;
mod load;

pub use graph::{
    GraphEdge, GraphNode, PageNode, PathGraph, build_graph, legend_labels, target_title,
};
pub use load::load_paths;
