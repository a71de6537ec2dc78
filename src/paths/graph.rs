use std::collections::HashSet;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct PageNode {
    #[serde(default)]
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub degree: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct PathGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl PathGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Flattens a collection of ordered paths into a deduplicated node set and
/// the directed edges between consecutive hops. A title's degree is fixed by
/// its first appearance (paths in input order, positions in path order);
/// edges are intentionally not deduplicated, so a hop shared by several paths
/// pulls that pair together once per path.
pub fn build_graph(paths: &[Vec<PageNode>]) -> PathGraph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        for (position, page) in path.iter().enumerate() {
            if seen.insert(page.title.clone()) {
                nodes.push(GraphNode {
                    id: page.title.clone(),
                    title: page.title.clone(),
                    degree: position,
                });
            }

            if position > 0 {
                edges.push(GraphEdge {
                    source: path[position - 1].title.clone(),
                    target: page.title.clone(),
                });
            }
        }
    }

    PathGraph { nodes, edges }
}

pub fn target_title(paths: &[Vec<PageNode>]) -> Option<&str> {
    paths
        .first()
        .and_then(|path| path.last())
        .map(|page| page.title.as_str())
}

pub fn legend_labels(paths: &[Vec<PageNode>]) -> Vec<String> {
    let path_length = paths.first().map(Vec::len).unwrap_or(0);

    (0..path_length)
        .map(|degree| {
            if degree == 0 && path_length == 1 {
                "Start / end page".to_owned()
            } else if degree == 0 {
                "Start page".to_owned()
            } else if degree == path_length - 1 {
                "End page".to_owned()
            } else if degree == 1 {
                "1 degree away".to_owned()
            } else {
                format!("{degree} degrees away")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(titles: &[&str]) -> Vec<PageNode> {
        titles
            .iter()
            .map(|title| PageNode {
                title: (*title).to_owned(),
            })
            .collect()
    }

    #[test]
    fn single_path_nodes_and_edges() {
        let graph = build_graph(&[path(&["A", "B", "C"])]);

        assert_eq!(
            graph.nodes,
            vec![
                GraphNode {
                    id: "A".into(),
                    title: "A".into(),
                    degree: 0
                },
                GraphNode {
                    id: "B".into(),
                    title: "B".into(),
                    degree: 1
                },
                GraphNode {
                    id: "C".into(),
                    title: "C".into(),
                    degree: 2
                },
            ]
        );
        assert_eq!(
            graph.edges,
            vec![
                GraphEdge {
                    source: "A".into(),
                    target: "B".into()
                },
                GraphEdge {
                    source: "B".into(),
                    target: "C".into()
                },
            ]
        );
    }

    #[test]
    fn repeated_title_keeps_first_degree() {
        let graph = build_graph(&[path(&["A", "B"]), path(&["A", "C", "B"])]);

        let b = graph
            .nodes
            .iter()
            .find(|node| node.id == "B")
            .expect("B present");
        assert_eq!(b.degree, 1);
        assert_eq!(graph.nodes.iter().filter(|node| node.id == "B").count(), 1);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn edge_count_is_sum_of_hops() {
        let graph = build_graph(&[
            path(&["A", "B", "C", "D"]),
            path(&["A", "E", "D"]),
            path(&["A", "B", "C", "D"]),
        ]);

        assert_eq!(graph.edge_count(), 3 + 2 + 3);
        // The shared A->B hop shows up once per path.
        let duplicates = graph
            .edges
            .iter()
            .filter(|edge| edge.source == "A" && edge.target == "B")
            .count();
        assert_eq!(duplicates, 2);
    }

    #[test]
    fn degrees_match_positions_within_one_path() {
        let graph = build_graph(&[path(&["Start", "Mid", "Far", "End"])]);
        for (position, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.degree, position);
        }
    }

    #[test]
    fn empty_inputs_yield_empty_graph() {
        assert!(build_graph(&[]).is_empty());
        assert!(build_graph(&[Vec::new()]).is_empty());
        assert_eq!(build_graph(&[Vec::new()]).edge_count(), 0);
    }

    #[test]
    fn target_is_last_title_of_first_path() {
        let paths = [path(&["A", "B", "C"]), path(&["A", "C"])];
        assert_eq!(target_title(&paths), Some("C"));
        assert_eq!(target_title(&[]), None);
    }

    #[test]
    fn legend_labels_cover_path_lengths() {
        assert_eq!(legend_labels(&[path(&["A"])]), vec!["Start / end page"]);
        assert_eq!(
            legend_labels(&[path(&["A", "B"])]),
            vec!["Start page", "End page"]
        );
        assert_eq!(
            legend_labels(&[path(&["A", "B", "C", "D"])]),
            vec!["Start page", "1 degree away", "2 degrees away", "End page"]
        );
        assert!(legend_labels(&[]).is_empty());
    }
}
