mod charge;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::paths::PathGraph;
use crate::util::stable_pair;

use charge::{QuadNode, accumulate_repulsion};

#[derive(Clone, Copy)]
pub(in crate::app) struct ForceConfig {
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub charge_softening: f32,
    pub charge_theta: f32,
    pub center_strength: f32,
    pub velocity_damping: f32,
    pub alpha_decay: f32,
    pub seed_radius: f32,
    pub max_speed: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            link_distance: 60.0,
            link_strength: 0.06,
            charge_strength: 2800.0,
            charge_softening: 140.0,
            charge_theta: 0.72,
            center_strength: 0.04,
            velocity_damping: 0.6,
            alpha_decay: 0.02,
            seed_radius: 150.0,
            max_speed: 24.0,
        }
    }
}

pub(in crate::app) struct SimNode {
    pub id: String,
    pub title: String,
    pub degree: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub pin: Option<Vec2>,
}

struct ForceScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
}

/// Mutable layout state for the whole graph. Nothing outside this type moves
/// a node: the view reads positions through `nodes()`, and interactions go
/// through `pin`/`unpin`/`set_center`/`reheat`/`cool`/`set_alpha`.
pub(in crate::app) struct ForceSimulation {
    nodes: Vec<SimNode>,
    edges: Vec<(usize, usize)>,
    alpha: f32,
    alpha_target: f32,
    center: Vec2,
    config: ForceConfig,
    scratch: ForceScratch,
}

impl ForceSimulation {
    pub fn new(graph: &PathGraph, center: Vec2, config: ForceConfig) -> Self {
        let mut index_by_id = HashMap::with_capacity(graph.nodes.len());
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                index_by_id.insert(node.id.clone(), index);
                SimNode {
                    id: node.id.clone(),
                    title: node.title.clone(),
                    degree: node.degree,
                    pos: center + seed_offset(&node.id, index) * config.seed_radius,
                    vel: Vec2::ZERO,
                    pin: None,
                }
            })
            .collect::<Vec<_>>();

        let edges = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let source = index_by_id.get(&edge.source)?;
                let target = index_by_id.get(&edge.target)?;
                Some((*source, *target))
            })
            .collect();

        Self {
            nodes,
            edges,
            alpha: 1.0,
            alpha_target: 0.0,
            center,
            config,
            scratch: ForceScratch {
                forces: Vec::new(),
                positions: Vec::new(),
            },
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Raises the decay floor so the layout keeps responding while an
    /// interaction is active. Raising to the same or a higher floor is safe;
    /// the floor only drops via `cool`.
    pub fn reheat(&mut self, floor: f32) {
        let floor = floor.clamp(0.0, 1.0);
        self.alpha_target = self.alpha_target.max(floor);
        self.alpha = self.alpha.max(floor);
    }

    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn pin(&mut self, index: usize, point: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(point);
            node.pos = point;
            node.vel = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// One integration tick: accumulate link, charge, and center
    /// contributions scaled by the current alpha, integrate with damping,
    /// clamp pinned nodes back onto their pins, then decay alpha toward the
    /// floor. Stepping is the only way state advances.
    pub fn step(&mut self) {
        let node_count = self.nodes.len();
        let alpha = self.alpha;

        if node_count > 0 {
            let scratch = &mut self.scratch;
            scratch.forces.resize(node_count, Vec2::ZERO);
            scratch.forces.fill(Vec2::ZERO);
            scratch.positions.clear();
            scratch
                .positions
                .extend(self.nodes.iter().map(|node| node.pos));

            let forces = &mut scratch.forces;
            let positions = &scratch.positions;

            if let Some(tree) = QuadNode::build(positions) {
                for (index, force) in forces.iter_mut().enumerate() {
                    accumulate_repulsion(
                        &tree,
                        index,
                        positions,
                        self.config.charge_strength * alpha,
                        self.config.charge_softening,
                        self.config.charge_theta,
                        force,
                    );
                }
            }

            for &(source, target) in &self.edges {
                if source == target || source >= node_count || target >= node_count {
                    continue;
                }

                let delta = positions[target] - positions[source];
                let distance_sq = delta.length_sq();
                if distance_sq <= 0.0001 * 0.0001 {
                    continue;
                }
                let distance = distance_sq.sqrt();
                let direction = delta / distance;

                let displacement = (distance - self.config.link_distance)
                    * self.config.link_strength
                    * alpha;
                let correction = direction * displacement;

                forces[source] += correction;
                forces[target] -= correction;
            }

            for (index, force) in forces.iter_mut().enumerate() {
                *force += (self.center - positions[index]) * self.config.center_strength * alpha;
            }

            let max_speed_sq = self.config.max_speed * self.config.max_speed;
            for (node, force) in self.nodes.iter_mut().zip(forces.iter()) {
                let mut velocity = (node.vel + *force) * self.config.velocity_damping;
                if !velocity.is_finite() {
                    velocity = Vec2::ZERO;
                }
                let speed_sq = velocity.length_sq();
                if speed_sq > max_speed_sq {
                    velocity *= self.config.max_speed / speed_sq.sqrt();
                }

                node.vel = velocity;
                node.pos += velocity;
                if !node.pos.is_finite() {
                    node.pos = self.center;
                    node.vel = Vec2::ZERO;
                }

                if let Some(pin) = node.pin {
                    node.pos = pin;
                    node.vel = Vec2::ZERO;
                }
            }
        }

        self.alpha = (self.alpha * (1.0 - self.config.alpha_decay)).max(self.alpha_target);
    }
}

fn seed_offset(id: &str, index: usize) -> Vec2 {
    let (jx, jy) = stable_pair(id);
    let offset = vec2(jx, jy);
    if offset.length_sq() > 0.0001 {
        return offset;
    }

    let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{PageNode, build_graph};

    fn chain(titles: &[&str]) -> PathGraph {
        build_graph(&[titles
            .iter()
            .map(|title| PageNode {
                title: (*title).to_owned(),
            })
            .collect()])
    }

    fn sim(titles: &[&str]) -> ForceSimulation {
        ForceSimulation::new(&chain(titles), vec2(400.0, 300.0), ForceConfig::default())
    }

    #[test]
    fn seeding_is_deterministic() {
        let first = sim(&["A", "B", "C"]);
        let second = sim(&["A", "B", "C"]);
        for (a, b) in first.nodes().iter().zip(second.nodes()) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn alpha_decays_below_threshold_in_bounded_steps() {
        let mut sim = sim(&["A", "B", "C"]);
        let mut previous = sim.alpha();
        let mut steps = 0usize;

        while sim.alpha() > 1e-3 {
            sim.step();
            assert!(sim.alpha() < previous, "decay must be strictly monotonic");
            previous = sim.alpha();
            steps += 1;
            assert!(steps < 1000, "alpha never reached the stop threshold");
        }
    }

    #[test]
    fn reheat_floor_holds_until_cooled() {
        let mut sim = sim(&["A", "B"]);
        sim.reheat(0.3);

        for _ in 0..400 {
            sim.step();
        }
        assert!(sim.alpha() >= 0.3);

        // A lower floor must not undo a higher one.
        sim.reheat(0.1);
        sim.step();
        assert!(sim.alpha() >= 0.3);

        sim.cool();
        for _ in 0..1000 {
            sim.step();
        }
        assert!(sim.alpha() <= 1e-3);
    }

    #[test]
    fn pinned_node_never_moves() {
        let mut sim = sim(&["A", "B", "C", "D"]);
        let pin = vec2(42.0, 17.0);
        sim.pin(1, pin);

        for _ in 0..300 {
            sim.step();
            assert_eq!(sim.nodes()[1].pos, pin);
            assert_eq!(sim.nodes()[1].vel, Vec2::ZERO);
        }

        sim.unpin(1);
        sim.reheat(0.3);
        sim.step();
        assert_ne!(sim.nodes()[1].pos, pin);
    }

    #[test]
    fn coincident_nodes_stay_finite_and_separate() {
        let mut sim = sim(&["A", "B"]);
        let point = vec2(100.0, 100.0);
        sim.pin(0, point);
        sim.pin(1, point);
        sim.step();
        sim.unpin(0);
        sim.unpin(1);
        sim.reheat(0.5);

        for _ in 0..50 {
            sim.step();
        }
        for node in sim.nodes() {
            assert!(node.pos.is_finite());
            assert!(node.vel.is_finite());
        }
        assert!((sim.nodes()[0].pos - sim.nodes()[1].pos).length() > 1.0);
    }

    #[test]
    fn center_pull_moves_layout_toward_new_center() {
        let mut sim = sim(&["A", "B", "C"]);
        let target = vec2(2000.0, 900.0);
        sim.set_center(target);
        sim.set_alpha(1.0);

        let centroid = |sim: &ForceSimulation| {
            sim.nodes()
                .iter()
                .fold(Vec2::ZERO, |sum, node| sum + node.pos)
                / sim.nodes().len() as f32
        };

        let before = (centroid(&sim) - target).length();
        for _ in 0..300 {
            sim.step();
        }
        let after = (centroid(&sim) - target).length();
        assert!(after < before * 0.5, "before {before}, after {after}");
    }

    #[test]
    fn empty_graph_steps_without_panic() {
        let mut sim = ForceSimulation::new(
            &PathGraph::default(),
            vec2(0.0, 0.0),
            ForceConfig::default(),
        );
        for _ in 0..10 {
            sim.step();
        }
        assert!(sim.alpha() < 1.0);
    }

    #[test]
    fn duplicate_edges_are_kept_as_independent_constraints() {
        let graph = build_graph(&[
            vec![
                PageNode { title: "A".into() },
                PageNode { title: "B".into() },
            ],
            vec![
                PageNode { title: "A".into() },
                PageNode { title: "B".into() },
            ],
        ]);
        let sim = ForceSimulation::new(&graph, Vec2::ZERO, ForceConfig::default());
        assert_eq!(sim.edges().len(), 2);
        assert_eq!(sim.edges()[0], sim.edges()[1]);
    }

    #[test]
    fn nodes_follow_graph_order() {
        let sim = sim(&["A", "B", "C"]);
        let ids = sim.nodes().iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(sim.nodes()[2].degree, 2);
    }
}
