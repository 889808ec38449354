mod forces;
mod quadtree;

use eframe::egui::{Pos2, Vec2, vec2};
use tracing::debug;

use crate::filter::VisibleSubgraph;
use crate::lineage::{LineageGraph, NodeIndex};
use crate::util::stable_pair;
use forces::{ManyBody, accumulate_repulsion, collect_overlaps, separation_direction};
use quadtree::QuadCell;

/// Alpha below which the layout counts as settling rather than running.
const SETTLING_ALPHA: f32 = 0.1;
const INITIAL_RADIUS: f32 = 10.0;

/// Tuning for [`ForceLayout`]. World coordinates are centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub link_distance: f32,
    pub link_strength: f32,
    /// Negative values repel.
    pub many_body_strength: f32,
    pub many_body_softening: f32,
    pub theta: f32,
    /// Added to each node's size, so two nodes rest at least `sizeA + sizeB + 2 * padding` apart.
    pub collision_padding: f32,
    pub collision_iterations: usize,
    pub center_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub drag_alpha_target: f32,
    pub max_speed: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            link_distance: 200.0,
            link_strength: 0.8,
            many_body_strength: -1200.0,
            many_body_softening: 25.0,
            theta: 0.9,
            collision_padding: 15.0,
            collision_iterations: 8,
            center_strength: 0.02,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
            max_speed: 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationPhase {
    /// No node set has been supplied yet.
    Idle,
    Running,
    Settling,
    /// Ticks are no-ops until the node set changes or a drag starts.
    AtRest,
}

#[derive(Clone, Copy, Debug, Default)]
struct Body {
    position: Vec2,
    velocity: Vec2,
    pin: Option<Vec2>,
    placed: bool,
}

/// Alpha-driven force simulation over the visible part of a [`LineageGraph`].
///
/// Bodies live in an arena indexed by [`NodeIndex`]; nodes that get filtered out keep their
/// last position so they fade out in place and come back where they left.
pub struct ForceLayout {
    config: LayoutConfig,
    bodies: Vec<Body>,
    active: Vec<NodeIndex>,
    slot_of: Vec<Option<usize>>,
    sizes: Vec<f32>,
    radii: Vec<f32>,
    degree: Vec<f32>,
    links: Vec<(usize, usize)>,
    alpha: f32,
    alpha_target: f32,
    phase: SimulationPhase,
    dragged: Option<NodeIndex>,
    ticks: u64,
    scratch: Scratch,
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pinned: Vec<bool>,
    overlaps: Vec<(usize, usize)>,
}

impl ForceLayout {
    pub fn new(graph: &LineageGraph, config: LayoutConfig) -> Self {
        Self {
            config,
            bodies: vec![Body::default(); graph.node_count()],
            active: Vec::new(),
            slot_of: vec![None; graph.node_count()],
            sizes: Vec::new(),
            radii: Vec::new(),
            degree: Vec::new(),
            links: Vec::new(),
            alpha: 0.0,
            alpha_target: 0.0,
            phase: SimulationPhase::Idle,
            dragged: None,
            ticks: 0,
            scratch: Scratch::default(),
        }
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn active_nodes(&self) -> &[NodeIndex] {
        &self.active
    }

    pub fn dragged(&self) -> Option<NodeIndex> {
        self.dragged
    }

    /// Last simulated position of a node, including nodes that are currently filtered out.
    pub fn position(&self, index: NodeIndex) -> Option<Pos2> {
        self.bodies
            .get(index)
            .filter(|body| body.placed)
            .map(|body| body.position.to_pos2())
    }

    #[cfg(test)]
    pub fn is_pinned(&self, index: NodeIndex) -> bool {
        self.bodies
            .get(index)
            .is_some_and(|body| body.pin.is_some())
    }

    /// Replaces the simulated node set and fully reheats the simulation.
    ///
    /// Nodes that were simulated before keep their position; new ones are placed next to an
    /// already placed neighbour, or on a phyllotaxis spiral around the origin.
    pub fn set_visible(&mut self, graph: &LineageGraph, visible: &VisibleSubgraph) {
        if self.bodies.len() != graph.node_count() {
            self.bodies.resize(graph.node_count(), Body::default());
            self.slot_of.resize(graph.node_count(), None);
        }

        self.slot_of.fill(None);
        self.active.clear();
        for &index in &visible.nodes {
            if index < self.bodies.len() && self.slot_of[index].is_none() {
                self.slot_of[index] = Some(self.active.len());
                self.active.push(index);
            }
        }

        for (index, body) in self.bodies.iter_mut().enumerate() {
            if self.slot_of[index].is_none() {
                body.pin = None;
                body.velocity = Vec2::ZERO;
            }
        }
        if self
            .dragged
            .is_some_and(|index| self.slot_of[index].is_none())
        {
            self.dragged = None;
            self.alpha_target = 0.0;
        }

        self.sizes.clear();
        self.radii.clear();
        for &index in &self.active {
            let size = graph
                .node(index)
                .map(|node| node.size)
                .filter(|size| size.is_finite())
                .unwrap_or(0.0)
                .max(0.0);
            self.sizes.push(size);
            self.radii.push(size + self.config.collision_padding);
        }

        self.links.clear();
        self.degree.clear();
        self.degree.resize(self.active.len(), 0.0);
        for &link_index in &visible.links {
            let Some(link) = graph.link(link_index) else {
                continue;
            };
            let (Some(source), Some(target)) = (
                self.slot_of.get(link.source).copied().flatten(),
                self.slot_of.get(link.target).copied().flatten(),
            ) else {
                continue;
            };
            if source == target {
                continue;
            }
            self.links.push((source, target));
            self.degree[source] += 1.0;
            self.degree[target] += 1.0;
        }

        self.place_new_bodies(graph);

        self.alpha = 1.0;
        self.ticks = 0;
        self.phase = if self.active.is_empty() {
            SimulationPhase::AtRest
        } else {
            SimulationPhase::Running
        };
        debug!(
            nodes = self.active.len(),
            links = self.links.len(),
            "layout reheated for new node set"
        );
    }

    fn place_new_bodies(&mut self, graph: &LineageGraph) {
        let previously_placed = self
            .bodies
            .iter()
            .map(|body| body.placed)
            .collect::<Vec<_>>();
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());

        for (slot, &index) in self.active.iter().enumerate() {
            if self.bodies[index].placed {
                continue;
            }

            let (jitter_x, jitter_y) = graph
                .node(index)
                .map(|node| stable_pair(&node.id))
                .unwrap_or((0.0, 0.0));
            let jitter = vec2(jitter_x, jitter_y);

            let anchor = self.links.iter().find_map(|&(source, target)| {
                let other = if source == slot {
                    target
                } else if target == slot {
                    source
                } else {
                    return None;
                };
                let other_index = self.active[other];
                previously_placed[other_index].then(|| self.bodies[other_index].position)
            });

            let position = match anchor {
                Some(anchor) => {
                    let offset = if jitter.length_sq() > 1e-6 {
                        jitter.normalized()
                    } else {
                        separation_direction(slot, slot + 1)
                    };
                    anchor + offset * (self.config.link_distance * 0.5)
                }
                None => {
                    let radius = INITIAL_RADIUS * (0.5 + slot as f32).sqrt();
                    let angle = slot as f32 * golden_angle;
                    vec2(angle.cos(), angle.sin()) * radius + jitter * 2.0
                }
            };

            let body = &mut self.bodies[index];
            body.position = position;
            body.velocity = Vec2::ZERO;
            body.placed = true;
        }
    }

    /// Pins a visible node under the pointer and keeps the simulation warm while dragging.
    pub fn begin_drag(&mut self, index: NodeIndex, point: Pos2) -> bool {
        if self.slot_of.get(index).copied().flatten().is_none() {
            return false;
        }

        if let Some(previous) = self.dragged.take() {
            self.bodies[previous].pin = None;
        }

        let body = &mut self.bodies[index];
        body.pin = Some(point.to_vec2());
        body.position = point.to_vec2();
        body.velocity = Vec2::ZERO;
        self.dragged = Some(index);
        self.alpha_target = self.config.drag_alpha_target;
        self.phase = SimulationPhase::Running;
        debug!(node = index, "drag started");
        true
    }

    pub fn drag_to(&mut self, point: Pos2) {
        if let Some(index) = self.dragged {
            self.bodies[index].pin = Some(point.to_vec2());
        }
    }

    /// Releases the pin and lets the simulation cool back down.
    pub fn end_drag(&mut self) {
        if let Some(index) = self.dragged.take() {
            self.bodies[index].pin = None;
            debug!(node = index, "drag released");
        }
        self.alpha_target = 0.0;
    }

    /// Topmost visible node whose circle contains `point`.
    pub fn node_at(&self, point: Pos2) -> Option<NodeIndex> {
        let point = point.to_vec2();
        self.active
            .iter()
            .enumerate()
            .rev()
            .find(|(slot, index)| {
                let radius = self.sizes[*slot];
                (self.bodies[**index].position - point).length_sq() <= radius * radius
            })
            .map(|(_, index)| *index)
    }

    /// Advances the simulation by one step. Returns `false` once the layout is at rest.
    pub fn tick(&mut self) -> bool {
        if matches!(self.phase, SimulationPhase::Idle | SimulationPhase::AtRest) {
            return false;
        }

        let config = self.config;
        self.alpha += (self.alpha_target - self.alpha) * config.alpha_decay;
        let alpha = self.alpha;

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.velocities.clear();
        scratch.pinned.clear();
        for &index in &self.active {
            let body = &self.bodies[index];
            scratch.positions.push(body.position);
            scratch.velocities.push(body.velocity);
            scratch.pinned.push(body.pin.is_some());
        }
        let positions = &mut scratch.positions;
        let velocities = &mut scratch.velocities;

        if let Some(root) = QuadCell::build(positions, &self.radii) {
            let params = ManyBody {
                strength: -config.many_body_strength * alpha,
                softening: config.many_body_softening,
                theta: config.theta,
            };
            for (slot, velocity) in velocities.iter_mut().enumerate() {
                let mut delta = Vec2::ZERO;
                accumulate_repulsion(&root, slot, positions, params, &mut delta);
                *velocity += delta;
            }
        }

        for &(source, target) in &self.links {
            let mut delta =
                (positions[target] + velocities[target]) - (positions[source] + velocities[source]);
            if delta.length_sq() < 1e-8 {
                delta = separation_direction(target, source) * 1e-3;
            }
            let distance = delta.length();
            let pull = delta
                * ((distance - config.link_distance) / distance * alpha * config.link_strength);
            let total = self.degree[source] + self.degree[target];
            let bias = if total > 0.0 {
                self.degree[source] / total
            } else {
                0.5
            };
            velocities[target] -= pull * bias;
            velocities[source] += pull * (1.0 - bias);
        }

        for (position, velocity) in positions.iter().zip(velocities.iter_mut()) {
            *velocity -= *position * (config.center_strength * alpha);
        }

        let keep = 1.0 - config.velocity_decay;
        let max_speed_sq = config.max_speed * config.max_speed;
        for (slot, &index) in self.active.iter().enumerate() {
            if let Some(pin) = self.bodies[index].pin {
                positions[slot] = pin;
                velocities[slot] = Vec2::ZERO;
                continue;
            }

            let mut velocity = velocities[slot] * keep;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= config.max_speed / speed_sq.sqrt();
            }
            velocities[slot] = velocity;
            positions[slot] += velocity;
        }

        // The centroid shift is skipped while a pin owns part of the frame.
        if !scratch.pinned.iter().any(|pinned| *pinned) && !positions.is_empty() {
            let total = positions.iter().fold(Vec2::ZERO, |sum, position| sum + *position);
            let centroid = total / positions.len() as f32;
            for position in positions.iter_mut() {
                *position -= centroid;
            }
        }

        project_collisions(
            positions,
            &self.radii,
            &scratch.pinned,
            config.collision_iterations,
            &mut scratch.overlaps,
        );

        for (slot, &index) in self.active.iter().enumerate() {
            let body = &mut self.bodies[index];
            body.position = positions[slot];
            body.velocity = velocities[slot];
        }

        self.ticks += 1;
        let previous = self.phase;
        self.phase = if alpha < config.alpha_min && self.alpha_target < config.alpha_min {
            SimulationPhase::AtRest
        } else if alpha < SETTLING_ALPHA && self.alpha_target <= alpha {
            // Only while cooling; heating toward a drag target stays Running.
            SimulationPhase::Settling
        } else {
            SimulationPhase::Running
        };

        if self.phase == SimulationPhase::AtRest && previous != SimulationPhase::AtRest {
            for &index in &self.active {
                self.bodies[index].velocity = Vec2::ZERO;
            }
            debug!(ticks = self.ticks, "layout at rest");
        }
        true
    }
}

/// Pushes overlapping circles apart in place. Pinned slots never move; otherwise the larger
/// circle moves less.
fn project_collisions(
    positions: &mut [Vec2],
    radii: &[f32],
    pinned: &[bool],
    iterations: usize,
    overlaps: &mut Vec<(usize, usize)>,
) {
    for _ in 0..iterations {
        let Some(root) = QuadCell::build(positions, radii) else {
            return;
        };
        overlaps.clear();
        collect_overlaps(&root, &root, true, positions, radii, overlaps);
        if overlaps.is_empty() {
            return;
        }

        for &(a, b) in overlaps.iter() {
            let (share_a, share_b) = match (pinned[a], pinned[b]) {
                (true, true) => continue,
                (true, false) => (0.0, 1.0),
                (false, true) => (1.0, 0.0),
                (false, false) => {
                    let weight_a = radii[a] * radii[a];
                    let weight_b = radii[b] * radii[b];
                    let total = (weight_a + weight_b).max(1e-6);
                    (weight_b / total, weight_a / total)
                }
            };

            let delta = positions[a] - positions[b];
            let distance = delta.length();
            let min_distance = radii[a] + radii[b];
            if distance >= min_distance {
                continue;
            }
            let direction = if distance > 1e-4 {
                delta / distance
            } else {
                separation_direction(a, b)
            };
            let push = direction * (min_distance - distance);
            positions[a] += push * share_a;
            positions[b] -= push * share_b;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use eframe::egui::pos2;
    use proptest::prelude::*;

    use super::{ForceLayout, LayoutConfig, SimulationPhase};
    use crate::filter::{FilterState, VisibleSubgraph, compute_visible};
    use crate::lineage::fixtures::{node, three_model_chain};
    use crate::lineage::{InfluenceLink, LineageGraph};

    fn run_to_rest(layout: &mut ForceLayout) -> usize {
        let mut ticks = 0;
        while layout.tick() {
            ticks += 1;
            assert!(ticks < 5_000, "layout never came to rest");
        }
        ticks
    }

    fn everything(graph: &LineageGraph) -> VisibleSubgraph {
        compute_visible(graph, &FilterState::for_graph(graph))
    }

    fn isolated(count: usize) -> LineageGraph {
        let nodes = (0..count)
            .map(|index| node(&format!("m{index}"), "A", 2020))
            .collect();
        LineageGraph::from_parts(nodes, Vec::new(), BTreeMap::new(), BTreeMap::new())
    }

    #[test]
    fn phases_follow_alpha() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        assert_eq!(layout.phase(), SimulationPhase::Idle);
        assert!(!layout.tick());

        layout.set_visible(&graph, &everything(&graph));
        assert_eq!(layout.phase(), SimulationPhase::Running);
        assert_eq!(layout.alpha(), 1.0);

        let mut saw_settling = false;
        while layout.tick() {
            saw_settling |= layout.phase() == SimulationPhase::Settling;
        }
        assert!(saw_settling);
        assert_eq!(layout.phase(), SimulationPhase::AtRest);
        assert!(layout.alpha() < LayoutConfig::default().alpha_min);
        assert!(!layout.tick());
    }

    #[test]
    fn default_decay_rests_after_about_three_hundred_ticks() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));

        let ticks = run_to_rest(&mut layout);
        assert!((290..=310).contains(&ticks), "took {ticks} ticks");
    }

    #[test]
    fn dragged_node_follows_pin_and_reheats() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        run_to_rest(&mut layout);

        assert!(layout.begin_drag(1, pos2(400.0, -250.0)));
        assert!(layout.is_pinned(1));
        assert_eq!(layout.phase(), SimulationPhase::Running);

        for _ in 0..20 {
            assert!(layout.tick());
            assert_eq!(layout.phase(), SimulationPhase::Running);
        }
        layout.drag_to(pos2(420.0, -260.0));
        layout.tick();
        assert_eq!(layout.position(1), Some(pos2(420.0, -260.0)));
        assert!(layout.alpha() > 0.05);

        layout.end_drag();
        assert!(!layout.is_pinned(1));
        assert_eq!(layout.dragged(), None);
        run_to_rest(&mut layout);
        assert_eq!(layout.phase(), SimulationPhase::AtRest);
    }

    #[test]
    fn drag_start_runs_until_release_then_cools_through_settling() {
        let graph = isolated(4);
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        run_to_rest(&mut layout);

        assert!(layout.begin_drag(0, pos2(120.0, 80.0)));
        assert_eq!(layout.phase(), SimulationPhase::Running);
        for _ in 0..8 {
            assert!(layout.tick());
            assert_eq!(layout.phase(), SimulationPhase::Running);
            assert!(layout.alpha() < 0.1);
        }

        layout.end_drag();
        assert!(layout.tick());
        assert_eq!(layout.phase(), SimulationPhase::Settling);
        run_to_rest(&mut layout);
        assert_eq!(layout.phase(), SimulationPhase::AtRest);
    }

    #[test]
    fn drag_on_hidden_node_is_ignored() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_category("B", false);
        layout.set_visible(&graph, &compute_visible(&graph, &filter));

        assert!(!layout.begin_drag(2, pos2(0.0, 0.0)));
        assert!(!layout.begin_drag(99, pos2(0.0, 0.0)));
        assert_eq!(layout.dragged(), None);
    }

    #[test]
    fn hiding_the_dragged_node_releases_its_pin() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        assert!(layout.begin_drag(2, pos2(50.0, 50.0)));

        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_category("B", false);
        layout.set_visible(&graph, &compute_visible(&graph, &filter));

        assert!(!layout.is_pinned(2));
        assert_eq!(layout.dragged(), None);
        run_to_rest(&mut layout);
    }

    #[test]
    fn isolated_nodes_gather_around_the_center() {
        let graph = isolated(5);
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        run_to_rest(&mut layout);

        let positions = (0..5)
            .map(|index| layout.position(index).expect("placed").to_vec2())
            .collect::<Vec<_>>();
        let centroid = positions.iter().fold(eframe::egui::Vec2::ZERO, |sum, p| sum + *p) / 5.0;
        assert!(centroid.length() < 1.0);
        assert!(positions.iter().all(|position| position.length() < 800.0));
    }

    #[test]
    fn released_node_drifts_back_toward_the_center() {
        let graph = isolated(3);
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        run_to_rest(&mut layout);

        assert!(layout.begin_drag(0, pos2(2_000.0, 0.0)));
        layout.tick();
        layout.end_drag();
        run_to_rest(&mut layout);

        let distance = layout.position(0).expect("placed").to_vec2().length();
        assert!(distance < 1_500.0, "node stayed {distance} away");
    }

    #[test]
    fn filtering_keeps_positions_of_surviving_and_hidden_nodes() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        run_to_rest(&mut layout);
        let before = (0..3).map(|index| layout.position(index)).collect::<Vec<_>>();

        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_category("B", false);
        layout.set_visible(&graph, &compute_visible(&graph, &filter));

        assert_eq!(layout.active_nodes(), &[0, 1]);
        assert_eq!(layout.phase(), SimulationPhase::Running);
        assert_eq!(layout.alpha(), 1.0);
        for (index, position) in before.iter().enumerate() {
            assert_eq!(layout.position(index), *position);
        }

        run_to_rest(&mut layout);
        assert_eq!(layout.position(2), before[2]);

        filter.reset_categories(&graph);
        let hidden_position = layout.position(2);
        layout.set_visible(&graph, &compute_visible(&graph, &filter));
        assert_eq!(layout.position(2), hidden_position);
    }

    #[test]
    fn empty_node_set_is_immediately_at_rest() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &VisibleSubgraph::default());

        assert_eq!(layout.phase(), SimulationPhase::AtRest);
        assert!(!layout.tick());
        assert_eq!(layout.node_at(pos2(0.0, 0.0)), None);
    }

    #[test]
    fn node_at_uses_node_size() {
        let graph = three_model_chain();
        let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
        layout.set_visible(&graph, &everything(&graph));
        run_to_rest(&mut layout);

        let center = layout.position(1).expect("placed");
        assert_eq!(layout.node_at(center), Some(1));
        assert_eq!(layout.node_at(center + eframe::egui::vec2(19.0, 0.0)), Some(1));
        assert_eq!(layout.node_at(center + eframe::egui::vec2(5_000.0, 0.0)), None);
    }

    fn sized_graph() -> impl Strategy<Value = LineageGraph> {
        (1usize..10).prop_flat_map(|count| {
            (
                prop::collection::vec(5.0f32..40.0, count),
                prop::collection::vec((0..count, 0..count), 0..count * 2),
            )
                .prop_map(|(sizes, link_specs)| {
                    let nodes = sizes
                        .iter()
                        .enumerate()
                        .map(|(index, size)| {
                            let mut model = node(&format!("m{index}"), "A", 2020);
                            model.size = *size;
                            model
                        })
                        .collect();
                    let links = link_specs
                        .iter()
                        .map(|(source, target)| InfluenceLink {
                            source: *source,
                            target: *target,
                            link_type: "influence".to_owned(),
                        })
                        .collect();
                    LineageGraph::from_parts(nodes, links, BTreeMap::new(), BTreeMap::new())
                })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn nodes_never_overlap_at_rest(graph in sized_graph()) {
            let visible = VisibleSubgraph {
                nodes: (0..graph.node_count()).collect(),
                links: (0..graph.link_count()).collect(),
            };
            let mut layout = ForceLayout::new(&graph, LayoutConfig::default());
            layout.set_visible(&graph, &visible);
            run_to_rest(&mut layout);
            prop_assert_eq!(layout.phase(), SimulationPhase::AtRest);

            for a in 0..graph.node_count() {
                for b in (a + 1)..graph.node_count() {
                    let distance = (layout.position(a).expect("placed")
                        - layout.position(b).expect("placed"))
                    .length();
                    let required = graph.nodes[a].size + graph.nodes[b].size - 1.0;
                    prop_assert!(
                        distance >= required,
                        "nodes {} and {} are {} apart, need {}",
                        a,
                        b,
                        distance,
                        required
                    );
                }
            }
        }
    }
}
