mod diff;
mod highlight;
mod theme;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::filter::VisibleSubgraph;
use crate::lineage::{LineageGraph, LinkIndex, NodeIndex};

pub use diff::{FadeSet, KeyDiff};
pub use highlight::{HoverHighlight, LinkEmphasis, NodeEmphasis, SearchEmphasis};
pub use theme::Palette;

pub const FADE_SECONDS: f32 = 0.3;
const HOVER_FADED: f32 = 0.2;

/// What changed on screen for one applied visible subgraph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneDiff {
    pub nodes: KeyDiff<String>,
    pub links: KeyDiff<String>,
    /// Arrow markers, one per visible link type.
    pub markers: KeyDiff<String>,
}

impl SceneDiff {
    pub fn is_unchanged(&self) -> bool {
        self.nodes.is_unchanged() && self.links.is_unchanged() && self.markers.is_unchanged()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub opacity: f32,
    pub emphasis: NodeEmphasis,
    pub search_match: bool,
    pub selected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
    pub opacity: f32,
    pub emphasis: LinkEmphasis,
    pub marker_opacity: f32,
}

/// Presentation state of the graph independent of how it is drawn: keyed fades for
/// nodes, links and markers, selection, hover neighbourhood, search emphasis and theme.
pub struct Scene {
    nodes: FadeSet<String>,
    links: FadeSet<String>,
    markers: FadeSet<String>,
    link_keys: Vec<String>,
    link_by_key: HashMap<String, LinkIndex>,
    visible: VisibleSubgraph,
    selected: Option<NodeIndex>,
    hover: Option<HoverHighlight>,
    search: SearchEmphasis,
    palette: Palette,
}

impl Scene {
    pub fn new(graph: &LineageGraph, is_light: bool) -> Self {
        let mut link_keys = Vec::with_capacity(graph.link_count());
        let mut used = HashSet::new();
        for (index, link) in graph.links.iter().enumerate() {
            let mut key = graph.link_key(link);
            if used.contains(&key) {
                key = format!("{key}:{}", link.link_type);
            }
            if used.contains(&key) {
                key = format!("{key}#{index}");
            }
            used.insert(key.clone());
            link_keys.push(key);
        }
        let link_by_key = link_keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key.clone(), index))
            .collect();

        Self {
            nodes: FadeSet::new(FADE_SECONDS),
            links: FadeSet::new(FADE_SECONDS),
            markers: FadeSet::new(FADE_SECONDS),
            link_keys,
            link_by_key,
            visible: VisibleSubgraph::default(),
            selected: None,
            hover: None,
            search: SearchEmphasis::default(),
            palette: Palette::for_theme(is_light),
        }
    }

    /// Diffs the new visible subgraph against what is on screen by stable key.
    ///
    /// Applying the same subgraph twice is a no-op. Hover and search emphasis are recomputed
    /// over the new subgraph; the selection is kept.
    pub fn apply(&mut self, graph: &LineageGraph, visible: &VisibleSubgraph) -> SceneDiff {
        let node_keys = visible
            .nodes
            .iter()
            .filter_map(|&index| graph.node(index).map(|node| node.id.clone()))
            .collect::<Vec<_>>();
        let link_keys = visible
            .links
            .iter()
            .filter_map(|&index| self.link_keys.get(index).cloned())
            .collect::<Vec<_>>();
        let mut marker_keys = Vec::new();
        for &index in &visible.links {
            if let Some(link) = graph.link(index)
                && !marker_keys.contains(&link.link_type)
            {
                marker_keys.push(link.link_type.clone());
            }
        }

        let scene_diff = SceneDiff {
            nodes: self.nodes.apply(&node_keys),
            links: self.links.apply(&link_keys),
            markers: self.markers.apply(&marker_keys),
        };

        visible.clone_into(&mut self.visible);
        self.hover = self
            .hover
            .as_ref()
            .and_then(|hover| HoverHighlight::around(graph, visible, hover.focus()));
        let query = self.search.query().to_owned();
        self.search = SearchEmphasis::compute(graph, visible, &query);

        debug!(
            entering = scene_diff.nodes.entering.len(),
            exiting = scene_diff.nodes.exiting.len(),
            links = link_keys.len(),
            "scene updated"
        );
        scene_diff
    }

    /// Advances fades; returns whether anything is still animating.
    pub fn advance(&mut self, dt_seconds: f32) -> bool {
        let nodes = self.nodes.advance(dt_seconds);
        let links = self.links.advance(dt_seconds);
        let markers = self.markers.advance(dt_seconds);
        nodes || links || markers
    }

    /// Nodes to draw, exiting ones included, with their fade opacity.
    pub fn drawn_nodes<'a>(
        &'a self,
        graph: &'a LineageGraph,
    ) -> impl Iterator<Item = (NodeIndex, f32)> + 'a {
        self.nodes
            .iter()
            .filter_map(|(key, opacity)| graph.index_of(key).map(|index| (index, opacity)))
    }

    /// Links to draw, exiting ones included, with their fade opacity.
    pub fn drawn_links(&self) -> impl Iterator<Item = (LinkIndex, f32)> + '_ {
        self.links
            .iter()
            .filter_map(|(key, opacity)| self.link_by_key.get(key).map(|index| (*index, opacity)))
    }

    /// Exclusive selection of a visible node. Returns `false` (and changes nothing) otherwise.
    pub fn select_node(&mut self, index: NodeIndex) -> bool {
        if !self.visible.nodes.contains(&index) {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn deselect_node(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<NodeIndex> {
        self.selected
    }

    /// Fades everything outside the hovered node's visible neighbourhood.
    pub fn highlight_connections(&mut self, graph: &LineageGraph, index: NodeIndex) {
        self.hover = HoverHighlight::around(graph, &self.visible, index);
    }

    pub fn unhighlight_connections(&mut self) {
        self.hover = None;
    }

    pub fn hovered(&self) -> Option<NodeIndex> {
        self.hover.as_ref().map(HoverHighlight::focus)
    }

    pub fn search(&mut self, graph: &LineageGraph, query: &str) {
        self.search = SearchEmphasis::compute(graph, &self.visible, query);
    }

    pub fn search_state(&self) -> &SearchEmphasis {
        &self.search
    }

    pub fn update_theme(&mut self, is_light: bool) {
        if self.palette.is_light != is_light {
            info!(light = is_light, "theme changed");
        }
        self.palette = Palette::for_theme(is_light);
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn node_style(&self, graph: &LineageGraph, index: NodeIndex) -> NodeStyle {
        let fade = graph
            .node(index)
            .and_then(|node| self.nodes.opacity(&node.id))
            .unwrap_or(0.0);
        let emphasis = self
            .hover
            .as_ref()
            .map_or(NodeEmphasis::Normal, |hover| hover.node(index));
        let hover_factor = match emphasis {
            NodeEmphasis::Normal => 1.0,
            NodeEmphasis::Faded => HOVER_FADED,
        };

        NodeStyle {
            opacity: fade * self.search.node_opacity(index) * hover_factor,
            emphasis,
            search_match: self.search.matches(index),
            selected: self.selected == Some(index),
        }
    }

    pub fn link_style(&self, graph: &LineageGraph, index: LinkIndex) -> LinkStyle {
        let Some(link) = graph.link(index) else {
            return LinkStyle {
                opacity: 0.0,
                emphasis: LinkEmphasis::Normal,
                marker_opacity: 0.0,
            };
        };

        let fade = self
            .link_keys
            .get(index)
            .and_then(|key| self.links.opacity(key))
            .unwrap_or(0.0);
        let level = self.search.link_opacity(link);
        let emphasis = self
            .hover
            .as_ref()
            .map_or(LinkEmphasis::Normal, |hover| hover.link(index));
        let level = match emphasis {
            LinkEmphasis::Normal => level,
            LinkEmphasis::Highlighted => (level * 2.0).min(1.0),
            LinkEmphasis::Faded => level * HOVER_FADED,
        };

        LinkStyle {
            opacity: fade * level,
            emphasis,
            marker_opacity: self.markers.opacity(&link.link_type).unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LinkEmphasis, NodeEmphasis, Scene};
    use crate::filter::{FilterState, VisibleSubgraph, compute_visible};
    use crate::lineage::LineageGraph;
    use crate::lineage::fixtures::three_model_chain;

    fn settled_scene(graph: &LineageGraph) -> (Scene, VisibleSubgraph) {
        let visible = compute_visible(graph, &FilterState::for_graph(graph));
        let mut scene = Scene::new(graph, false);
        scene.apply(graph, &visible);
        scene.advance(1.0);
        (scene, visible)
    }

    fn all_opacities(scene: &Scene, graph: &LineageGraph) -> Vec<f32> {
        (0..graph.node_count())
            .map(|index| scene.node_style(graph, index).opacity)
            .chain((0..graph.link_count()).map(|index| scene.link_style(graph, index).opacity))
            .collect()
    }

    #[test]
    fn reapplying_the_same_subgraph_is_a_no_op() {
        let graph = three_model_chain();
        let (mut scene, visible) = settled_scene(&graph);
        let before = all_opacities(&scene, &graph);

        let second = scene.apply(&graph, &visible);
        assert!(second.is_unchanged());
        assert_eq!(second.nodes.persisting.len(), 3);
        assert!(!scene.advance(0.016));
        assert_eq!(all_opacities(&scene, &graph), before);
    }

    #[test]
    fn filtered_out_elements_fade_then_disappear() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);

        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_category("B", false);
        let changes = scene.apply(&graph, &compute_visible(&graph, &filter));
        assert_eq!(changes.nodes.exiting, vec!["diffusion".to_owned()]);
        assert_eq!(changes.links.exiting, vec!["flow-diffusion".to_owned()]);
        assert!(changes.markers.is_unchanged());

        assert_eq!(scene.drawn_nodes(&graph).count(), 3);
        assert!(scene.advance(0.15));
        assert!(!scene.advance(0.15));
        assert_eq!(scene.drawn_nodes(&graph).count(), 2);
        assert_eq!(scene.drawn_links().collect::<Vec<_>>(), vec![(0, 1.0)]);
    }

    #[test]
    fn hiding_a_link_type_reports_link_and_marker_exits() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);

        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_link_type("influence", false);
        let hidden = scene.apply(&graph, &compute_visible(&graph, &filter));
        assert!(!hidden.is_unchanged());
        assert!(hidden.nodes.is_unchanged());
        assert_eq!(hidden.nodes.persisting.len(), 3);
        assert_eq!(
            hidden.links.exiting,
            vec!["flow-diffusion".to_owned(), "vae-flow".to_owned()]
        );
        assert_eq!(hidden.markers.exiting, vec!["influence".to_owned()]);

        filter.reset_link_types(&graph);
        let shown = scene.apply(&graph, &compute_visible(&graph, &filter));
        assert_eq!(shown.links.entering.len(), 2);
        assert_eq!(shown.markers.entering, vec!["influence".to_owned()]);
    }

    #[test]
    fn search_then_clear_restores_opacity() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);
        let before = all_opacities(&scene, &graph);

        scene.search(&graph, "flow");
        assert_ne!(all_opacities(&scene, &graph), before);
        assert!(scene.node_style(&graph, 1).search_match);

        scene.search(&graph, "");
        assert_eq!(all_opacities(&scene, &graph), before);
    }

    #[test]
    fn search_survives_filter_changes_without_reviving_hidden_nodes() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);
        scene.search(&graph, "diffusion");
        assert!(scene.search_state().matches(2));

        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_category("B", false);
        scene.apply(&graph, &compute_visible(&graph, &filter));
        assert_eq!(scene.search_state().query(), "diffusion");
        assert!(!scene.search_state().matches(2));
    }

    #[test]
    fn selection_is_exclusive_and_limited_to_visible_nodes() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);

        assert!(scene.select_node(0));
        assert!(scene.select_node(1));
        assert_eq!(scene.selected(), Some(1));
        assert!(scene.node_style(&graph, 1).selected);
        assert!(!scene.node_style(&graph, 0).selected);

        assert!(!scene.select_node(7));
        assert_eq!(scene.selected(), Some(1));

        scene.deselect_node();
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn hover_fades_everything_outside_the_neighbourhood() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);

        scene.highlight_connections(&graph, 0);
        assert_eq!(scene.hovered(), Some(0));
        assert_eq!(scene.node_style(&graph, 2).emphasis, NodeEmphasis::Faded);
        assert_eq!(scene.link_style(&graph, 0).emphasis, LinkEmphasis::Highlighted);
        assert_eq!(scene.link_style(&graph, 0).opacity, 1.0);

        scene.unhighlight_connections();
        assert_eq!(scene.node_style(&graph, 2).emphasis, NodeEmphasis::Normal);
        assert_eq!(scene.link_style(&graph, 0).opacity, 0.5);
    }

    #[test]
    fn interactions_on_an_empty_scene_are_no_ops() {
        let graph = three_model_chain();
        let mut scene = Scene::new(&graph, true);
        scene.apply(&graph, &VisibleSubgraph::default());

        scene.highlight_connections(&graph, 0);
        assert_eq!(scene.hovered(), None);
        scene.search(&graph, "vae");
        assert_eq!(scene.search_state().match_count(), 0);
        assert!(!scene.select_node(0));
        assert_eq!(scene.drawn_nodes(&graph).count(), 0);
    }

    #[test]
    fn duplicate_endpoint_pairs_get_distinct_keys() {
        let mut graph = three_model_chain();
        let mut extra = graph.links[0].clone();
        extra.link_type = "refines".to_owned();
        graph.links.push(extra);
        let graph = LineageGraph::from_parts(
            graph.nodes.clone(),
            graph.links.clone(),
            graph.categories.clone(),
            graph.link_types.clone(),
        );

        let scene = Scene::new(&graph, false);
        assert_eq!(scene.link_keys[0], "vae-flow");
        assert_eq!(scene.link_keys[2], "vae-flow:refines");
    }

    #[test]
    fn theme_switch_only_swaps_palette() {
        let graph = three_model_chain();
        let (mut scene, _) = settled_scene(&graph);
        let before = all_opacities(&scene, &graph);

        scene.update_theme(true);
        assert!(scene.palette().is_light);
        assert_eq!(all_opacities(&scene, &graph), before);
    }
}
