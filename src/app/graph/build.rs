use tracing::{debug, info};

use crate::filter::{compute_visible, ranked_search_hits};
use crate::layout::SimulationPhase;
use crate::lineage::NodeIndex;

use super::super::ViewModel;

impl ViewModel {
    /// Recomputes the visible subgraph and hands it to the simulation and the scene.
    pub(in crate::app) fn refresh_visible(&mut self) {
        self.filter_dirty = false;
        let visible = compute_visible(&self.graph, &self.filter);
        if visible == self.visible && self.layout.phase() != SimulationPhase::Idle {
            return;
        }

        self.visible = visible;
        info!(
            nodes = self.visible.nodes.len(),
            links = self.visible.links.len(),
            year_min = self.filter.year_min(),
            year_max = self.filter.year_max(),
            "visible subgraph changed"
        );
        self.layout.set_visible(&self.graph, &self.visible);
        let changes = self.scene.apply(&self.graph, &self.visible);
        if changes.is_unchanged() {
            debug!("visible subgraph reapplied without enter or exit");
        } else {
            info!(
                nodes_entering = changes.nodes.entering.len(),
                nodes_exiting = changes.nodes.exiting.len(),
                nodes_persisting = changes.nodes.persisting.len(),
                links_entering = changes.links.entering.len(),
                links_exiting = changes.links.exiting.len(),
                markers_entering = changes.markers.entering.len(),
                markers_exiting = changes.markers.exiting.len(),
                "scene transitions started"
            );
        }
        self.refresh_search_hits();
    }

    /// Pushes the search box text through the filter state into the scene.
    pub(in crate::app) fn apply_search(&mut self) {
        self.filter.set_search_query(&self.search_input);
        self.scene.search(&self.graph, self.filter.search_query());
        self.refresh_search_hits();
    }

    fn refresh_search_hits(&mut self) {
        self.search_hits = ranked_search_hits(
            &self.graph,
            &self.visible,
            self.filter.search_query(),
            Self::SEARCH_RESULT_LIMIT,
        );
    }

    pub(in crate::app) fn select(&mut self, index: Option<NodeIndex>) {
        match index {
            Some(index) => {
                if self.scene.select_node(index)
                    && let Some(node) = self.graph.node(index)
                {
                    info!(id = %node.id, "model selected");
                }
            }
            None => self.scene.deselect_node(),
        }
    }
}
