mod search;

use std::collections::BTreeSet;

use crate::lineage::{LineageGraph, LinkIndex, ModelNode, NodeIndex};

pub use search::{SearchHit, matches_search, ranked_search_hits};

/// Combinable structural filters plus the free-text search query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    year_min: i32,
    year_max: i32,
    active_categories: BTreeSet<String>,
    active_link_types: BTreeSet<String>,
    search_query: String,
}

impl FilterState {
    /// Full year span of the dataset, every category and link type active, empty query.
    pub fn for_graph(graph: &LineageGraph) -> Self {
        let (year_min, year_max) = graph
            .year_range()
            .map(|range| (*range.start(), *range.end()))
            .unwrap_or((0, 0));

        Self {
            year_min,
            year_max,
            active_categories: graph.categories.keys().cloned().collect(),
            active_link_types: graph.link_types.keys().cloned().collect(),
            search_query: String::new(),
        }
    }

    pub fn year_min(&self) -> i32 {
        self.year_min
    }

    pub fn year_max(&self) -> i32 {
        self.year_max
    }

    /// Moves the lower bound; it is clamped so it never passes `year_max`.
    pub fn set_year_min(&mut self, year: i32) {
        self.year_min = year.min(self.year_max);
    }

    /// Moves the upper bound; it is clamped so it never drops below `year_min`.
    pub fn set_year_max(&mut self, year: i32) {
        self.year_max = year.max(self.year_min);
    }

    pub fn is_category_active(&self, key: &str) -> bool {
        self.active_categories.contains(key)
    }

    pub fn is_link_type_active(&self, key: &str) -> bool {
        self.active_link_types.contains(key)
    }

    pub fn toggle_category(&mut self, key: &str, active: bool) {
        if active {
            self.active_categories.insert(key.to_owned());
        } else {
            self.active_categories.remove(key);
        }
    }

    pub fn toggle_link_type(&mut self, key: &str, active: bool) {
        if active {
            self.active_link_types.insert(key.to_owned());
        } else {
            self.active_link_types.remove(key);
        }
    }

    pub fn reset_categories(&mut self, graph: &LineageGraph) {
        self.active_categories = graph.categories.keys().cloned().collect();
    }

    pub fn reset_link_types(&mut self, graph: &LineageGraph) {
        self.active_link_types = graph.link_types.keys().cloned().collect();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Stores the query trimmed; an empty string means no active search.
    pub fn set_search_query(&mut self, query: &str) {
        query.trim().clone_into(&mut self.search_query);
    }

    pub fn node_passes(&self, node: &ModelNode) -> bool {
        (self.year_min..=self.year_max).contains(&node.year)
            && self.active_categories.contains(&node.category)
    }
}

/// Induced subgraph that currently passes the structural filters, in load order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleSubgraph {
    pub nodes: Vec<NodeIndex>,
    pub links: Vec<LinkIndex>,
}

impl VisibleSubgraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn compute_visible(graph: &LineageGraph, filter: &FilterState) -> VisibleSubgraph {
    let mut passes = vec![false; graph.node_count()];
    let mut nodes = Vec::new();
    for (index, node) in graph.nodes.iter().enumerate() {
        if filter.node_passes(node) {
            passes[index] = true;
            nodes.push(index);
        }
    }

    let links = graph
        .links
        .iter()
        .enumerate()
        .filter(|(_, link)| {
            passes[link.source]
                && passes[link.target]
                && filter.active_link_types.contains(&link.link_type)
        })
        .map(|(index, _)| index)
        .collect();

    VisibleSubgraph { nodes, links }
}
