use std::collections::BTreeSet;

use crate::filter::{VisibleSubgraph, matches_search};
use crate::lineage::{InfluenceLink, LineageGraph, LinkIndex, NodeIndex};

const SEARCH_MISS_NODE: f32 = 0.2;
const LINK_IDLE: f32 = 0.5;
const LINK_BOTH_MATCH: f32 = 0.8;
const LINK_ONE_MATCH: f32 = 0.4;
const LINK_NO_MATCH: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEmphasis {
    Normal,
    Faded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEmphasis {
    Normal,
    Highlighted,
    Faded,
}

/// Direct neighbourhood of a hovered node, computed over visible links only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverHighlight {
    focus: NodeIndex,
    neighbours: BTreeSet<NodeIndex>,
    links: BTreeSet<LinkIndex>,
}

impl HoverHighlight {
    /// `None` when `focus` is not part of the visible subgraph.
    pub fn around(
        graph: &LineageGraph,
        visible: &VisibleSubgraph,
        focus: NodeIndex,
    ) -> Option<Self> {
        if !visible.nodes.contains(&focus) {
            return None;
        }

        let mut neighbours = BTreeSet::new();
        let mut links = BTreeSet::new();
        let touching = graph.outgoing(focus).iter().chain(graph.incoming(focus));
        for &link_index in touching {
            // visible.links is kept in load order
            if visible.links.binary_search(&link_index).is_err() {
                continue;
            }
            let Some(link) = graph.link(link_index) else {
                continue;
            };
            neighbours.insert(if link.source == focus {
                link.target
            } else {
                link.source
            });
            links.insert(link_index);
        }
        neighbours.remove(&focus);

        Some(Self {
            focus,
            neighbours,
            links,
        })
    }

    pub fn focus(&self) -> NodeIndex {
        self.focus
    }

    pub fn node(&self, index: NodeIndex) -> NodeEmphasis {
        if index == self.focus || self.neighbours.contains(&index) {
            NodeEmphasis::Normal
        } else {
            NodeEmphasis::Faded
        }
    }

    pub fn link(&self, index: LinkIndex) -> LinkEmphasis {
        if self.links.contains(&index) {
            LinkEmphasis::Highlighted
        } else {
            LinkEmphasis::Faded
        }
    }
}

/// Visible nodes matching the current search query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchEmphasis {
    query: String,
    matches: BTreeSet<NodeIndex>,
}

impl SearchEmphasis {
    pub fn compute(graph: &LineageGraph, visible: &VisibleSubgraph, query: &str) -> Self {
        let query = query.trim().to_owned();
        let matches = visible
            .nodes
            .iter()
            .copied()
            .filter(|&index| {
                graph
                    .node(index)
                    .is_some_and(|node| matches_search(node, &query))
            })
            .collect();
        Self { query, matches }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// An empty query is "no search", which is not the same as a query with zero matches.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn matches(&self, index: NodeIndex) -> bool {
        self.matches.contains(&index)
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn node_opacity(&self, index: NodeIndex) -> f32 {
        if !self.is_active() || self.matches(index) {
            1.0
        } else {
            SEARCH_MISS_NODE
        }
    }

    /// Link opacity from how many of its endpoints match.
    pub fn link_opacity(&self, link: &InfluenceLink) -> f32 {
        if !self.is_active() {
            return LINK_IDLE;
        }
        match (self.matches(link.source), self.matches(link.target)) {
            (true, true) => LINK_BOTH_MATCH,
            (true, false) | (false, true) => LINK_ONE_MATCH,
            (false, false) => LINK_NO_MATCH,
        }
    }
}
