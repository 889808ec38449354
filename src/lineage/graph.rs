use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

/// Position of a node in [`LineageGraph::nodes`], assigned once at load time.
pub type NodeIndex = usize;
/// Position of a link in [`LineageGraph::links`].
pub type LinkIndex = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkType {
    pub key: String,
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paper {
    pub title: String,
    pub year: Option<i32>,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLink {
    pub language: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelNode {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub category: String,
    pub year: i32,
    pub size: f32,
    pub description: String,
    pub main_idea: String,
    pub tags: Vec<String>,
    pub key_contributions: Vec<String>,
    pub papers: Vec<Paper>,
    pub code: Vec<CodeLink>,
}

/// Directed influence edge with endpoints already resolved to node indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfluenceLink {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub link_type: String,
}

#[derive(Clone, Debug)]
pub struct LineageGraph {
    pub nodes: Vec<ModelNode>,
    pub links: Vec<InfluenceLink>,
    pub categories: BTreeMap<String, Category>,
    pub link_types: BTreeMap<String, LinkType>,
    index_by_id: HashMap<String, NodeIndex>,
    outgoing: Vec<Vec<LinkIndex>>,
    incoming: Vec<Vec<LinkIndex>>,
}

impl LineageGraph {
    /// Builds the graph from already validated parts. Link endpoints must be in range.
    pub(crate) fn from_parts(
        nodes: Vec<ModelNode>,
        links: Vec<InfluenceLink>,
        categories: BTreeMap<String, Category>,
        link_types: BTreeMap<String, LinkType>,
    ) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        for (link_index, link) in links.iter().enumerate() {
            outgoing[link.source].push(link_index);
            incoming[link.target].push(link_index);
        }

        Self {
            nodes,
            links,
            categories,
            link_types,
            index_by_id,
            outgoing,
            incoming,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&ModelNode> {
        self.nodes.get(index)
    }

    pub fn link(&self, index: LinkIndex) -> Option<&InfluenceLink> {
        self.links.get(index)
    }

    pub fn category_of(&self, node: &ModelNode) -> Option<&Category> {
        self.categories.get(&node.category)
    }

    pub fn link_type_of(&self, link: &InfluenceLink) -> Option<&LinkType> {
        self.link_types.get(&link.link_type)
    }

    pub fn outgoing(&self, index: NodeIndex) -> &[LinkIndex] {
        self.outgoing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, index: NodeIndex) -> &[LinkIndex] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Inclusive span of node years, `None` for an empty graph.
    pub fn year_range(&self) -> Option<RangeInclusive<i32>> {
        let min = self.nodes.iter().map(|node| node.year).min()?;
        let max = self.nodes.iter().map(|node| node.year).max()?;
        Some(min..=max)
    }

    /// Stable diff key for a link: `"<source id>-<target id>"`.
    pub fn link_key(&self, link: &InfluenceLink) -> String {
        format!("{}-{}", self.nodes[link.source].id, self.nodes[link.target].id)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::three_model_chain;

    #[test]
    fn adjacency_follows_link_direction() {
        let graph = three_model_chain();

        assert_eq!(graph.outgoing(0), &[0]);
        assert!(graph.incoming(0).is_empty());
        assert_eq!(graph.incoming(1), &[0]);
        assert_eq!(graph.outgoing(1), &[1]);
        assert!(graph.outgoing(42).is_empty());
    }

    #[test]
    fn index_lookup_and_link_key_use_ids() {
        let graph = three_model_chain();

        assert_eq!(graph.index_of("flow"), Some(1));
        assert_eq!(graph.index_of("gan"), None);
        assert_eq!(graph.link_key(&graph.links[1]), "flow-diffusion");
        assert_eq!(graph.year_range(), Some(2013..=2022));
    }
}
