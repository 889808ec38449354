use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::lineage::{LineageGraph, ModelNode, NodeIndex};

use super::VisibleSubgraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub index: NodeIndex,
    pub score: i64,
}

/// Case-insensitive substring match over the descriptive text of a model.
///
/// An empty (or all-whitespace) query matches nothing: callers treat it as "no search".
pub fn matches_search(node: &ModelNode, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }

    let contains = |text: &str| text.to_lowercase().contains(&query);
    contains(&node.name)
        || contains(&node.full_name)
        || contains(&node.description)
        || node.tags.iter().any(|tag| contains(tag))
        || node.key_contributions.iter().any(|item| contains(item))
}

/// Visible models matching `query`, best name matches first.
///
/// Only nodes of `visible` are considered, so a search never surfaces a filtered-out model.
pub fn ranked_search_hits(
    graph: &LineageGraph,
    visible: &VisibleSubgraph,
    query: &str,
    limit: usize,
) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits = visible
        .nodes
        .iter()
        .filter_map(|&index| {
            let node = graph.node(index)?;
            if !matches_search(node, query) {
                return None;
            }
            let score = [node.name.as_str(), node.full_name.as_str()]
                .into_iter()
                .filter_map(|text| matcher.fuzzy_match(text, query))
                .max()
                .unwrap_or(0);
            Some(SearchHit { index, score })
        })
        .collect::<Vec<_>>();

    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::{matches_search, ranked_search_hits};
    use crate::filter::{FilterState, compute_visible};
    use crate::lineage::fixtures::{node, three_model_chain};

    #[test]
    fn matches_every_descriptive_field_ignoring_case() {
        let mut model = node("ddpm", "diffusion", 2020);
        model.description = "Iterative Denoising of Gaussian noise".to_owned();
        model.tags = vec!["score-based".to_owned()];
        model.key_contributions = vec!["Simplified training objective".to_owned()];

        assert!(matches_search(&model, "DDPM"));
        assert!(matches_search(&model, "ddpm model"));
        assert!(matches_search(&model, "denoising"));
        assert!(matches_search(&model, "SCORE"));
        assert!(matches_search(&model, " objective "));
        assert!(!matches_search(&model, "adversarial"));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let model = node("gan", "adversarial", 2014);

        assert!(!matches_search(&model, ""));
        assert!(!matches_search(&model, "   "));
    }

    #[test]
    fn ranked_hits_only_cover_visible_models() {
        let graph = three_model_chain();
        let mut filter = FilterState::for_graph(&graph);
        filter.toggle_category("B", false);
        let visible = compute_visible(&graph, &filter);

        let hits = ranked_search_hits(&graph, &visible, "model", 10);
        let indices = hits.iter().map(|hit| hit.index).collect::<Vec<_>>();
        assert_eq!(indices.len(), 2);
        assert!(!indices.contains(&2));

        assert!(ranked_search_hits(&graph, &visible, "", 10).is_empty());
    }

    #[test]
    fn ranked_hits_prefer_closer_name_matches() {
        let graph = three_model_chain();
        let visible = compute_visible(&graph, &FilterState::for_graph(&graph));

        let hits = ranked_search_hits(&graph, &visible, "flow", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
    }
}
