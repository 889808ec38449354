use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::error::{FetchError, LoadError};
use super::graph::LineageGraph;
use super::parse::parse_dataset;

/// Reads the dataset at `path`, decodes it and builds the graph. Nothing partial is returned.
pub fn load_dataset(path: &Path) -> Result<LineageGraph, LoadError> {
    info!(path = %path.display(), "loading lineage dataset");

    let raw = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&raw).map_err(|source| FetchError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_dataset(&document)?;

    info!(
        nodes = graph.node_count(),
        links = graph.link_count(),
        categories = graph.categories.len(),
        link_types = graph.link_types.len(),
        "lineage dataset loaded"
    );
    Ok(graph)
}
