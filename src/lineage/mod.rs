mod error;
mod graph;
mod load;
mod parse;

pub use error::LoadError;
pub use graph::{InfluenceLink, LineageGraph, LinkIndex, ModelNode, NodeIndex};
pub use load::load_dataset;

#[cfg(test)]
pub(crate) use graph::{Category, LinkType, fixtures};
