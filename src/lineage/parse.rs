use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::error::SchemaError;
use super::graph::{Category, CodeLink, InfluenceLink, LineageGraph, LinkType, ModelNode, Paper};

const FALLBACK_COLOR: &str = "#94a3b8";
const DEFAULT_NODE_SIZE: f32 = 20.0;
const REQUIRED_NODE_FIELDS: [&str; 4] = ["id", "name", "category", "year"];
const REQUIRED_LINK_FIELDS: [&str; 3] = ["source", "target", "type"];

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: String,
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    category: String,
    year: i32,
    #[serde(default)]
    size: Option<f32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    main_idea: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    key_contributions: Option<Vec<String>>,
    #[serde(default)]
    papers: Option<Vec<RawPaper>>,
    #[serde(default)]
    code: Option<Vec<RawCodeLink>>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawPaper {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawCodeLink {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawLink {
    source: String,
    target: String,
    #[serde(rename = "type")]
    link_type: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawTag {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

/// Validates a decoded dataset document and resolves link endpoints to node indices.
pub fn parse_dataset(document: &Value) -> Result<LineageGraph, SchemaError> {
    let object = document
        .as_object()
        .ok_or_else(|| SchemaError::new("<root>", "expected a JSON object"))?;

    let raw_nodes = sequence_field(object, "nodes")?;
    let raw_links = sequence_field(object, "links")?;
    let raw_categories = mapping_field(object, "categories")?;
    let raw_link_types = mapping_field(object, "linkTypes")?;

    let categories = raw_categories
        .iter()
        .map(|(key, value)| {
            let raw = parse_tag(value, &format!("categories.{key}"))?;
            Ok((
                key.clone(),
                Category {
                    key: key.clone(),
                    name: raw.name.unwrap_or_else(|| key.clone()),
                    color: raw.color.unwrap_or_else(|| FALLBACK_COLOR.to_owned()),
                },
            ))
        })
        .collect::<Result<BTreeMap<_, _>, SchemaError>>()?;

    let link_types = raw_link_types
        .iter()
        .map(|(key, value)| {
            let raw = parse_tag(value, &format!("linkTypes.{key}"))?;
            Ok((
                key.clone(),
                LinkType {
                    key: key.clone(),
                    label: raw.label.or(raw.name).unwrap_or_else(|| key.clone()),
                    color: raw.color.unwrap_or_else(|| FALLBACK_COLOR.to_owned()),
                },
            ))
        })
        .collect::<Result<BTreeMap<_, _>, SchemaError>>()?;

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut index_by_id = HashMap::with_capacity(raw_nodes.len());
    for (index, value) in raw_nodes.iter().enumerate() {
        let location = format!("nodes[{index}]");
        require_fields(value, &location, &REQUIRED_NODE_FIELDS)?;
        let raw = RawNode::deserialize(value)
            .map_err(|error| SchemaError::new(location.as_str(), error.to_string()))?;

        if index_by_id.insert(raw.id.clone(), index).is_some() {
            return Err(SchemaError::new(
                format!("{location}.id"),
                format!("duplicate node id `{}`", raw.id),
            ));
        }
        if !categories.contains_key(&raw.category) {
            warn!(node = %raw.id, category = %raw.category, "node references an unknown category");
        }

        nodes.push(normalize_node(raw));
    }

    let mut links = Vec::with_capacity(raw_links.len());
    for (index, value) in raw_links.iter().enumerate() {
        let location = format!("links[{index}]");
        require_fields(value, &location, &REQUIRED_LINK_FIELDS)?;
        let raw = RawLink::deserialize(value)
            .map_err(|error| SchemaError::new(location.as_str(), error.to_string()))?;

        let resolve = |field: &str, id: &str| {
            index_by_id.get(id).copied().ok_or_else(|| {
                SchemaError::new(
                    format!("{location}.{field}"),
                    format!("unknown node id `{id}`"),
                )
            })
        };
        let source = resolve("source", &raw.source)?;
        let target = resolve("target", &raw.target)?;

        if !link_types.contains_key(&raw.link_type) {
            warn!(
                link = %location,
                link_type = %raw.link_type,
                "link references an unknown link type"
            );
        }

        links.push(InfluenceLink {
            source,
            target,
            link_type: raw.link_type,
        });
    }

    Ok(LineageGraph::from_parts(nodes, links, categories, link_types))
}

fn sequence_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Vec<Value>, SchemaError> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::new(field, "missing or not an array"))
}

fn mapping_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Map<String, Value>, SchemaError> {
    object
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::new(field, "missing or not an object"))
}

fn require_fields(value: &Value, location: &str, fields: &[&str]) -> Result<(), SchemaError> {
    let object = value
        .as_object()
        .ok_or_else(|| SchemaError::new(location, "expected an object"))?;

    for field in fields {
        let present = match object.get(*field) {
            None | Some(Value::Null) => false,
            Some(Value::String(text)) => !text.trim().is_empty(),
            Some(_) => true,
        };
        if !present {
            return Err(SchemaError::new(
                format!("{location}.{field}"),
                "missing required field",
            ));
        }
    }

    Ok(())
}

fn parse_tag(value: &Value, location: &str) -> Result<RawTag, SchemaError> {
    RawTag::deserialize(value).map_err(|error| SchemaError::new(location, error.to_string()))
}

fn normalize_node(raw: RawNode) -> ModelNode {
    let mut tags = Vec::new();
    for tag in raw.tags.unwrap_or_default() {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let size = raw
        .size
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or(DEFAULT_NODE_SIZE);

    ModelNode {
        full_name: raw.full_name.unwrap_or_else(|| raw.name.clone()),
        id: raw.id,
        name: raw.name,
        category: raw.category,
        year: raw.year,
        size,
        description: raw.description.unwrap_or_default(),
        main_idea: raw.main_idea.unwrap_or_default(),
        tags,
        key_contributions: raw.key_contributions.unwrap_or_default(),
        papers: raw
            .papers
            .unwrap_or_default()
            .into_iter()
            .map(|paper| Paper {
                title: paper.title.unwrap_or_default(),
                year: paper.year,
                url: paper.url.unwrap_or_default(),
            })
            .collect(),
        code: raw
            .code
            .unwrap_or_default()
            .into_iter()
            .map(|code| CodeLink {
                language: code.language.unwrap_or_default(),
                url: code.url.unwrap_or_default(),
            })
            .collect(),
    }
}
