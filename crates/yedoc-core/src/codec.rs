//! Document text ⇄ graph conversion.
//!
//! Ingestion is tolerant by design: the format embeds vendor-namespaced
//! extension elements that are irrelevant to the logical graph, so the text
//! is simplified (namespace prefixes stripped, whitespace collapsed) before
//! parsing, and extraction works by looking for the handful of elements that
//! carry meaning.

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use roxmltree::{Document, Node as XmlNode};

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::label::{EdgeLabel, NodeLabel};
use crate::model::{EdgeOptions, Geometry, GroupOptions, NodeOptions, ObjectId, Owner, UmlData};
use crate::properties::{CustomPropertyDefinition, PropertyScope, PropertyType};

const FIXED_KEY_IDS: &[&str] = &[
    "data_node",
    "url_node",
    "description_node",
    "url_edge",
    "description_edge",
    "data_edge",
];

static ROOT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<graphml[^>]*>").expect("literal pattern"));
static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("literal pattern"));

/// Collapses whitespace, drops the root element's attribute block and strips
/// the vendor namespace prefixes, leaving a single-line document that parses
/// without namespace machinery.
pub fn simplify_document_text(raw: &str) -> String {
    let text = raw.replace(['\n', '\r', '\t'], " ");
    let text = ROOT_TAG_RE.replace(&text, "<graphml>");
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    text.replace("> <", "><")
        .replace("y:", "")
        .replace("yfiles.", "")
}

/// Reads and simplifies a document from disk.
pub fn read_simplified_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(simplify_document_text(&raw))
}

pub fn load_document(path: &Path) -> Result<Graph> {
    let text = read_simplified_text(path)?;
    parse_document_text(&text)
}

/// Parses simplified document text into a fresh graph.
pub fn parse_document_text(text: &str) -> Result<Graph> {
    let document = Document::parse(text)?;
    let root = document.root_element();

    // Key table first: key id → declared attribute name. Custom-property key
    // declarations also rebuild the schema (their defaults are not part of
    // the wire format; per-entity values are).
    let mut key_names: IndexMap<String, String> = IndexMap::new();
    let mut schema_defs: Vec<CustomPropertyDefinition> = Vec::new();
    for key in element_children(root, "key") {
        let id = key.attribute("id").unwrap_or_default().to_string();
        let (Some(name), Some(type_name)) = (key.attribute("attr.name"), key.attribute("attr.type"))
        else {
            continue;
        };
        key_names.insert(id.clone(), name.to_string());
        if FIXED_KEY_IDS.contains(&id.as_str()) || name == "url" || name == "description" {
            continue;
        }
        // Keys outside the node/edge scopes (graph metadata, port keys, ...)
        // are not custom properties; leave them in the name table only.
        let Ok(scope) = PropertyScope::parse(key.attribute("for").unwrap_or_default()) else {
            continue;
        };
        let Ok(property_type) = PropertyType::parse(type_name) else {
            continue;
        };
        schema_defs.push(CustomPropertyDefinition {
            scope,
            name: name.to_string(),
            property_type,
            default_value: String::new(),
        });
    }

    let Some(graph_element) = element_children(root, "graph").next() else {
        return Err(Error::malformed("document has no graph element"));
    };
    let mut graph = Graph::with_id(
        graph_element.attribute("edgedefault").unwrap_or("directed"),
        graph_element.attribute("id").unwrap_or("G"),
    );
    for definition in schema_defs {
        graph.schema_mut().define(definition);
    }

    let mut source_map: IndexMap<String, ObjectId> = IndexMap::new();
    parse_level(graph_element, Owner::Root, &mut graph, &mut source_map, &key_names)?;
    graph.reassign_structural_ids();
    Ok(graph)
}

fn element_children<'a>(
    parent: XmlNode<'a, 'a>,
    tag: &'a str,
) -> impl Iterator<Item = XmlNode<'a, 'a>> {
    parent
        .children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

/// One level of the document: materialize nodes and groups (recursing into
/// nested graphs) before edges, since an edge may reference a sibling that
/// appears later in document order.
fn parse_level(
    level: XmlNode<'_, '_>,
    owner: Owner,
    graph: &mut Graph,
    source_map: &mut IndexMap<String, ObjectId>,
    key_names: &IndexMap<String, String>,
) -> Result<()> {
    for element in element_children(level, "node") {
        let source_id = element.attribute("id").unwrap_or_default().to_string();
        if element.attribute("foldertype").is_some() {
            let id = parse_group(element, owner, graph, key_names, &source_id)?;
            source_map.insert(source_id, id);
            if let Some(nested) = element_children(element, "graph").next() {
                parse_level(nested, Owner::Group(id), graph, source_map, key_names)?;
            }
        } else {
            let id = parse_node(element, owner, graph, key_names, &source_id)?;
            source_map.insert(source_id, id);
        }
    }
    for element in element_children(level, "edge") {
        parse_edge(element, owner, graph, source_map, key_names)?;
    }
    Ok(())
}

fn parse_node(
    element: XmlNode<'_, '_>,
    owner: Owner,
    graph: &mut Graph,
    key_names: &IndexMap<String, String>,
    source_id: &str,
) -> Result<ObjectId> {
    let Some(payload) = payload_element(element, "data_node") else {
        return Err(Error::malformed(format!(
            "node '{source_id}' has no graphics payload"
        )));
    };
    let payload_tag = payload.tag_name().name();
    if payload_tag != "ShapeNode" && payload_tag != "UMLClassNode" {
        return Err(Error::Unsupported {
            feature: format!("node payload element '{payload_tag}'"),
        });
    }

    let labels = collect_node_labels(payload);
    let mut options = NodeOptions {
        node_type: payload_tag.to_string(),
        geometry: parse_geometry(payload),
        uml: parse_uml(payload),
        ..NodeOptions::default()
    };
    apply_shape_style(
        payload,
        &mut options.shape,
        &mut options.shape_fill,
        &mut options.transparent,
        &mut options.border_color,
        &mut options.border_type,
        &mut options.border_width,
    );

    let name = labels
        .first()
        .map(|label| label.text().to_string())
        .unwrap_or_else(|| source_id.to_string());
    let id = graph.add_node_with(owner, name, options)?;
    if let Some(node) = graph.node_mut(id) {
        if !labels.is_empty() {
            node.set_labels(labels);
        }
    }
    let (url, description, properties) = parse_data_channels(element, key_names, "data_node");
    if let Some(node) = graph.node_mut(id) {
        node.url = url;
        node.description = description;
        for (name, value) in properties {
            node.properties.insert(name, value);
        }
    }
    Ok(id)
}

fn parse_group(
    element: XmlNode<'_, '_>,
    owner: Owner,
    graph: &mut Graph,
    key_names: &IndexMap<String, String>,
    source_id: &str,
) -> Result<ObjectId> {
    // The realizer carrying the visible state sits below
    // ProxyAutoBoundsNode/Realizers; take the first GroupNode found.
    let Some(realizer) = element
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "GroupNode")
    else {
        return Err(Error::Unsupported {
            feature: format!("group '{source_id}' without a GroupNode realizer"),
        });
    };

    let labels = collect_node_labels(realizer);
    let mut options = GroupOptions {
        geometry: parse_geometry(realizer),
        ..GroupOptions::default()
    };
    apply_shape_style(
        realizer,
        &mut options.shape,
        &mut options.fill,
        &mut options.transparent,
        &mut options.border_color,
        &mut options.border_type,
        &mut options.border_width,
    );
    if let Some(state) = element_children(realizer, "State").next() {
        if let Some(closed) = state.attribute("closed") {
            options.closed = closed.to_string();
        }
    }

    let name = labels
        .first()
        .map(|label| label.text().to_string())
        .unwrap_or_else(|| source_id.to_string());
    let id = graph.add_group_with(owner, name, options)?;
    if let Some(group) = graph.group_mut(id) {
        if !labels.is_empty() {
            group.set_labels(labels);
        }
    }
    let (url, description, properties) = parse_data_channels(element, key_names, "data_node");
    if let Some(group) = graph.group_mut(id) {
        group.url = url;
        group.description = description;
        for (name, value) in properties {
            group.properties.insert(name, value);
        }
    }
    Ok(id)
}

fn parse_edge(
    element: XmlNode<'_, '_>,
    owner: Owner,
    graph: &mut Graph,
    source_map: &IndexMap<String, ObjectId>,
    key_names: &IndexMap<String, String>,
) -> Result<()> {
    let edge_id = element.attribute("id").unwrap_or_default();
    let source_ref = element.attribute("source").unwrap_or_default();
    let target_ref = element.attribute("target").unwrap_or_default();
    let (Some(&source), Some(&target)) = (source_map.get(source_ref), source_map.get(target_ref))
    else {
        return Err(Error::malformed(format!(
            "edge '{edge_id}' references unknown endpoint '{source_ref}' or '{target_ref}'"
        )));
    };

    let mut options = EdgeOptions::default();
    let mut labels: Vec<EdgeLabel> = Vec::new();
    if let Some(payload) = payload_element(element, "data_edge") {
        if let Some(arrows) = element_children(payload, "Arrows").next() {
            if let Some(value) = arrows.attribute("source") {
                options.arrowfoot = value.to_string();
            }
            if let Some(value) = arrows.attribute("target") {
                options.arrowhead = value.to_string();
            }
        }
        if let Some(line) = element_children(payload, "LineStyle").next() {
            if let Some(value) = line.attribute("color") {
                options.color = value.to_string();
            }
            if let Some(value) = line.attribute("type") {
                options.line_type = value.to_string();
            }
            if let Some(value) = line.attribute("width") {
                options.width = value.to_string();
            }
        }
        for label in element_children(payload, "EdgeLabel") {
            labels.push(EdgeLabel::from_document_parts(
                label.text().unwrap_or_default().to_string(),
                raw_attributes(label),
            ));
        }
    }

    let id = graph.add_edge_with(owner, source, target, options)?;
    let (url, description, properties) = parse_data_channels(element, key_names, "data_edge");
    if let Some(edge) = graph.edge_mut(id) {
        if let Some(first) = labels.first() {
            edge.name = first.text().to_string();
        }
        if !labels.is_empty() {
            edge.set_labels(labels);
        }
        edge.url = url;
        edge.description = description;
        for (name, value) in properties {
            edge.properties.insert(name, value);
        }
    }
    Ok(())
}

/// The graphics payload: first element child of the `data` element carrying
/// the given key.
fn payload_element<'a>(element: XmlNode<'a, 'a>, data_key: &str) -> Option<XmlNode<'a, 'a>> {
    element_children(element, "data")
        .find(|data| data.attribute("key") == Some(data_key))
        .and_then(|data| data.children().find(XmlNode::is_element))
}

fn collect_node_labels(payload: XmlNode<'_, '_>) -> Vec<NodeLabel> {
    element_children(payload, "NodeLabel")
        .map(|label| {
            NodeLabel::from_document_parts(
                label.text().unwrap_or_default().to_string(),
                raw_attributes(label),
            )
        })
        .collect()
}

fn raw_attributes(element: XmlNode<'_, '_>) -> IndexMap<String, String> {
    element
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect()
}

fn parse_geometry(payload: XmlNode<'_, '_>) -> Geometry {
    let mut geometry = Geometry::default();
    if let Some(element) = element_children(payload, "Geometry").next() {
        geometry.height = element.attribute("height").map(str::to_string);
        geometry.width = element.attribute("width").map(str::to_string);
        geometry.x = element.attribute("x").map(str::to_string);
        geometry.y = element.attribute("y").map(str::to_string);
    }
    geometry
}

fn parse_uml(payload: XmlNode<'_, '_>) -> Option<UmlData> {
    let uml = element_children(payload, "UML").next()?;
    let attributes = element_children(uml, "AttributeLabel")
        .next()
        .and_then(|el| el.text())
        .unwrap_or_default()
        .to_string();
    let methods = element_children(uml, "MethodLabel")
        .next()
        .and_then(|el| el.text())
        .unwrap_or_default()
        .to_string();
    let stereotype = uml
        .attribute("stereotype")
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Some(UmlData {
        attributes,
        methods,
        stereotype,
    })
}

fn apply_shape_style(
    payload: XmlNode<'_, '_>,
    shape: &mut String,
    fill: &mut String,
    transparent: &mut String,
    border_color: &mut String,
    border_type: &mut String,
    border_width: &mut String,
) {
    if let Some(element) = element_children(payload, "Fill").next() {
        if let Some(value) = element.attribute("color") {
            *fill = value.to_string();
        }
        if let Some(value) = element.attribute("transparent") {
            *transparent = value.to_string();
        }
    }
    if let Some(element) = element_children(payload, "BorderStyle").next() {
        if let Some(value) = element.attribute("color") {
            *border_color = value.to_string();
        }
        if let Some(value) = element.attribute("type") {
            *border_type = value.to_string();
        }
        if let Some(value) = element.attribute("width") {
            *border_width = value.to_string();
        }
    }
    if let Some(element) = element_children(payload, "Shape").next() {
        if let Some(value) = element.attribute("type") {
            *shape = value.to_string();
        }
    }
}

/// url / description / custom-property side channels of a node or edge
/// element. `payload_key` is the graphics key to skip.
fn parse_data_channels(
    element: XmlNode<'_, '_>,
    key_names: &IndexMap<String, String>,
    payload_key: &str,
) -> (Option<String>, Option<String>, IndexMap<String, String>) {
    let mut url = None;
    let mut description = None;
    let mut properties = IndexMap::new();
    for data in element_children(element, "data") {
        let Some(key) = data.attribute("key") else {
            continue;
        };
        if key == payload_key {
            continue;
        }
        let text = data.text().unwrap_or_default().to_string();
        match key_names.get(key).map(String::as_str) {
            Some("url") => url = Some(text),
            Some("description") => description = Some(text),
            Some(name) => {
                properties.insert(name.to_string(), text);
            }
            None => {}
        }
    }
    (url, description, properties)
}
