use indexmap::IndexMap;

use crate::attrs::{ARROW_TYPES, LINE_TYPES, check_value};
use crate::error::Result;
use crate::label::{EdgeLabel, EdgeLabelOptions, LabelStyle};
use crate::model::{ObjectId, Owner};
use crate::properties::{PropertySchema, PropertyScope};
use crate::xml::XmlElement;

/// Construction options for an [`Edge`].
#[derive(Debug, Clone)]
pub struct EdgeOptions {
    /// Display name; when present it also becomes the first label's text.
    pub name: Option<String>,
    pub arrowhead: String,
    pub arrowfoot: String,
    pub color: String,
    pub line_type: String,
    pub width: String,
    pub label_background_color: Option<String>,
    pub label_border_color: Option<String>,
    /// Auxiliary label anchored at the source end.
    pub source_label: Option<String>,
    /// Auxiliary label anchored at the target end.
    pub target_label: Option<String>,
    pub custom_properties: IndexMap<String, String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            name: None,
            arrowhead: "standard".to_string(),
            arrowfoot: "none".to_string(),
            color: "#000000".to_string(),
            line_type: "line".to_string(),
            width: "1.0".to_string(),
            label_background_color: None,
            label_border_color: None,
            source_label: None,
            target_label: None,
            custom_properties: IndexMap::new(),
            url: None,
            description: None,
        }
    }
}

/// A binding between two entities, owned by a container that is a common
/// ancestor of both endpoints.
#[derive(Debug, Clone)]
pub struct Edge {
    pub name: String,
    pub labels: Vec<EdgeLabel>,
    pub arrowhead: String,
    pub arrowfoot: String,
    pub color: String,
    pub line_type: String,
    pub width: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub properties: IndexMap<String, String>,
    source: ObjectId,
    target: ObjectId,
    owner: Owner,
    structural_id: String,
}

impl Edge {
    pub(crate) fn new(
        source: ObjectId,
        target: ObjectId,
        options: EdgeOptions,
        schema: &PropertySchema,
    ) -> Result<Self> {
        check_value("arrowhead", &options.arrowhead, ARROW_TYPES)?;
        check_value("arrowfoot", &options.arrowfoot, ARROW_TYPES)?;
        check_value("line_type", &options.line_type, LINE_TYPES)?;

        let name = options.name.unwrap_or_default();
        let mut labels = Vec::new();
        if !name.is_empty() {
            labels.push(EdgeLabel::new(
                &name,
                EdgeLabelOptions {
                    style: LabelStyle {
                        border_color: options.label_border_color.clone(),
                        background_color: options.label_background_color.clone(),
                        ..LabelStyle::default()
                    },
                    ..EdgeLabelOptions::default()
                },
            )?);
        }
        if let Some(text) = &options.source_label {
            labels.push(EdgeLabel::new(
                text,
                EdgeLabelOptions {
                    style: LabelStyle {
                        border_color: options.label_border_color.clone(),
                        background_color: options.label_background_color.clone(),
                        ..LabelStyle::default()
                    },
                    model_name: Some("six_pos".to_string()),
                    model_position: Some("shead".to_string()),
                    preferred_placement: Some("source_on_edge".to_string()),
                },
            )?);
        }
        if let Some(text) = &options.target_label {
            labels.push(EdgeLabel::new(
                text,
                EdgeLabelOptions {
                    style: LabelStyle {
                        border_color: options.label_border_color.clone(),
                        background_color: options.label_background_color.clone(),
                        ..LabelStyle::default()
                    },
                    model_name: Some("six_pos".to_string()),
                    model_position: Some("thead".to_string()),
                    preferred_placement: Some("target_on_edge".to_string()),
                },
            )?);
        }

        let properties =
            schema.values_with_overrides(PropertyScope::Edge, &options.custom_properties)?;

        Ok(Self {
            name,
            labels,
            arrowhead: options.arrowhead,
            arrowfoot: options.arrowfoot,
            color: options.color,
            line_type: options.line_type,
            width: options.width,
            url: options.url,
            description: options.description,
            properties,
            source,
            target,
            owner: Owner::Root,
            structural_id: String::new(),
        })
    }

    /// Appends a label. Chainable.
    pub fn add_label(&mut self, text: impl Into<String>, options: EdgeLabelOptions) -> Result<&mut Self> {
        self.labels.push(EdgeLabel::new(text, options)?);
        Ok(self)
    }

    pub fn source(&self) -> ObjectId {
        self.source
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    /// Structural id as of the last recomputation. Positional, not durable.
    pub fn structural_id(&self) -> &str {
        &self.structural_id
    }

    pub(crate) fn set_owner(&mut self, owner: Owner) {
        self.owner = owner;
    }

    pub(crate) fn set_structural_id(&mut self, sid: String) {
        self.structural_id = sid;
    }

    pub fn set_endpoints(&mut self, source: ObjectId, target: ObjectId) {
        self.source = source;
        self.target = target;
    }

    pub(crate) fn rename(&mut self, name: &str) {
        if let Some(first) = self.labels.first_mut() {
            if first.text() == self.name {
                first.set_text(name);
            }
        }
        self.name = name.to_string();
    }

    pub(crate) fn set_labels(&mut self, labels: Vec<EdgeLabel>) {
        self.labels = labels;
    }

    /// Serializes the edge element. Endpoint structural ids are supplied by
    /// the graph, which owns the handle → id mapping.
    pub fn to_xml_element(
        &self,
        schema: &PropertySchema,
        source_sid: &str,
        target_sid: &str,
    ) -> XmlElement {
        let mut line = XmlElement::new("y:PolyLineEdge")
            .child(
                XmlElement::new("y:Arrows")
                    .attr("source", &self.arrowfoot)
                    .attr("target", &self.arrowhead),
            )
            .child(
                XmlElement::new("y:LineStyle")
                    .attr("color", &self.color)
                    .attr("type", &self.line_type)
                    .attr("width", &self.width),
            );
        for label in &self.labels {
            line.push_child(label.to_xml_element());
        }

        let mut element = XmlElement::new("edge")
            .attr("id", &self.structural_id)
            .attr("source", source_sid)
            .attr("target", target_sid)
            .child(XmlElement::new("data").attr("key", "data_edge").child(line));

        if let Some(url) = &self.url {
            element.push_child(XmlElement::new("data").attr("key", "url_edge").text(url));
        }
        if let Some(description) = &self.description {
            element.push_child(
                XmlElement::new("data")
                    .attr("key", "description_edge")
                    .text(description),
            );
        }
        for definition in schema.for_scope(PropertyScope::Edge) {
            let value = self
                .properties
                .get(&definition.name)
                .unwrap_or(&definition.default_value);
            element.push_child(
                XmlElement::new("data")
                    .attr("key", definition.key_id())
                    .text(value),
            );
        }
        element
    }
}
