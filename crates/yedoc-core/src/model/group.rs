use indexmap::IndexMap;

use crate::attrs::{LINE_TYPES, SHAPES, TRUE_FALSE, check_value};
use crate::error::Result;
use crate::label::{LabelStyle, NodeLabel, NodeLabelOptions};
use crate::model::{Geometry, Owner};
use crate::properties::{PropertySchema, PropertyScope};
use crate::xml::XmlElement;

/// Construction options for a [`Group`].
#[derive(Debug, Clone)]
pub struct GroupOptions {
    pub label: Option<String>,
    pub label_alignment: String,
    pub font_family: String,
    pub underlined_text: String,
    pub font_style: String,
    pub font_size: String,
    pub shape: String,
    pub fill: String,
    pub transparent: String,
    pub border_color: String,
    pub border_type: String,
    pub border_width: String,
    pub geometry: Geometry,
    /// Whether the container renders collapsed.
    pub closed: String,
    pub custom_properties: IndexMap<String, String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            label: None,
            label_alignment: "center".to_string(),
            font_family: "Dialog".to_string(),
            underlined_text: "false".to_string(),
            font_style: "plain".to_string(),
            font_size: "12".to_string(),
            shape: "rectangle".to_string(),
            fill: "#FFCC00".to_string(),
            transparent: "false".to_string(),
            border_color: "#000000".to_string(),
            border_type: "line".to_string(),
            border_width: "1.0".to_string(),
            geometry: Geometry::default(),
            closed: "false".to_string(),
            custom_properties: IndexMap::new(),
            url: None,
            description: None,
        }
    }
}

/// A container entity. Renders as a collapsible node; its children live in
/// the graph arena and are serialized into a nested `graph` element.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub labels: Vec<NodeLabel>,
    pub shape: String,
    pub fill: String,
    pub transparent: String,
    pub border_color: String,
    pub border_type: String,
    pub border_width: String,
    pub geometry: Geometry,
    pub closed: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub properties: IndexMap<String, String>,
    owner: Owner,
    structural_id: String,
}

impl Group {
    pub(crate) fn new(
        name: impl Into<String>,
        options: GroupOptions,
        schema: &PropertySchema,
    ) -> Result<Self> {
        let name = name.into();
        check_value("shape", &options.shape, SHAPES)?;
        check_value("border_type", &options.border_type, LINE_TYPES)?;
        check_value("closed", &options.closed, TRUE_FALSE)?;

        // Container titles sit at the top edge.
        let first_label = NodeLabel::new(
            options.label.as_deref().unwrap_or(&name),
            NodeLabelOptions {
                style: LabelStyle {
                    alignment: options.label_alignment,
                    font_family: options.font_family,
                    underlined_text: options.underlined_text,
                    font_style: options.font_style,
                    font_size: options.font_size,
                    ..LabelStyle::default()
                },
                model_name: Some("internal".to_string()),
                model_position: Some("t".to_string()),
            },
        )?;

        let properties =
            schema.values_with_overrides(PropertyScope::Node, &options.custom_properties)?;

        Ok(Self {
            name,
            labels: vec![first_label],
            shape: options.shape,
            fill: options.fill,
            transparent: options.transparent,
            border_color: options.border_color,
            border_type: options.border_type,
            border_width: options.border_width,
            geometry: options.geometry,
            closed: options.closed,
            url: options.url,
            description: options.description,
            properties,
            owner: Owner::Root,
            structural_id: String::new(),
        })
    }

    /// Appends a label. Chainable.
    pub fn add_label(&mut self, text: impl Into<String>, options: NodeLabelOptions) -> Result<&mut Self> {
        self.labels.push(NodeLabel::new(text, options)?);
        Ok(self)
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

    pub(crate) fn rename(&mut self, name: &str) {
        if let Some(first) = self.labels.first_mut() {
            if first.text() == self.name {
                first.set_text(name);
            }
        }
        self.name = name.to_string();
    }

    pub(crate) fn set_labels(&mut self, labels: Vec<NodeLabel>) {
        self.labels = labels;
    }

    /// Serializes the group element. `children` are the already-serialized
    /// child nodes, groups and edges, in document order.
    pub fn to_xml_element(
        &self,
        schema: &PropertySchema,
        children: Vec<XmlElement>,
    ) -> XmlElement {
        let mut realizer = XmlElement::new("y:GroupNode");
        if let Some(geometry) = self.geometry.to_xml_element() {
            realizer.push_child(geometry);
        }
        realizer.push_child(
            XmlElement::new("y:Fill")
                .attr("color", &self.fill)
                .attr("transparent", &self.transparent),
        );
        realizer.push_child(
            XmlElement::new("y:BorderStyle")
                .attr("color", &self.border_color)
                .attr("type", &self.border_type)
                .attr("width", &self.border_width),
        );
        for label in &self.labels {
            realizer.push_child(label.to_xml_element());
        }
        realizer.push_child(XmlElement::new("y:Shape").attr("type", &self.shape));
        realizer.push_child(XmlElement::new("y:State").attr("closed", &self.closed));

        let mut nested_graph = XmlElement::new("graph")
            .attr("edgedefault", "directed")
            .attr("id", &self.structural_id);
        for child in children {
            nested_graph.push_child(child);
        }

        let mut element = XmlElement::new("node")
            .attr("id", &self.structural_id)
            .attr("yfiles.foldertype", "group")
            .child(
                XmlElement::new("data").attr("key", "data_node").child(
                    XmlElement::new("y:ProxyAutoBoundsNode").child(
                        XmlElement::new("y:Realizers")
                            .attr("active", "0")
                            .child(realizer),
                    ),
                ),
            )
            .child(nested_graph);

        if let Some(url) = &self.url {
            element.push_child(XmlElement::new("data").attr("key", "url_node").text(url));
        }
        if let Some(description) = &self.description {
            element.push_child(
                XmlElement::new("data")
                    .attr("key", "description_node")
                    .text(description),
            );
        }
        for definition in schema.for_scope(PropertyScope::Node) {
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
