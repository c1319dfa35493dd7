//! Decorative text attached to nodes, groups and edges.
//!
//! Labels are immutable once constructed. Their attributes are kept as an
//! ordered map so a label serializes the same way every time, including after
//! a document round-trip.

use indexmap::IndexMap;

use crate::attrs::{FONT_STYLES, HORIZONTAL_ALIGNMENTS, TRUE_FALSE, VERTICAL_ALIGNMENTS, check_value};
use crate::error::{Error, Result};
use crate::xml::XmlElement;

/// Position models a node label may use, mapped to the position keywords each
/// model accepts.
pub const NODE_LABEL_MODELS: &[(&str, &[&str])] = &[
    ("internal", &["t", "b", "c", "l", "r", "tl", "tr", "bl", "br"]),
    ("corners", &["nw", "ne", "sw", "se"]),
    ("sandwich", &["n", "s"]),
    ("sides", &["n", "e", "s", "w"]),
    ("eight_pos", &["n", "e", "s", "w", "nw", "ne", "sw", "se"]),
];

/// Position models an edge label may use. The slider models place the label
/// by coordinate and accept any position keyword.
pub const EDGE_LABEL_MODELS: &[(&str, &[&str])] = &[
    ("two_pos", &["head", "tail"]),
    ("centered", &["center"]),
    ("six_pos", &["shead", "thead", "head", "stail", "ttail", "tail"]),
    ("three_center", &["center", "scentr", "tcentr"]),
    ("center_slider", &[]),
    ("side_slider", &[]),
];

/// Style attributes shared by node and edge labels.
#[derive(Debug, Clone)]
pub struct LabelStyle {
    pub alignment: String,
    pub font_family: String,
    pub font_size: String,
    pub font_style: String,
    pub height: String,
    pub width: Option<String>,
    pub underlined_text: String,
    pub text_color: String,
    pub icon_text_gap: String,
    pub horizontal_text_position: String,
    pub vertical_text_position: String,
    pub visible: String,
    pub border_color: Option<String>,
    pub background_color: Option<String>,
    pub has_background_color: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            alignment: "center".to_string(),
            font_family: "Dialog".to_string(),
            font_size: "12".to_string(),
            font_style: "plain".to_string(),
            height: "18.1328125".to_string(),
            width: Some("55.708984375".to_string()),
            underlined_text: "false".to_string(),
            text_color: "#000000".to_string(),
            icon_text_gap: "4".to_string(),
            horizontal_text_position: "center".to_string(),
            vertical_text_position: "center".to_string(),
            visible: "true".to_string(),
            border_color: None,
            background_color: None,
            has_background_color: "false".to_string(),
        }
    }
}

impl LabelStyle {
    /// Validates the enumerated attributes and lays the full attribute set out
    /// in canonical order.
    fn build_params(&self) -> Result<IndexMap<String, String>> {
        check_value(
            "horizontalTextPosition",
            &self.horizontal_text_position,
            HORIZONTAL_ALIGNMENTS,
        )?;
        check_value(
            "verticalTextPosition",
            &self.vertical_text_position,
            VERTICAL_ALIGNMENTS,
        )?;
        check_value("alignment", &self.alignment, HORIZONTAL_ALIGNMENTS)?;
        check_value("fontStyle", &self.font_style, FONT_STYLES)?;
        check_value("visible", &self.visible, TRUE_FALSE)?;
        check_value("underlinedText", &self.underlined_text, TRUE_FALSE)?;

        // An explicit background color implies the flag.
        let has_background = if self.background_color.is_some() {
            "true".to_string()
        } else {
            self.has_background_color.clone()
        };
        check_value("hasBackgroundColor", &has_background, TRUE_FALSE)?;

        let mut params = IndexMap::new();
        params.insert(
            "horizontalTextPosition".to_string(),
            self.horizontal_text_position.clone(),
        );
        params.insert(
            "verticalTextPosition".to_string(),
            self.vertical_text_position.clone(),
        );
        params.insert("alignment".to_string(), self.alignment.clone());
        params.insert("fontStyle".to_string(), self.font_style.clone());
        params.insert("fontFamily".to_string(), self.font_family.clone());
        params.insert("iconTextGap".to_string(), self.icon_text_gap.clone());
        params.insert("fontSize".to_string(), self.font_size.clone());
        params.insert("textColor".to_string(), self.text_color.clone());
        params.insert("visible".to_string(), self.visible.clone());
        params.insert("underlinedText".to_string(), self.underlined_text.clone());
        params.insert("hasBackgroundColor".to_string(), has_background);
        if let Some(width) = &self.width {
            params.insert("width".to_string(), width.clone());
        }
        params.insert("height".to_string(), self.height.clone());
        if let Some(border_color) = &self.border_color {
            params.insert("borderColor".to_string(), border_color.clone());
        }
        if let Some(background_color) = &self.background_color {
            params.insert("backgroundColor".to_string(), background_color.clone());
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeLabelOptions {
    pub style: LabelStyle,
    pub model_name: Option<String>,
    pub model_position: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeLabelOptions {
    pub style: LabelStyle,
    pub model_name: Option<String>,
    pub model_position: Option<String>,
    pub preferred_placement: Option<String>,
}

fn check_model(
    models: &[(&str, &[&str])],
    model_name: &str,
    model_position: &str,
) -> Result<()> {
    let Some((_, positions)) = models.iter().find(|(name, _)| *name == model_name) else {
        return Err(Error::InvalidValue {
            parameter: "modelName".to_string(),
            value: model_name.to_string(),
            allowed: models
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        });
    };
    check_value("modelPosition", model_position, positions)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLabel {
    text: String,
    params: IndexMap<String, String>,
}

impl NodeLabel {
    pub fn new(text: impl Into<String>, options: NodeLabelOptions) -> Result<Self> {
        let model_name = options.model_name.unwrap_or_else(|| "internal".to_string());
        let model_position = options.model_position.unwrap_or_else(|| "c".to_string());
        check_model(NODE_LABEL_MODELS, &model_name, &model_position)?;

        let mut params = options.style.build_params()?;
        params.insert("modelName".to_string(), model_name);
        params.insert("modelPosition".to_string(), model_position);
        Ok(Self {
            text: text.into(),
            params,
        })
    }

    /// Rebuilds a label exactly as it appeared in a parsed document. The
    /// attribute set is taken verbatim, bypassing vocabulary checks, so the
    /// document serializes back byte-identically.
    pub(crate) fn from_document_parts(text: String, params: IndexMap<String, String>) -> Self {
        Self { text, params }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn to_xml_element(&self) -> XmlElement {
        let mut element = XmlElement::new("y:NodeLabel");
        for (name, value) in &self.params {
            element.set_attr(name, value);
        }
        element.text(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    text: String,
    params: IndexMap<String, String>,
}

impl EdgeLabel {
    pub fn new(text: impl Into<String>, options: EdgeLabelOptions) -> Result<Self> {
        let model_name = options.model_name.unwrap_or_else(|| "centered".to_string());
        let model_position = options
            .model_position
            .unwrap_or_else(|| "center".to_string());
        check_model(EDGE_LABEL_MODELS, &model_name, &model_position)?;

        let mut params = options.style.build_params()?;
        params.insert("modelName".to_string(), model_name);
        params.insert("modelPosition".to_string(), model_position);
        if let Some(placement) = options.preferred_placement {
            params.insert("preferredPlacement".to_string(), placement);
        }
        Ok(Self {
            text: text.into(),
            params,
        })
    }

    pub(crate) fn from_document_parts(text: String, params: IndexMap<String, String>) -> Self {
        Self { text, params }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn to_xml_element(&self) -> XmlElement {
        let mut element = XmlElement::new("y:EdgeLabel");
        for (name, value) in &self.params {
            element.set_attr(name, value);
        }
        element.text(&self.text)
    }
}
