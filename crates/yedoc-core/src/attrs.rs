//! Enumerated style vocabularies accepted by the consuming application, and
//! the membership check every style-bearing setter funnels through.

use crate::error::{Error, Result};

pub const LINE_TYPES: &[&str] = &["line", "dashed", "dotted", "dashed_dotted"];

pub const FONT_STYLES: &[&str] = &["plain", "bold", "italic", "bolditalic"];

pub const HORIZONTAL_ALIGNMENTS: &[&str] = &["left", "center", "right"];

pub const VERTICAL_ALIGNMENTS: &[&str] = &["top", "center", "bottom"];

pub const SHAPES: &[&str] = &[
    "rectangle",
    "rectangle3d",
    "roundrectangle",
    "diamond",
    "ellipse",
    "fatarrow",
    "fatarrow2",
    "hexagon",
    "octagon",
    "parallelogram",
    "parallelogram2",
    "star5",
    "star6",
    "star8",
    "trapezoid",
    "trapezoid2",
    "triangle",
];

pub const ARROW_TYPES: &[&str] = &[
    "none",
    "standard",
    "white_delta",
    "diamond",
    "white_diamond",
    "short",
    "plain",
    "concave",
    "convex",
    "circle",
    "transparent_circle",
    "dash",
    "skewed_dash",
    "t_shape",
    "crows_foot_one_mandatory",
    "crows_foot_many_mandatory",
    "crows_foot_many_optional",
    "crows_foot_one",
    "crows_foot_many",
    "crows_foot_optional",
];

pub const PROPERTY_SCOPES: &[&str] = &["node", "edge"];

pub const PROPERTY_TYPES: &[&str] = &["string", "int", "double", "boolean"];

pub const TRUE_FALSE: &[&str] = &["true", "false"];

/// Checks `value` against an enumerated vocabulary. An empty vocabulary means
/// the parameter is free-form and the check is a no-op.
pub fn check_value(parameter: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.is_empty() || allowed.contains(&value) {
        return Ok(());
    }
    Err(Error::InvalidValue {
        parameter: parameter.to_string(),
        value: value.to_string(),
        allowed: allowed.join(", "),
    })
}
