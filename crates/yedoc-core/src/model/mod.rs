//! In-memory entities of a diagram document.
//!
//! Entities live in the graph's arena and are addressed by stable handles
//! ([`ObjectId`] for nodes and groups, [`EdgeId`] for edges). The positional
//! structural id (`n0`, `n3::n1`, `n3::e0`, ...) used in the document text is
//! derived state: it is recomputed whenever ownership or ordering changes and
//! must never be persisted as a durable key.

mod edge;
mod group;
mod node;

pub use edge::{Edge, EdgeOptions};
pub use group::{Group, GroupOptions};
pub use node::{Node, NodeOptions};

use crate::xml::XmlElement;

/// Stable identity of a node or group, unique within one graph for its whole
/// lifetime. Survives renames, re-parenting and structural-id recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

/// Stable identity of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) u64);

/// The direct owner of an entity: the document root or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Root,
    Group(ObjectId),
}

/// Optional placement/extent attributes, kept as strings and passed through
/// to the document unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub height: Option<String>,
    pub width: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.width.is_none() && self.x.is_none() && self.y.is_none()
    }

    pub(crate) fn to_xml_element(&self) -> Option<XmlElement> {
        if self.is_empty() {
            return None;
        }
        let mut element = XmlElement::new("y:Geometry");
        if let Some(height) = &self.height {
            element.set_attr("height", height);
        }
        if let Some(width) = &self.width {
            element.set_attr("width", width);
        }
        if let Some(x) = &self.x {
            element.set_attr("x", x);
        }
        if let Some(y) = &self.y {
            element.set_attr("y", y);
        }
        Some(element)
    }
}

/// Payload of a UML class node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UmlData {
    pub attributes: String,
    pub methods: String,
    pub stereotype: Option<String>,
}

/// Node-or-group stored in the graph arena.
#[derive(Debug, Clone)]
pub enum GraphObject {
    Node(Node),
    Group(Group),
}

impl GraphObject {
    pub fn name(&self) -> &str {
        match self {
            GraphObject::Node(node) => &node.name,
            GraphObject::Group(group) => &group.name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, GraphObject::Group(_))
    }

    pub fn owner(&self) -> Owner {
        match self {
            GraphObject::Node(node) => node.owner(),
            GraphObject::Group(group) => group.owner(),
        }
    }

    pub fn structural_id(&self) -> &str {
        match self {
            GraphObject::Node(node) => node.structural_id(),
            GraphObject::Group(group) => group.structural_id(),
        }
    }

    pub(crate) fn set_owner(&mut self, owner: Owner) {
        match self {
            GraphObject::Node(node) => node.set_owner(owner),
            GraphObject::Group(group) => group.set_owner(owner),
        }
    }

    pub(crate) fn set_structural_id(&mut self, sid: String) {
        match self {
            GraphObject::Node(node) => node.set_structural_id(sid),
            GraphObject::Group(group) => group.set_structural_id(sid),
        }
    }

    /// Renames the object, keeping a first label that still carried the old
    /// display name in sync.
    pub(crate) fn rename(&mut self, name: &str) {
        match self {
            GraphObject::Node(node) => node.rename(name),
            GraphObject::Group(group) => group.rename(name),
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            GraphObject::Node(node) => Some(node),
            GraphObject::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            GraphObject::Group(group) => Some(group),
            GraphObject::Node(_) => None,
        }
    }
}
