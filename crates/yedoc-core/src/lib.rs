#![forbid(unsafe_code)]

//! Programmatic object model for yEd GraphML documents.
//!
//! Design goals:
//! - build, mutate and round-trip diagram documents from code
//! - deterministic serialization (insertion-ordered collections throughout)
//! - tolerant ingestion of application-written documents
//!
//! Entities are owned by a [`Graph`] and addressed through stable handles;
//! the positional ids appearing in the document text are derived state. See
//! the `model` module docs for the identity rules.

pub mod attrs;
pub mod codec;
pub mod document;
pub mod error;
pub mod graph;
pub mod label;
pub mod model;
pub mod properties;
pub mod stats;
pub mod xml;

pub use document::{DocumentFile, PersistOptions};
pub use error::{Error, Result};
pub use graph::{Graph, IntegrityMode, RemovalMode};
pub use label::{EdgeLabel, EdgeLabelOptions, LabelStyle, NodeLabel, NodeLabelOptions};
pub use model::{
    Edge, EdgeId, EdgeOptions, Geometry, GraphObject, Group, GroupOptions, Node, NodeOptions,
    ObjectId, Owner, UmlData,
};
pub use properties::{CustomPropertyDefinition, PropertySchema, PropertyScope, PropertyType};
pub use stats::{GraphItem, GraphStats};

#[cfg(test)]
mod tests;
