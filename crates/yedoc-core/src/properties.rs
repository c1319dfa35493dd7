//! Custom-property schema: typed, defaulted attributes a document declares
//! once and every in-scope entity carries.
//!
//! The schema is owned by the graph and handed to entity constructors, so two
//! documents in one process never share definitions.

use indexmap::IndexMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyScope {
    Node,
    Edge,
}

impl PropertyScope {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyScope::Node => "node",
            PropertyScope::Edge => "edge",
        }
    }

    pub fn parse(scope: &str) -> Result<Self> {
        match scope {
            "node" => Ok(PropertyScope::Node),
            "edge" => Ok(PropertyScope::Edge),
            other => Err(Error::InvalidScope {
                scope: other.to_string(),
            }),
        }
    }
}

/// Declared value type. Advisory metadata for the consuming application; the
/// values themselves stay strings at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Int,
    Double,
    Boolean,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Int => "int",
            PropertyType::Double => "double",
            PropertyType::Boolean => "boolean",
        }
    }

    pub fn parse(property_type: &str) -> Result<Self> {
        match property_type {
            "string" => Ok(PropertyType::String),
            "int" => Ok(PropertyType::Int),
            "double" => Ok(PropertyType::Double),
            "boolean" => Ok(PropertyType::Boolean),
            other => Err(Error::InvalidType {
                property_type: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomPropertyDefinition {
    pub scope: PropertyScope,
    pub name: String,
    pub property_type: PropertyType,
    pub default_value: String,
}

impl CustomPropertyDefinition {
    /// Key id used for this property's `key` declaration and `data` elements.
    pub fn key_id(&self) -> String {
        format!("{}_{}", self.scope.as_str(), self.name)
    }
}

/// The document-wide set of custom-property definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySchema {
    definitions: Vec<CustomPropertyDefinition>,
}

impl PropertySchema {
    /// Registers a definition. Redefining an existing (scope, name) pair
    /// replaces the earlier definition in place.
    pub fn define(&mut self, definition: CustomPropertyDefinition) {
        if let Some(existing) = self
            .definitions
            .iter_mut()
            .find(|d| d.scope == definition.scope && d.name == definition.name)
        {
            *existing = definition;
        } else {
            self.definitions.push(definition);
        }
    }

    pub fn definitions(&self) -> &[CustomPropertyDefinition] {
        &self.definitions
    }

    pub fn for_scope(
        &self,
        scope: PropertyScope,
    ) -> impl Iterator<Item = &CustomPropertyDefinition> {
        self.definitions.iter().filter(move |d| d.scope == scope)
    }

    pub fn contains(&self, scope: PropertyScope, name: &str) -> bool {
        self.for_scope(scope).any(|d| d.name == name)
    }

    /// Default value map for a freshly constructed entity of `scope`.
    pub fn defaults_for(&self, scope: PropertyScope) -> IndexMap<String, String> {
        self.for_scope(scope)
            .map(|d| (d.name.clone(), d.default_value.clone()))
            .collect()
    }

    /// Defaults with per-instance overrides applied. Overriding a key the
    /// schema does not declare is an error.
    pub fn values_with_overrides(
        &self,
        scope: PropertyScope,
        overrides: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let mut values = self.defaults_for(scope);
        for (name, value) in overrides {
            if !self.contains(scope, name) {
                return Err(Error::UnknownProperty { name: name.clone() });
            }
            values.insert(name.clone(), value.clone());
        }
        Ok(values)
    }
}
