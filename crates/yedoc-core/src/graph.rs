//! The document aggregate: owns every entity, enforces the ownership and
//! nesting rules, and drives whole-document operations.

use std::path::Path;

use indexmap::IndexMap;
use tracing::warn;

use crate::codec;
use crate::document::{DocumentFile, PersistOptions};
use crate::error::{Error, Result};
use crate::model::{Edge, EdgeId, EdgeOptions, GraphObject, Group, GroupOptions, Node, NodeOptions, ObjectId, Owner};
use crate::properties::{CustomPropertyDefinition, PropertySchema, PropertyScope, PropertyType};
use crate::stats::GraphStats;
use crate::xml::XmlElement;

/// How `remove_group` treats the removed group's dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMode {
    /// Re-parent child nodes, groups and edges to the removed group's owner.
    Heal,
    /// Leave dependents to the caller. Used mid-batch by reconciliation,
    /// where every dependent is re-owned or removed in the same transaction.
    Orphan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityMode {
    /// Remove stranded edges.
    Auto,
    /// Signal stranded edges for external resolution.
    Manual,
}

#[derive(Debug, Clone)]
pub struct Graph {
    /// `edgedefault` of the document root: `directed` or `undirected`.
    pub directed: String,
    pub graph_id: String,
    schema: PropertySchema,
    objects: IndexMap<ObjectId, GraphObject>,
    edges: IndexMap<EdgeId, Edge>,
    next_object_id: u64,
    next_edge_id: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::with_id("directed", "G")
    }

    pub fn with_id(directed: impl Into<String>, graph_id: impl Into<String>) -> Self {
        Self {
            directed: directed.into(),
            graph_id: graph_id.into(),
            schema: PropertySchema::default(),
            objects: IndexMap::new(),
            edges: IndexMap::new(),
            next_object_id: 0,
            next_edge_id: 0,
        }
    }

    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    // ------------------------------------------------------------------
    // Add protocol
    // ------------------------------------------------------------------

    pub fn add_node(&mut self, name: impl Into<String>) -> Result<ObjectId> {
        self.add_node_with(Owner::Root, name, NodeOptions::default())
    }

    pub fn add_node_with(
        &mut self,
        owner: Owner,
        name: impl Into<String>,
        options: NodeOptions,
    ) -> Result<ObjectId> {
        self.check_owner(owner)?;
        let mut node = Node::new(name, options, &self.schema)?;
        node.set_owner(owner);
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(id, GraphObject::Node(node));
        self.reassign_structural_ids();
        Ok(id)
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> Result<ObjectId> {
        self.add_group_with(Owner::Root, name, GroupOptions::default())
    }

    pub fn add_group_with(
        &mut self,
        owner: Owner,
        name: impl Into<String>,
        options: GroupOptions,
    ) -> Result<ObjectId> {
        self.check_owner(owner)?;
        let mut group = Group::new(name, options, &self.schema)?;
        group.set_owner(owner);
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.objects.insert(id, GraphObject::Group(group));
        self.reassign_structural_ids();
        Ok(id)
    }

    pub fn add_edge(&mut self, source: ObjectId, target: ObjectId) -> Result<EdgeId> {
        self.add_edge_with(Owner::Root, source, target, EdgeOptions::default())
    }

    /// Adds an edge under `owner`, which must be a common ancestor of both
    /// endpoints (the nesting rule of the interchange format).
    pub fn add_edge_with(
        &mut self,
        owner: Owner,
        source: ObjectId,
        target: ObjectId,
        options: EdgeOptions,
    ) -> Result<EdgeId> {
        self.check_endpoint(source)?;
        self.check_endpoint(target)?;
        if let Owner::Group(group_id) = owner {
            if !self.is_ancestor(group_id, source) || !self.is_ancestor(group_id, target) {
                let group_name = self.object(group_id).map(GraphObject::name).unwrap_or("?");
                return Err(Error::structural(format!(
                    "group '{group_name}' is not an ancestor of both edge endpoints"
                )));
            }
        }
        self.insert_edge_raw(owner, source, target, options)
    }

    /// Adds an edge without the common-ancestor check. Bulk reconciliation
    /// uses this; nesting is re-checked by the next integrity pass or
    /// document open.
    pub fn insert_edge_raw(
        &mut self,
        owner: Owner,
        source: ObjectId,
        target: ObjectId,
        options: EdgeOptions,
    ) -> Result<EdgeId> {
        self.check_owner(owner)?;
        self.check_endpoint(source)?;
        self.check_endpoint(target)?;
        let mut edge = Edge::new(source, target, options, &self.schema)?;
        edge.set_owner(owner);
        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.insert(id, edge);
        self.reassign_structural_ids();
        Ok(id)
    }

    /// Adds an edge by endpoint display names, creating missing endpoints as
    /// plain nodes under the edge's owner.
    pub fn connect(
        &mut self,
        owner: Owner,
        source_name: &str,
        target_name: &str,
        options: EdgeOptions,
    ) -> Result<EdgeId> {
        let source = match self.find_object_by_name(source_name) {
            Some(id) => id,
            None => self.add_node_with(owner, source_name, NodeOptions::default())?,
        };
        let target = match self.find_object_by_name(target_name) {
            Some(id) => id,
            None => self.add_node_with(owner, target_name, NodeOptions::default())?,
        };
        self.add_edge_with(owner, source, target, options)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn object(&self, id: ObjectId) -> Option<&GraphObject> {
        self.objects.get(&id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GraphObject> {
        self.objects.get_mut(&id)
    }

    pub fn node(&self, id: ObjectId) -> Option<&Node> {
        self.objects.get(&id).and_then(GraphObject::as_node)
    }

    pub fn node_mut(&mut self, id: ObjectId) -> Option<&mut Node> {
        match self.objects.get_mut(&id) {
            Some(GraphObject::Node(node)) => Some(node),
            _ => None,
        }
    }

    pub fn group(&self, id: ObjectId) -> Option<&Group> {
        self.objects.get(&id).and_then(GraphObject::as_group)
    }

    pub fn group_mut(&mut self, id: ObjectId) -> Option<&mut Group> {
        match self.objects.get_mut(&id) {
            Some(GraphObject::Group(group)) => Some(group),
            _ => None,
        }
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &GraphObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    /// Child nodes and groups of `owner`, in creation order.
    pub fn children_of(&self, owner: Owner) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| object.owner() == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Edges declared under `owner`, in creation order.
    pub fn edges_of(&self, owner: Owner) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, edge)| edge.owner() == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    /// First object (creation order) with the given display name.
    pub fn find_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name() == name)
            .map(|(id, _)| *id)
    }

    /// Walks the owner chain of `entity`; true when `ancestor` appears in it.
    /// Irreflexive: an entity is never its own ancestor.
    pub fn is_ancestor(&self, ancestor: ObjectId, entity: ObjectId) -> bool {
        let mut current = match self.objects.get(&entity) {
            Some(object) => object.owner(),
            None => return false,
        };
        loop {
            match current {
                Owner::Root => return false,
                Owner::Group(id) if id == ancestor => return true,
                Owner::Group(id) => match self.objects.get(&id) {
                    Some(object) => current = object.owner(),
                    None => return false,
                },
            }
        }
    }

    // ------------------------------------------------------------------
    // Rename / re-parent / remove
    // ------------------------------------------------------------------

    pub fn rename_object(&mut self, id: ObjectId, name: &str) -> Result<()> {
        match self.objects.get_mut(&id) {
            Some(object) => {
                object.rename(name);
                Ok(())
            }
            None => Err(self.unknown_object(id)),
        }
    }

    pub fn rename_edge(&mut self, id: EdgeId, name: &str) -> Result<()> {
        match self.edges.get_mut(&id) {
            Some(edge) => {
                edge.rename(name);
                Ok(())
            }
            None => Err(self.unknown_edge(id)),
        }
    }

    /// Re-parents a node: non-healing removal from the old owner plus re-add
    /// at the end of the new owner's children.
    pub fn reparent_node(&mut self, id: ObjectId, new_owner: Owner) -> Result<()> {
        if self.node(id).is_none() {
            return Err(self.unknown_object(id));
        }
        self.check_owner(new_owner)?;
        self.move_object(id, new_owner);
        Ok(())
    }

    /// Re-parents a group; its subtree follows. Fails when the group would
    /// become its own descendant.
    pub fn reparent_group(&mut self, id: ObjectId, new_owner: Owner) -> Result<()> {
        if self.group(id).is_none() {
            return Err(self.unknown_object(id));
        }
        self.check_owner(new_owner)?;
        if let Owner::Group(target) = new_owner {
            if target == id || self.is_ancestor(id, target) {
                let name = self.object(id).map(GraphObject::name).unwrap_or("?");
                return Err(Error::structural(format!(
                    "group '{name}' cannot become its own descendant"
                )));
            }
        }
        self.move_object(id, new_owner);
        Ok(())
    }

    /// Re-parents an edge. The common-ancestor rule is deliberately not
    /// re-checked here; reconciliation defers it to the integrity pass.
    pub fn reparent_edge(&mut self, id: EdgeId, new_owner: Owner) -> Result<()> {
        if !self.edges.contains_key(&id) {
            return Err(self.unknown_edge(id));
        }
        self.check_owner(new_owner)?;
        if let Some(mut edge) = self.edges.shift_remove(&id) {
            edge.set_owner(new_owner);
            self.edges.insert(id, edge);
        }
        self.reassign_structural_ids();
        Ok(())
    }

    pub fn remove_node(&mut self, id: ObjectId) -> Result<()> {
        if self.node(id).is_none() {
            return Err(self.unknown_object(id));
        }
        self.objects.shift_remove(&id);
        self.reassign_structural_ids();
        Ok(())
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<()> {
        if self.edges.shift_remove(&id).is_none() {
            return Err(self.unknown_edge(id));
        }
        self.reassign_structural_ids();
        Ok(())
    }

    pub fn remove_group(&mut self, id: ObjectId, mode: RemovalMode) -> Result<()> {
        let Some(group) = self.group(id) else {
            return Err(self.unknown_object(id));
        };
        let heal_target = group.owner();
        self.objects.shift_remove(&id);
        if mode == RemovalMode::Heal {
            let orphaned_owner = Owner::Group(id);
            for object in self.objects.values_mut() {
                if object.owner() == orphaned_owner {
                    object.set_owner(heal_target);
                }
            }
            for edge in self.edges.values_mut() {
                if edge.owner() == orphaned_owner {
                    edge.set_owner(heal_target);
                }
            }
        }
        self.reassign_structural_ids();
        Ok(())
    }

    fn move_object(&mut self, id: ObjectId, new_owner: Owner) {
        if let Some(mut object) = self.objects.shift_remove(&id) {
            object.set_owner(new_owner);
            self.objects.insert(id, object);
        }
        self.reassign_structural_ids();
    }

    // ------------------------------------------------------------------
    // Custom properties
    // ------------------------------------------------------------------

    /// Registers a custom-property definition and back-fills the default
    /// value onto every existing in-scope entity. Groups share the node
    /// scope, since they render as nodes.
    pub fn define_custom_property(
        &mut self,
        scope: &str,
        name: &str,
        property_type: &str,
        default_value: &str,
    ) -> Result<()> {
        let scope = PropertyScope::parse(scope)?;
        let property_type = PropertyType::parse(property_type)?;
        self.schema.define(CustomPropertyDefinition {
            scope,
            name: name.to_string(),
            property_type,
            default_value: default_value.to_string(),
        });
        match scope {
            PropertyScope::Node => {
                for object in self.objects.values_mut() {
                    let properties = match object {
                        GraphObject::Node(node) => &mut node.properties,
                        GraphObject::Group(group) => &mut group.properties,
                    };
                    properties
                        .entry(name.to_string())
                        .or_insert_with(|| default_value.to_string());
                }
            }
            PropertyScope::Edge => {
                for edge in self.edges.values_mut() {
                    edge.properties
                        .entry(name.to_string())
                        .or_insert_with(|| default_value.to_string());
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural ids
    // ------------------------------------------------------------------

    /// Recomputes every positional structural id from scratch: per owner,
    /// nodes and groups share one `n{i}` sequence in creation order, edges
    /// get `e{j}`, and nested entities carry their owner chain as a prefix.
    pub fn reassign_structural_ids(&mut self) {
        self.reassign_level(Owner::Root, "");
    }

    fn reassign_level(&mut self, owner: Owner, prefix: &str) {
        let children = self.children_of(owner);
        for (index, id) in children.iter().enumerate() {
            let sid = if prefix.is_empty() {
                format!("n{index}")
            } else {
                format!("{prefix}::n{index}")
            };
            let is_group = {
                let object = self
                    .objects
                    .get_mut(id)
                    .expect("child listed for owner must exist");
                object.set_structural_id(sid.clone());
                object.is_group()
            };
            if is_group {
                self.reassign_level(Owner::Group(*id), &sid);
            }
        }
        let edges = self.edges_of(owner);
        for (index, id) in edges.iter().enumerate() {
            let sid = if prefix.is_empty() {
                format!("e{index}")
            } else {
                format!("{prefix}::e{index}")
            };
            if let Some(edge) = self.edges.get_mut(id) {
                edge.set_structural_id(sid);
            }
        }
    }

    // ------------------------------------------------------------------
    // Integrity and statistics
    // ------------------------------------------------------------------

    /// Detects edges that lost an endpoint, or whose owning container is no
    /// longer reachable. Auto mode removes them and reports what was removed.
    pub fn run_integrity_rules(&mut self, mode: IntegrityMode) -> Result<Vec<EdgeId>> {
        match mode {
            IntegrityMode::Manual => Err(Error::Unsupported {
                feature: "manual integrity correction".to_string(),
            }),
            IntegrityMode::Auto => {
                let stranded: Vec<EdgeId> = self
                    .edges
                    .iter()
                    .filter(|(_, edge)| {
                        let owner_gone = match edge.owner() {
                            Owner::Root => false,
                            Owner::Group(id) => !self.objects.contains_key(&id),
                        };
                        owner_gone
                            || !self.objects.contains_key(&edge.source())
                            || !self.objects.contains_key(&edge.target())
                    })
                    .map(|(id, _)| *id)
                    .collect();
                for id in &stranded {
                    self.edges.shift_remove(id);
                }
                if !stranded.is_empty() {
                    self.reassign_structural_ids();
                }
                Ok(stranded)
            }
        }
    }

    pub fn gather_statistics(&self) -> GraphStats {
        GraphStats::collect(self)
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Builds the full document element tree: namespace declarations, the
    /// fixed key block (with one key per custom property), then the root
    /// graph with nodes, groups and edges in that order.
    pub fn construct_document(&self) -> XmlElement {
        let mut root = XmlElement::new("graphml")
            .attr("xmlns", "http://graphml.graphdrawing.org/xmlns")
            .attr("xmlns:java", "http://www.yworks.com/xml/yfiles-common/1.0/java")
            .attr(
                "xmlns:sys",
                "http://www.yworks.com/xml/yfiles-common/markup/primitives/2.0",
            )
            .attr("xmlns:x", "http://www.yworks.com/xml/yfiles-common/markup/2.0")
            .attr("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance")
            .attr("xmlns:y", "http://www.yworks.com/xml/graphml")
            .attr("xmlns:yed", "http://www.yworks.com/xml/yed/3")
            .attr(
                "xsi:schemaLocation",
                "http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd",
            );

        root.push_child(
            XmlElement::new("key")
                .attr("id", "data_node")
                .attr("for", "node")
                .attr("yfiles.type", "nodegraphics"),
        );
        root.push_child(
            XmlElement::new("key")
                .attr("id", "url_node")
                .attr("for", "node")
                .attr("attr.name", "url")
                .attr("attr.type", "string"),
        );
        root.push_child(
            XmlElement::new("key")
                .attr("id", "description_node")
                .attr("for", "node")
                .attr("attr.name", "description")
                .attr("attr.type", "string"),
        );
        root.push_child(
            XmlElement::new("key")
                .attr("id", "url_edge")
                .attr("for", "edge")
                .attr("attr.name", "url")
                .attr("attr.type", "string"),
        );
        root.push_child(
            XmlElement::new("key")
                .attr("id", "description_edge")
                .attr("for", "edge")
                .attr("attr.name", "description")
                .attr("attr.type", "string"),
        );
        for definition in self.schema.definitions() {
            root.push_child(
                XmlElement::new("key")
                    .attr("id", definition.key_id())
                    .attr("for", definition.scope.as_str())
                    .attr("attr.name", &definition.name)
                    .attr("attr.type", definition.property_type.as_str()),
            );
        }
        root.push_child(
            XmlElement::new("key")
                .attr("id", "data_edge")
                .attr("for", "edge")
                .attr("yfiles.type", "edgegraphics"),
        );

        let mut graph = XmlElement::new("graph")
            .attr("edgedefault", &self.directed)
            .attr("id", &self.graph_id);
        for child in self.serialize_children(Owner::Root) {
            graph.push_child(child);
        }
        root.child(graph)
    }

    fn serialize_children(&self, owner: Owner) -> Vec<XmlElement> {
        let mut out = Vec::new();
        let children = self.children_of(owner);
        for id in &children {
            if let Some(GraphObject::Node(node)) = self.objects.get(id) {
                out.push(node.to_xml_element(&self.schema));
            }
        }
        for id in &children {
            if let Some(GraphObject::Group(group)) = self.objects.get(id) {
                out.push(group.to_xml_element(&self.schema, self.serialize_children(Owner::Group(*id))));
            }
        }
        for id in self.edges_of(owner) {
            let Some(edge) = self.edges.get(&id) else {
                continue;
            };
            let endpoints = self
                .objects
                .get(&edge.source())
                .zip(self.objects.get(&edge.target()));
            match endpoints {
                Some((source, target)) => {
                    out.push(edge.to_xml_element(
                        &self.schema,
                        source.structural_id(),
                        target.structural_id(),
                    ));
                }
                None => {
                    // Stranded edge awaiting the integrity pass.
                    warn!(edge = %edge.structural_id(), "skipping edge with missing endpoint during serialization");
                }
            }
        }
        out
    }

    pub fn stringify(&self) -> String {
        self.construct_document().to_compact_string()
    }

    /// Writes the document to disk. Refuses to clobber an existing file
    /// unless `overwrite` is set.
    pub fn persist(
        &self,
        path: impl AsRef<Path>,
        options: PersistOptions,
    ) -> Result<DocumentFile> {
        let file = DocumentFile::new(path);
        if file.exists() && !options.overwrite {
            return Err(Error::FileExists {
                path: file.path().to_path_buf(),
            });
        }
        let document = self.construct_document();
        let text = if options.pretty {
            document.to_pretty_string()
        } else {
            document.to_compact_string()
        };
        std::fs::write(file.path(), text)?;
        Ok(file)
    }

    /// Parses an existing document into a fresh graph. The document's
    /// source-local ids are used to stitch cross-references, then discarded;
    /// structural ids are reassigned.
    pub fn load(path: impl AsRef<Path>) -> Result<Graph> {
        codec::load_document(path.as_ref())
    }

    pub(crate) fn schema_mut(&mut self) -> &mut PropertySchema {
        &mut self.schema
    }

    // ------------------------------------------------------------------
    // Internal checks
    // ------------------------------------------------------------------

    fn check_owner(&self, owner: Owner) -> Result<()> {
        match owner {
            Owner::Root => Ok(()),
            Owner::Group(id) => match self.objects.get(&id) {
                Some(GraphObject::Group(_)) => Ok(()),
                Some(GraphObject::Node(node)) => Err(Error::structural(format!(
                    "'{}' is a plain node and cannot own entities",
                    node.name
                ))),
                None => Err(self.unknown_object(id)),
            },
        }
    }

    fn check_endpoint(&self, id: ObjectId) -> Result<()> {
        if self.objects.contains_key(&id) {
            Ok(())
        } else {
            Err(self.unknown_object(id))
        }
    }

    fn unknown_object(&self, id: ObjectId) -> Error {
        Error::EntityNotFound {
            entity: format!("object #{}", id.0),
        }
    }

    fn unknown_edge(&self, id: EdgeId) -> Error {
        Error::EntityNotFound {
            entity: format!("edge #{}", id.0),
        }
    }
}
