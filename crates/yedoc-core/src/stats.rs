//! Derived, recomputable indexes over the whole ownership tree.
//!
//! A [`GraphStats`] value is a point-in-time snapshot; it holds no references
//! into the graph and is never updated incrementally. Re-gather after any
//! mutation.

use indexmap::{IndexMap, IndexSet};

use crate::graph::Graph;
use crate::model::{EdgeId, GraphObject, ObjectId, Owner};

/// Any entity, addressed by structural id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphItem {
    Object(ObjectId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Default)]
pub struct GraphStats {
    /// Structural id → handle, for plain nodes, in traversal order.
    pub all_nodes: IndexMap<String, ObjectId>,
    pub all_groups: IndexMap<String, ObjectId>,
    /// Nodes and groups combined.
    pub all_objects: IndexMap<String, ObjectId>,
    pub all_edges: IndexMap<String, EdgeId>,
    /// Every entity in the document.
    pub all_graph_items: IndexMap<String, GraphItem>,
    pub id_to_name: IndexMap<String, String>,
    /// Display name → structural ids sharing it, in traversal order.
    pub name_to_ids: IndexMap<String, Vec<String>>,
    /// Names carried by more than one entity. The reconciliation engine uses
    /// this to decide which names need id disambiguation.
    pub duplicate_names: IndexSet<String>,
}

impl GraphStats {
    pub(crate) fn collect(graph: &Graph) -> Self {
        let mut stats = GraphStats::default();
        stats.collect_level(graph, Owner::Root);
        for (name, ids) in &stats.name_to_ids {
            if ids.len() > 1 {
                stats.duplicate_names.insert(name.clone());
            }
        }
        stats
    }

    fn collect_level(&mut self, graph: &Graph, owner: Owner) {
        for id in graph.children_of(owner) {
            let Some(object) = graph.object(id) else {
                continue;
            };
            let sid = object.structural_id().to_string();
            match object {
                GraphObject::Node(_) => {
                    self.all_nodes.insert(sid.clone(), id);
                }
                GraphObject::Group(_) => {
                    self.all_groups.insert(sid.clone(), id);
                }
            }
            self.all_objects.insert(sid.clone(), id);
            self.all_graph_items
                .insert(sid.clone(), GraphItem::Object(id));
            self.record_name(sid.clone(), object.name());
            if object.is_group() {
                self.collect_level(graph, Owner::Group(id));
            }
        }
        for id in graph.edges_of(owner) {
            let Some(edge) = graph.edge(id) else {
                continue;
            };
            let sid = edge.structural_id().to_string();
            self.all_edges.insert(sid.clone(), id);
            self.all_graph_items.insert(sid.clone(), GraphItem::Edge(id));
            self.record_name(sid, &edge.name);
        }
    }

    fn record_name(&mut self, sid: String, name: &str) {
        self.id_to_name.insert(sid.clone(), name.to_string());
        // Empty names (common for edges) can never resolve by name and are
        // kept out of the name index.
        if !name.is_empty() {
            self.name_to_ids
                .entry(name.to_string())
                .or_default()
                .push(sid);
        }
    }

    pub fn find_object_by_id(&self, sid: &str) -> Option<ObjectId> {
        self.all_objects.get(sid).copied()
    }

    pub fn find_edge_by_id(&self, sid: &str) -> Option<EdgeId> {
        self.all_edges.get(sid).copied()
    }

    /// Structural ids carrying `name`, in traversal order. Empty when the
    /// name is unknown.
    pub fn ids_for_name(&self, name: &str) -> &[String] {
        self.name_to_ids
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_duplicate_name(&self, name: &str) -> bool {
        self.duplicate_names.contains(name)
    }
}
