//! Graph → tabular surface.

use yedoc_core::{Graph, GraphStats, Owner};

use crate::error::{Error, Result};
use crate::workbook::{
    EMPTY_GROUP_PLACEHOLDER, NAME_ID_SEPARATOR, OBJECTS_HEADER, OBJECTS_SHEET, RELATIONS_HEADER,
    RELATIONS_SHEET, SheetData, WorkbookData,
};

/// What a bulk-edit round-trip covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetMode {
    /// Object rows with indentation encoding the ownership tree.
    ObjectsAndHierarchy,
    /// Edge rows: endpoints, label, owning group.
    Relations,
    /// Per-object attribute editing. Declared, not implemented.
    ObjectData,
}

/// A written template plus the statistics snapshot it was built from. The
/// snapshot is the identity baseline for the whole round-trip and must be the
/// one handed to the import passes.
#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub workbook: WorkbookData,
    pub snapshot: GraphStats,
}

pub fn export_workbook(graph: &Graph, mode: SheetMode) -> Result<ExportedWorkbook> {
    if mode == SheetMode::ObjectData {
        return Err(Error::Unsupported {
            feature: "object data reconciliation".to_string(),
        });
    }
    let snapshot = graph.gather_statistics();

    let mut objects = SheetData::new(OBJECTS_SHEET);
    objects.push_row(vec![OBJECTS_HEADER.to_string()]);
    append_object_rows(graph, Owner::Root, 1, &mut objects.rows);

    let mut relations = SheetData::new(RELATIONS_SHEET);
    relations.push_row(RELATIONS_HEADER.iter().map(|s| s.to_string()).collect());
    if mode == SheetMode::Relations {
        append_relation_rows(graph, &snapshot, &mut relations.rows);
    }

    Ok(ExportedWorkbook {
        workbook: WorkbookData {
            sheets: vec![objects, relations],
        },
        snapshot,
    })
}

/// Emits one row per node/group, name at the column matching its depth and
/// the structural id in the cell after it. An accumulator (`rows`) threads
/// through the recursion; the return value is implicit in its growth.
fn append_object_rows(graph: &Graph, owner: Owner, indent: usize, rows: &mut Vec<Vec<String>>) {
    for id in graph.children_of(owner) {
        let Some(object) = graph.object(id) else {
            continue;
        };
        let mut row = vec![String::new(); indent - 1];
        row.push(object.name().to_string());
        row.push(object.structural_id().to_string());
        rows.push(row);
        if object.is_group() {
            let before = rows.len();
            append_object_rows(graph, Owner::Group(id), indent + 1, rows);
            if rows.len() == before {
                // Nothing indented under the group: mark it with a
                // placeholder so re-parsing still sees a container.
                let mut placeholder = vec![String::new(); indent];
                placeholder.push(EMPTY_GROUP_PLACEHOLDER.to_string());
                rows.push(placeholder);
            }
        }
    }
}

fn append_relation_rows(graph: &Graph, snapshot: &GraphStats, rows: &mut Vec<Vec<String>>) {
    for (sid, edge_id) in &snapshot.all_edges {
        let Some(edge) = graph.edge(*edge_id) else {
            continue;
        };
        let endpoints = graph
            .object(edge.source())
            .zip(graph.object(edge.target()));
        let Some((source, target)) = endpoints else {
            continue;
        };
        let owner_cell = match edge.owner() {
            Owner::Root => String::new(),
            Owner::Group(group_id) => graph
                .object(group_id)
                .map(|group| disambiguate(snapshot, group.name(), group.structural_id()))
                .unwrap_or_default(),
        };
        rows.push(vec![
            disambiguate(snapshot, source.name(), source.structural_id()),
            disambiguate(snapshot, target.name(), target.structural_id()),
            disambiguate(snapshot, &edge.name, sid),
            owner_cell,
        ]);
    }
}

/// Emits `name | id` when the bare name would not re-resolve uniquely: shared
/// by another entity, or empty altogether.
fn disambiguate(snapshot: &GraphStats, name: &str, sid: &str) -> String {
    if name.is_empty() || snapshot.is_duplicate_name(name) {
        format!("{name}{NAME_ID_SEPARATOR}{sid}")
    } else {
        name.to_string()
    }
}
