//! Tabular surface → graph mutations.
//!
//! The input is human-edited and expected to be occasionally messy: row-level
//! problems (missing endpoints, unresolvable names) warn and skip, the batch
//! continues. Schema-level problems fail the batch.

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::warn;

use yedoc_core::{
    EdgeId, EdgeOptions, Graph, GraphStats, GroupOptions, IntegrityMode, NodeOptions, ObjectId,
    Owner, RemovalMode,
};

use crate::error::Result;
use crate::workbook::{EMPTY_GROUP_PLACEHOLDER, NAME_ID_SEPARATOR, SheetData};

/// Structural ids of entities that were destroyed and re-created during the
/// hierarchy pass, mapped to their successor handles. Valid only within the
/// reconciliation transaction that produced it.
pub type IdRemap = IndexMap<String, ObjectId>;

/// What a reconciliation run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub renamed: usize,
    pub reparented: usize,
    pub retyped: usize,
    pub deleted_objects: usize,
    pub edges_created: usize,
    pub edges_updated: usize,
    pub deleted_edges: usize,
    pub skipped_rows: usize,
    pub pruned_edges: usize,
}

#[derive(Debug)]
struct ObjectRow {
    /// 1-based nesting depth recovered from leading empty cells, possibly
    /// repaired by the owner scan.
    indent: usize,
    name: String,
    sid: Option<String>,
    /// A row is a group iff the next row sits strictly deeper. A leaf last
    /// row can never be classified as a group; an empty group that is also
    /// the last row of the sheet is not representable in this encoding.
    is_group: bool,
    owner_row: Option<usize>,
}

fn parse_object_rows(sheet: &SheetData) -> Vec<ObjectRow> {
    let mut rows: Vec<ObjectRow> = Vec::new();
    for cells in sheet.rows.iter().skip(1) {
        let Some(first) = cells.iter().position(|cell| !cell.trim().is_empty()) else {
            continue;
        };
        let name = cells[first].trim().to_string();
        let sid = cells
            .get(first + 1)
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
            .map(str::to_string);
        rows.push(ObjectRow {
            indent: first + 1,
            name,
            sid,
            is_group: false,
            owner_row: None,
        });
    }

    for index in 0..rows.len() {
        let next_indent = rows.get(index + 1).map(|next| next.indent).unwrap_or(0);
        rows[index].is_group = next_indent > rows[index].indent;
    }

    // Owner inference: the nearest earlier group row sitting at a smaller
    // indent. When the gap is more than one level (an empty name cell pushed
    // the row right), repair the recorded indent to owner + 1.
    for index in 0..rows.len() {
        if rows[index].indent == 1 {
            continue;
        }
        let owner = (0..index)
            .rev()
            .find(|&j| rows[j].is_group && rows[j].indent < rows[index].indent);
        match owner {
            Some(j) => {
                rows[index].owner_row = Some(j);
                if rows[j].indent + 1 != rows[index].indent {
                    rows[index].indent = rows[j].indent + 1;
                }
            }
            None => {
                rows[index].indent = 1;
            }
        }
    }
    rows
}

/// The hierarchy pass: replays the edited object sheet onto the graph,
/// inferring creations, renames, re-parentings, container/leaf changes and
/// deletions against the pre-export snapshot. Returns the old-id → successor
/// mapping a following relations pass needs.
pub fn import_objects_and_hierarchy(
    graph: &mut Graph,
    original: &GraphStats,
    sheet: &SheetData,
    report: &mut ReconcileReport,
) -> Result<IdRemap> {
    let rows = parse_object_rows(sheet);
    let mut entities: Vec<Option<ObjectId>> = vec![None; rows.len()];
    let mut visited: HashSet<String> = HashSet::new();
    let mut remap: IdRemap = IdRemap::new();

    for (index, row) in rows.iter().enumerate() {
        if row.name == EMPTY_GROUP_PLACEHOLDER {
            continue;
        }

        let owner = match row.owner_row {
            None => Owner::Root,
            Some(owner_index) => match entities[owner_index] {
                Some(owner_id) if graph.group(owner_id).is_some() => Owner::Group(owner_id),
                _ => {
                    warn!(row = index + 2, name = %row.name, "owner row did not resolve to a group; attaching to root");
                    Owner::Root
                }
            },
        };

        let existing = row.sid.as_deref().and_then(|sid| {
            original
                .all_nodes
                .get(sid)
                .map(|id| (sid, *id, false))
                .or_else(|| original.all_groups.get(sid).map(|id| (sid, *id, true)))
        });

        let resolved = match existing {
            Some((sid, id, _)) if !graph.contains_object(id) || visited.contains(sid) => {
                // The id was already consumed earlier in this batch
                // (duplicated row) or the entity is gone; treat as new.
                None
            }
            other => other,
        };

        match resolved {
            None => {
                let created = if row.is_group {
                    graph.add_group_with(owner, &row.name, GroupOptions::default())
                } else {
                    graph.add_node_with(owner, &row.name, NodeOptions::default())
                };
                match created {
                    Ok(id) => {
                        entities[index] = Some(id);
                        report.created += 1;
                    }
                    Err(err) => {
                        warn!(row = index + 2, name = %row.name, %err, "skipping row");
                        report.skipped_rows += 1;
                    }
                }
            }
            Some((sid, id, was_group)) => {
                visited.insert(sid.to_string());
                if was_group != row.is_group {
                    // Container/leaf change: the old entity no longer stands
                    // for its children, so it is destroyed without healing
                    // and a fresh entity of the new kind takes its place.
                    let removed = if was_group {
                        graph.remove_group(id, RemovalMode::Orphan)
                    } else {
                        graph.remove_node(id)
                    };
                    let recreated = removed.and_then(|_| {
                        if row.is_group {
                            graph.add_group_with(owner, &row.name, GroupOptions::default())
                        } else {
                            graph.add_node_with(owner, &row.name, NodeOptions::default())
                        }
                    });
                    match recreated {
                        Ok(new_id) => {
                            remap.insert(sid.to_string(), new_id);
                            entities[index] = Some(new_id);
                            report.retyped += 1;
                        }
                        Err(err) => {
                            warn!(row = index + 2, name = %row.name, %err, "could not retype row");
                            report.skipped_rows += 1;
                        }
                    }
                } else {
                    let current_owner = graph
                        .object(id)
                        .map(|object| object.owner())
                        .unwrap_or(Owner::Root);
                    if current_owner != owner {
                        let moved = if row.is_group {
                            graph.reparent_group(id, owner)
                        } else {
                            graph.reparent_node(id, owner)
                        };
                        match moved {
                            Ok(()) => report.reparented += 1,
                            Err(err) => {
                                warn!(row = index + 2, name = %row.name, %err, "could not re-parent row");
                                report.skipped_rows += 1;
                                entities[index] = Some(id);
                                continue;
                            }
                        }
                    }
                    let current_name = graph
                        .object(id)
                        .map(|object| object.name().to_string())
                        .unwrap_or_default();
                    if current_name != row.name {
                        graph.rename_object(id, &row.name)?;
                        report.renamed += 1;
                    }
                    entities[index] = Some(id);
                }
            }
        }
    }

    // Entities the sheet no longer mentions are deletions. Groups go without
    // healing: their surviving children were re-owned by their own rows.
    for (sid, id) in &original.all_nodes {
        if !visited.contains(sid) && graph.contains_object(*id) {
            graph.remove_node(*id)?;
            report.deleted_objects += 1;
        }
    }
    for (sid, id) in &original.all_groups {
        if !visited.contains(sid) && graph.contains_object(*id) {
            graph.remove_group(*id, RemovalMode::Orphan)?;
            report.deleted_objects += 1;
        }
    }

    graph.reassign_structural_ids();
    let pruned = graph.run_integrity_rules(IntegrityMode::Auto)?;
    report.pruned_edges += pruned.len();
    Ok(remap)
}

#[derive(Debug, Clone)]
struct CellToken {
    name: String,
    sid: Option<String>,
}

fn parse_token(cell: &str) -> CellToken {
    match cell.split_once(NAME_ID_SEPARATOR) {
        Some((name, sid)) => CellToken {
            name: name.to_string(),
            sid: Some(sid.trim().to_string()),
        },
        None => CellToken {
            name: cell.to_string(),
            sid: None,
        },
    }
}

/// The relations pass: replays the edited relations sheet. Endpoints are
/// assumed already settled by a preceding hierarchy pass; `remap` carries the
/// successors of entities that pass re-created.
pub fn import_relations(
    graph: &mut Graph,
    original: &GraphStats,
    remap: &IdRemap,
    sheet: &SheetData,
    report: &mut ReconcileReport,
) -> Result<()> {
    let current = graph.gather_statistics();
    let mut touched: HashSet<String> = HashSet::new();

    for (index, cells) in sheet.rows.iter().enumerate().skip(1) {
        let cell = |column: usize| cells.get(column).map(|s| s.trim()).unwrap_or("");
        if cell(0).is_empty() || cell(1).is_empty() {
            warn!(row = index + 1, "relation row is missing an endpoint; skipping");
            report.skipped_rows += 1;
            continue;
        }
        let source_token = parse_token(cell(0));
        let target_token = parse_token(cell(1));
        let label_token = parse_token(cell(2));
        let owner_token = parse_token(cell(3));

        let source = resolve_object(graph, original, remap, &current, &source_token);
        let target = resolve_object(graph, original, remap, &current, &target_token);
        let (Some(source), Some(target)) = (source, target) else {
            warn!(row = index + 1, source = %source_token.name, target = %target_token.name,
                "could not resolve both endpoints; skipping relation row");
            report.skipped_rows += 1;
            continue;
        };

        let owner = if owner_token.name.is_empty() && owner_token.sid.is_none() {
            Owner::Root
        } else {
            match resolve_object(graph, original, remap, &current, &owner_token)
                .filter(|id| graph.group(*id).is_some())
            {
                Some(id) => Owner::Group(id),
                None => {
                    warn!(row = index + 1, owner = %owner_token.name,
                        "owning group did not resolve; declaring edge at root");
                    Owner::Root
                }
            }
        };

        match resolve_edge(graph, original, &current, &label_token) {
            Some((original_sid, edge_id)) => {
                touched.insert(original_sid);
                update_edge(graph, edge_id, source, target, &label_token.name, owner);
                report.edges_updated += 1;
            }
            None => {
                // Nesting is deliberately not validated here; the next
                // integrity pass or document open settles it.
                let options = EdgeOptions {
                    name: (!label_token.name.is_empty()).then(|| label_token.name.clone()),
                    ..EdgeOptions::default()
                };
                graph.insert_edge_raw(owner, source, target, options)?;
                report.edges_created += 1;
            }
        }
    }

    // Edges the sheet never mentioned are deletions.
    for (sid, id) in &original.all_edges {
        if !touched.contains(sid) && graph.contains_edge(*id) {
            graph.remove_edge(*id)?;
            report.deleted_edges += 1;
        }
    }
    graph.reassign_structural_ids();
    Ok(())
}

fn update_edge(
    graph: &mut Graph,
    edge_id: EdgeId,
    source: ObjectId,
    target: ObjectId,
    name: &str,
    owner: Owner,
) {
    let (current_owner, current_name) = match graph.edge(edge_id) {
        Some(edge) => (edge.owner(), edge.name.clone()),
        None => return,
    };
    if let Some(edge) = graph.edge_mut(edge_id) {
        edge.set_endpoints(source, target);
    }
    if current_name != name {
        let _ = graph.rename_edge(edge_id, name);
    }
    if current_owner != owner {
        let _ = graph.reparent_edge(edge_id, owner);
    }
}

/// Id lookup against the pre-export snapshot first (following the remap for
/// re-created entities), then a bare-name fallback that only fires when the
/// name was unambiguous at export time and resolves uniquely now.
fn resolve_object(
    graph: &Graph,
    original: &GraphStats,
    remap: &IdRemap,
    current: &GraphStats,
    token: &CellToken,
) -> Option<ObjectId> {
    if let Some(sid) = &token.sid {
        if let Some(id) = original.all_objects.get(sid) {
            if graph.contains_object(*id) {
                return Some(*id);
            }
        }
        if let Some(id) = remap.get(sid) {
            if graph.contains_object(*id) {
                return Some(*id);
            }
        }
        // Ids freshly assigned after the hierarchy pass also appear in the
        // current snapshot; accept them so a re-exported sheet round-trips.
        if let Some(id) = current.all_objects.get(sid) {
            return Some(*id);
        }
    }
    if token.name.is_empty() || original.is_duplicate_name(&token.name) {
        return None;
    }
    let mut matches = current
        .ids_for_name(&token.name)
        .iter()
        .filter_map(|sid| current.all_objects.get(sid).copied());
    match (matches.next(), matches.next()) {
        (Some(id), None) => Some(id),
        _ => None,
    }
}

/// Resolves the edge-label token to an existing edge, returning the edge's
/// snapshot id (for omission tracking) and handle.
fn resolve_edge(
    graph: &Graph,
    original: &GraphStats,
    current: &GraphStats,
    token: &CellToken,
) -> Option<(String, EdgeId)> {
    if let Some(sid) = &token.sid {
        if let Some(id) = original.all_edges.get(sid) {
            if graph.contains_edge(*id) {
                return Some((sid.clone(), *id));
            }
        }
        return None;
    }
    if original.is_duplicate_name(&token.name) {
        return None;
    }
    let mut matches = current
        .ids_for_name(&token.name)
        .iter()
        .filter_map(|sid| current.all_edges.get(sid).copied());
    let edge_id = match (matches.next(), matches.next()) {
        (Some(id), None) => id,
        _ => return None,
    };
    // Recover the snapshot id so omission cleanup spares this edge.
    let original_sid = original
        .all_edges
        .iter()
        .find(|(_, id)| **id == edge_id)
        .map(|(sid, _)| sid.clone())?;
    Some((original_sid, edge_id))
}
