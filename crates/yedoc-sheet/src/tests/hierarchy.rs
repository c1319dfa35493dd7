use crate::import::import_objects_and_hierarchy;
use crate::tests::three_level_graph;
use crate::*;

use yedoc_core::{Graph, GroupOptions, NodeOptions, Owner};

fn objects_rows(graph: &Graph) -> (SheetData, yedoc_core::GraphStats) {
    let exported = export_workbook(graph, SheetMode::ObjectsAndHierarchy).unwrap();
    let sheet = exported.workbook.sheet(OBJECTS_SHEET).unwrap().clone();
    (sheet, exported.snapshot)
}

#[test]
fn unedited_sheet_reimports_to_an_identical_document() {
    let mut graph = three_level_graph();
    let before = graph.stringify();

    let (sheet, snapshot) = objects_rows(&graph);
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(graph.stringify(), before);
    assert_eq!(report, ReconcileReport::default());
}

#[test]
fn renamed_row_renames_the_entity() {
    let mut graph = three_level_graph();
    let (mut sheet, snapshot) = objects_rows(&graph);
    sheet.rows[1][0] = "alpha".to_string();

    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.renamed, 1);
    let stats = graph.gather_statistics();
    assert_eq!(stats.id_to_name["n0"], "alpha");
}

#[test]
fn row_moved_under_another_group_reparents_the_entity() {
    let mut graph = Graph::new();
    let group1 = graph.add_group("group1").unwrap();
    graph
        .add_node_with(Owner::Group(group1), "a", NodeOptions::default())
        .unwrap();
    let b = graph
        .add_node_with(Owner::Group(group1), "b", NodeOptions::default())
        .unwrap();
    let group2 = graph.add_group("group2").unwrap();
    graph
        .add_node_with(Owner::Group(group2), "c", NodeOptions::default())
        .unwrap();

    // group1/a stays; b's row moves under group2.
    let sheet = SheetData {
        name: OBJECTS_SHEET.to_string(),
        rows: vec![
            vec![OBJECTS_HEADER.to_string()],
            vec!["group1".into(), "n0".into()],
            vec!["".into(), "a".into(), "n0::n0".into()],
            vec!["group2".into(), "n1".into()],
            vec!["".into(), "c".into(), "n1::n0".into()],
            vec!["".into(), "b".into(), "n0::n1".into()],
        ],
    };
    let snapshot = graph.gather_statistics();
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.reparented, 1);
    assert_eq!(graph.node(b).unwrap().owner(), Owner::Group(group2));
    // Ids reflect the new positions.
    assert_eq!(graph.node(b).unwrap().structural_id(), "n1::n1");
}

#[test]
fn indenting_rows_under_a_leaf_turns_it_into_a_group() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    graph.add_node("b").unwrap();

    let sheet = SheetData {
        name: OBJECTS_SHEET.to_string(),
        rows: vec![
            vec![OBJECTS_HEADER.to_string()],
            vec!["a".into(), "n0".into()],
            vec!["".into(), "child".into()],
            vec!["b".into(), "n1".into()],
        ],
    };
    let snapshot = graph.gather_statistics();
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.retyped, 1);
    assert_eq!(report.created, 1);
    // The old leaf handle is gone; a group with the same name replaced it
    // and the new child row landed inside it.
    assert!(!graph.contains_object(a));
    let new_a = graph.find_object_by_name("a").unwrap();
    assert!(graph.group(new_a).is_some());
    let child = graph.find_object_by_name("child").unwrap();
    assert_eq!(graph.node(child).unwrap().owner(), Owner::Group(new_a));
}

#[test]
fn group_row_without_deeper_rows_becomes_a_leaf() {
    let mut graph = Graph::new();
    let group = graph.add_group("box").unwrap();
    let inner = graph
        .add_node_with(Owner::Group(group), "inner", NodeOptions::default())
        .unwrap();

    // The inner row is dropped: "box" no longer has anything indented under
    // it, so it reads back as a plain node and its child is an omission.
    let sheet = SheetData {
        name: OBJECTS_SHEET.to_string(),
        rows: vec![
            vec![OBJECTS_HEADER.to_string()],
            vec!["box".into(), "n0".into()],
        ],
    };
    let snapshot = graph.gather_statistics();
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.retyped, 1);
    assert_eq!(report.deleted_objects, 1);
    assert!(!graph.contains_object(group));
    assert!(!graph.contains_object(inner));
    let stats = graph.gather_statistics();
    assert!(graph.node(stats.find_object_by_id("n0").unwrap()).is_some());
}

#[test]
fn omitted_rows_are_deletions_and_strand_their_edges() {
    let mut graph = three_level_graph();
    let stats = graph.gather_statistics();
    let a = stats.find_object_by_id("n0").unwrap();
    let b = stats.find_object_by_id("n1").unwrap();
    graph.add_edge(a, b).unwrap();

    let (mut sheet, snapshot) = objects_rows(&graph);
    // Drop the row for b.
    sheet.rows.remove(2);

    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.deleted_objects, 1);
    assert_eq!(report.pruned_edges, 1);
    assert!(!graph.contains_object(b));
    assert!(graph.gather_statistics().all_edges.is_empty());
}

#[test]
fn rows_without_ids_create_new_entities() {
    let mut graph = three_level_graph();
    let (mut sheet, snapshot) = objects_rows(&graph);
    sheet.rows.push(vec!["fresh".to_string()]);

    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.created, 1);
    let id = graph.find_object_by_name("fresh").unwrap();
    assert_eq!(graph.node(id).unwrap().owner(), Owner::Root);
}

#[test]
fn placeholder_rows_keep_empty_groups_alive_without_creating_entities() {
    let mut graph = Graph::new();
    graph.add_group("empty").unwrap();
    graph.add_node("tail").unwrap();
    let before = graph.stringify();

    let (sheet, snapshot) = objects_rows(&graph);
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report, ReconcileReport::default());
    assert_eq!(graph.stringify(), before);
}

#[test]
fn misaligned_indent_is_repaired_against_the_nearest_group() {
    let mut graph = Graph::new();
    let group = graph.add_group("group1").unwrap();
    graph
        .add_node_with(Owner::Group(group), "a", NodeOptions::default())
        .unwrap();

    // "skewed" sits two levels deeper than its only possible owner; the
    // import treats group1 as the owner and pulls the indent back in.
    let sheet = SheetData {
        name: OBJECTS_SHEET.to_string(),
        rows: vec![
            vec![OBJECTS_HEADER.to_string()],
            vec!["group1".into(), "n0".into()],
            vec!["".into(), "a".into(), "n0::n0".into()],
            vec!["".into(), "".into(), "skewed".into()],
        ],
    };
    let snapshot = graph.gather_statistics();
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.created, 1);
    let skewed = graph.find_object_by_name("skewed").unwrap();
    assert_eq!(graph.node(skewed).unwrap().owner(), Owner::Group(group));
}

#[test]
fn hierarchy_edits_compose_with_group_subtrees() {
    // Moving a whole group row (with its children) under another group.
    let mut graph = Graph::new();
    let g1 = graph.add_group("g1").unwrap();
    let inner = graph
        .add_group_with(Owner::Group(g1), "inner", GroupOptions::default())
        .unwrap();
    let leaf = graph
        .add_node_with(Owner::Group(inner), "leaf", NodeOptions::default())
        .unwrap();
    let g2 = graph.add_group("g2").unwrap();
    graph
        .add_node_with(Owner::Group(g2), "keep", NodeOptions::default())
        .unwrap();

    let sheet = SheetData {
        name: OBJECTS_SHEET.to_string(),
        rows: vec![
            vec![OBJECTS_HEADER.to_string()],
            vec!["g1".into(), "n0".into()],
            vec!["".into(), EMPTY_GROUP_PLACEHOLDER.into()],
            vec!["g2".into(), "n1".into()],
            vec!["".into(), "keep".into(), "n1::n0".into()],
            vec!["".into(), "inner".into(), "n0::n0".into()],
            vec!["".into(), "".into(), "leaf".into(), "n0::n0::n0".into()],
        ],
    };
    let snapshot = graph.gather_statistics();
    let mut report = ReconcileReport::default();
    import_objects_and_hierarchy(&mut graph, &snapshot, &sheet, &mut report).unwrap();

    assert_eq!(report.reparented, 1);
    assert_eq!(graph.group(inner).unwrap().owner(), Owner::Group(g2));
    assert_eq!(graph.node(leaf).unwrap().owner(), Owner::Group(inner));
    assert!(graph.group(g1).is_some());
}
