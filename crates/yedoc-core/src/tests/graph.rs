use crate::*;

#[test]
fn structural_ids_share_one_counter_per_level() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    graph
        .node_mut(a)
        .unwrap()
        .add_label("a2", NodeLabelOptions::default())
        .unwrap();
    let edge1 = graph
        .connect(
            Owner::Root,
            "b",
            "c",
            EdgeOptions {
                name: Some("d".to_string()),
                ..EdgeOptions::default()
            },
        )
        .unwrap();
    let group1 = graph.add_group("e").unwrap();
    let edge2 = graph
        .connect(
            Owner::Group(group1),
            "f",
            "g",
            EdgeOptions {
                name: Some("h".to_string()),
                ..EdgeOptions::default()
            },
        )
        .unwrap();

    let node_a = graph.node(a).unwrap();
    assert_eq!(node_a.structural_id(), "n0");
    assert_eq!(node_a.labels[0].text(), "a");
    assert_eq!(node_a.labels[1].text(), "a2");

    // "b" and "c" were auto-created before the group, so the group takes n3.
    assert_eq!(graph.group(group1).unwrap().structural_id(), "n3");

    let e1 = graph.edge(edge1).unwrap();
    assert_eq!(e1.structural_id(), "e0");
    assert_eq!(e1.name, "d");
    assert_eq!(e1.labels[0].text(), "d");

    let e2 = graph.edge(edge2).unwrap();
    assert_eq!(e2.structural_id(), "n3::e0");
    assert_eq!(e2.name, "h");

    assert_eq!(
        graph.node(graph.find_object_by_name("f").unwrap()).unwrap().structural_id(),
        "n3::n0"
    );
}

#[test]
fn duplicate_display_names_are_allowed() {
    let mut graph = Graph::new();
    let first = graph.add_node("a").unwrap();
    let second = graph.add_node("a").unwrap();
    assert_ne!(first, second);
    assert_eq!(graph.gather_statistics().all_nodes.len(), 2);
}

#[test]
fn edge_owner_must_be_common_ancestor() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    let b = graph.add_node("b").unwrap();
    graph.add_edge(a, b).unwrap();

    let g1 = graph.add_group("g1").unwrap();
    let g1n1 = graph
        .add_node_with(Owner::Group(g1), "g1n1", NodeOptions::default())
        .unwrap();
    let g1n2 = graph
        .add_node_with(Owner::Group(g1), "g1n2", NodeOptions::default())
        .unwrap();
    let g2 = graph
        .add_group_with(Owner::Group(g1), "g2", GroupOptions::default())
        .unwrap();
    let g2n1 = graph
        .add_node_with(Owner::Group(g2), "g2n1", NodeOptions::default())
        .unwrap();
    let g2n2 = graph
        .add_node_with(Owner::Group(g2), "g2n2", NodeOptions::default())
        .unwrap();

    // Within one container.
    graph
        .add_edge_with(Owner::Group(g1), g1n1, g1n2, EdgeOptions::default())
        .unwrap();
    // Self edge.
    graph
        .add_edge_with(Owner::Group(g2), g2n2, g2n2, EdgeOptions::default())
        .unwrap();
    // Any ancestor of both endpoints qualifies, including the root.
    graph.add_edge(g2n1, g2n2).unwrap();
    graph
        .add_edge_with(Owner::Group(g1), g2n1, g2n2, EdgeOptions::default())
        .unwrap();

    // A container unrelated to an endpoint does not.
    let g3 = graph
        .add_group_with(Owner::Group(g1), "g3", GroupOptions::default())
        .unwrap();
    let err = graph
        .add_edge_with(Owner::Group(g3), g2n1, g2n2, EdgeOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::StructuralConstraint { .. }));

    // The failed call must not have left a partial edge behind.
    assert!(graph.edges_of(Owner::Group(g3)).is_empty());
}

#[test]
fn is_ancestor_is_irreflexive_and_walks_the_owner_chain() {
    let mut graph = Graph::new();
    let g1 = graph.add_group("g1").unwrap();
    let g2 = graph
        .add_group_with(Owner::Group(g1), "g2", GroupOptions::default())
        .unwrap();
    let leaf = graph
        .add_node_with(Owner::Group(g2), "leaf", NodeOptions::default())
        .unwrap();

    assert!(graph.is_ancestor(g1, g2));
    assert!(graph.is_ancestor(g1, leaf));
    assert!(graph.is_ancestor(g2, leaf));
    assert!(!graph.is_ancestor(g2, g1));
    assert!(!graph.is_ancestor(g1, g1));
}

#[test]
fn group_cannot_become_its_own_descendant() {
    let mut graph = Graph::new();
    let g1 = graph.add_group("g1").unwrap();
    let g2 = graph
        .add_group_with(Owner::Group(g1), "g2", GroupOptions::default())
        .unwrap();

    let err = graph.reparent_group(g1, Owner::Group(g2)).unwrap_err();
    assert!(matches!(err, Error::StructuralConstraint { .. }));
    let err = graph.reparent_group(g1, Owner::Group(g1)).unwrap_err();
    assert!(matches!(err, Error::StructuralConstraint { .. }));

    // Ownership is unchanged after the failed moves.
    assert_eq!(graph.group(g1).unwrap().owner(), Owner::Root);
}

#[test]
fn reparenting_a_group_moves_its_subtree() {
    let mut graph = Graph::new();
    let g1 = graph.add_group("g1").unwrap();
    let g2 = graph.add_group("g2").unwrap();
    let inner = graph
        .add_group_with(Owner::Group(g1), "inner", GroupOptions::default())
        .unwrap();
    let leaf = graph
        .add_node_with(Owner::Group(inner), "leaf", NodeOptions::default())
        .unwrap();

    graph.reparent_group(inner, Owner::Group(g2)).unwrap();

    assert_eq!(graph.group(inner).unwrap().owner(), Owner::Group(g2));
    assert_eq!(graph.node(leaf).unwrap().owner(), Owner::Group(inner));
    assert_eq!(graph.node(leaf).unwrap().structural_id(), "n1::n0::n0");
}

#[test]
fn healing_group_removal_reparents_dependents_to_the_removed_groups_owner() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    let b = graph.add_node("b").unwrap();
    graph.add_node("c").unwrap();
    graph.add_edge(a, b).unwrap();

    let group1 = graph.add_group("group1").unwrap();
    graph
        .add_node_with(Owner::Group(group1), "d", NodeOptions::default())
        .unwrap();
    let e = graph
        .add_node_with(Owner::Group(group1), "e", NodeOptions::default())
        .unwrap();
    let f = graph
        .add_node_with(Owner::Group(group1), "f", NodeOptions::default())
        .unwrap();
    let edge3 = graph
        .add_edge_with(Owner::Group(group1), e, f, EdgeOptions::default())
        .unwrap();
    let group1_1 = graph
        .add_group_with(Owner::Group(group1), "group1_1", GroupOptions::default())
        .unwrap();

    graph.remove_node(b).unwrap();
    graph.remove_group(group1, RemovalMode::Heal).unwrap();

    assert_eq!(graph.node(e).unwrap().owner(), Owner::Root);
    assert_eq!(graph.group(group1_1).unwrap().owner(), Owner::Root);
    assert_eq!(graph.edge(edge3).unwrap().owner(), Owner::Root);
    assert!(graph.group(group1).is_none());
}

#[test]
fn orphan_group_removal_leaves_dependents_to_the_caller() {
    let mut graph = Graph::new();
    let group = graph.add_group("group").unwrap();
    let child = graph
        .add_node_with(Owner::Group(group), "child", NodeOptions::default())
        .unwrap();

    graph.remove_group(group, RemovalMode::Orphan).unwrap();

    // The child still exists but is no longer reachable from the root until
    // the caller re-owns or removes it.
    assert!(graph.contains_object(child));
    assert_eq!(graph.node(child).unwrap().owner(), Owner::Group(group));
    assert!(graph.children_of(Owner::Root).is_empty());
    graph.remove_node(child).unwrap();
}

#[test]
fn integrity_rules_prune_stranded_edges_only() {
    let mut graph = Graph::new();
    let x = graph.add_node("x").unwrap();
    let y = graph.add_node("y").unwrap();
    let z = graph.add_node("z").unwrap();
    let stranded = graph.add_edge(x, y).unwrap();
    let intact = graph.add_edge(x, z).unwrap();

    graph.remove_node(y).unwrap();
    let removed = graph.run_integrity_rules(IntegrityMode::Auto).unwrap();

    assert_eq!(removed, vec![stranded]);
    assert!(!graph.contains_edge(stranded));
    assert!(graph.contains_edge(intact));
}

#[test]
fn manual_integrity_mode_is_not_implemented() {
    let mut graph = Graph::new();
    let err = graph.run_integrity_rules(IntegrityMode::Manual).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[test]
fn removing_unknown_entities_fails() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    let group = graph.add_group("g").unwrap();
    let edge = graph.add_edge(a, a).unwrap();
    graph.remove_edge(edge).unwrap();

    assert!(matches!(
        graph.remove_edge(edge),
        Err(Error::EntityNotFound { .. })
    ));
    // A group handle is not a node handle and vice versa.
    assert!(matches!(
        graph.remove_node(group),
        Err(Error::EntityNotFound { .. })
    ));
    assert!(matches!(
        graph.remove_group(a, RemovalMode::Heal),
        Err(Error::EntityNotFound { .. })
    ));
}

#[test]
fn connect_reuses_existing_names_and_creates_missing_ones() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    let edge = graph
        .connect(Owner::Root, "a", "b", EdgeOptions::default())
        .unwrap();

    assert_eq!(graph.edge(edge).unwrap().source(), a);
    let b = graph.find_object_by_name("b").unwrap();
    assert_eq!(graph.edge(edge).unwrap().target(), b);
    assert_eq!(graph.gather_statistics().all_nodes.len(), 2);
}

#[test]
fn rename_keeps_a_defaulted_first_label_in_sync() {
    let mut graph = Graph::new();
    let a = graph.add_node("old").unwrap();
    graph.rename_object(a, "new").unwrap();
    assert_eq!(graph.node(a).unwrap().labels[0].text(), "new");

    // An explicitly different label is left alone.
    let b = graph
        .add_node_with(
            Owner::Root,
            "b",
            NodeOptions {
                label: Some("fancy".to_string()),
                ..NodeOptions::default()
            },
        )
        .unwrap();
    graph.rename_object(b, "renamed").unwrap();
    assert_eq!(graph.node(b).unwrap().labels[0].text(), "fancy");
}
