mod hierarchy;

use yedoc_core::{EdgeOptions, Graph, GroupOptions, NodeOptions, Owner};

/// Three-level fixture: root nodes a, b, c; group1 holding d and sub-group
/// group1_1 holding e.
pub(crate) fn three_level_graph() -> Graph {
    let mut graph = Graph::new();
    graph.add_node("a").unwrap();
    graph.add_node("b").unwrap();
    graph.add_node("c").unwrap();
    let group1 = graph.add_group("group1").unwrap();
    graph
        .add_node_with(Owner::Group(group1), "d", NodeOptions::default())
        .unwrap();
    let group1_1 = graph
        .add_group_with(Owner::Group(group1), "group1_1", GroupOptions::default())
        .unwrap();
    graph
        .add_node_with(Owner::Group(group1_1), "e", NodeOptions::default())
        .unwrap();
    graph
}

pub(crate) fn named_edge(name: &str) -> EdgeOptions {
    EdgeOptions {
        name: Some(name.to_string()),
        ..EdgeOptions::default()
    }
}
