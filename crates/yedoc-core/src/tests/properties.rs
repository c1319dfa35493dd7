use crate::*;

#[test]
fn defining_a_property_backfills_existing_entities_and_defaults_new_ones() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();

    graph
        .define_custom_property("node", "Population", "int", "0")
        .unwrap();
    graph
        .define_custom_property("edge", "Population", "int", "1")
        .unwrap();

    let b = graph
        .add_node_with(
            Owner::Root,
            "b",
            NodeOptions {
                custom_properties: [("Population".to_string(), "3".to_string())]
                    .into_iter()
                    .collect(),
                ..NodeOptions::default()
            },
        )
        .unwrap();
    let group = graph
        .add_group_with(
            Owner::Root,
            "group1",
            GroupOptions {
                custom_properties: [("Population".to_string(), "2".to_string())]
                    .into_iter()
                    .collect(),
                ..GroupOptions::default()
            },
        )
        .unwrap();
    let edge = graph.add_edge(a, b).unwrap();

    assert_eq!(graph.node(a).unwrap().properties["Population"], "0");
    assert_eq!(graph.node(b).unwrap().properties["Population"], "3");
    assert_eq!(graph.group(group).unwrap().properties["Population"], "2");
    assert_eq!(graph.edge(edge).unwrap().properties["Population"], "1");

    assert!(graph.stringify().contains("Population"));
}

#[test]
fn overriding_an_undeclared_property_fails() {
    let mut graph = Graph::new();
    let err = graph
        .add_node_with(
            Owner::Root,
            "a",
            NodeOptions {
                custom_properties: [("Nope".to_string(), "1".to_string())]
                    .into_iter()
                    .collect(),
                ..NodeOptions::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::UnknownProperty { .. }));
}

#[test]
fn scope_and_type_are_validated() {
    let mut graph = Graph::new();
    assert!(matches!(
        graph.define_custom_property("graph", "x", "string", ""),
        Err(Error::InvalidScope { .. })
    ));
    assert!(matches!(
        graph.define_custom_property("node", "x", "float", ""),
        Err(Error::InvalidType { .. })
    ));
}

#[test]
fn schemas_are_per_graph_not_process_wide() {
    let mut first = Graph::new();
    first
        .define_custom_property("node", "Population", "int", "0")
        .unwrap();

    let mut second = Graph::new();
    let lone = second.add_node("lone").unwrap();
    assert!(second.node(lone).unwrap().properties.is_empty());
    assert!(second.schema().definitions().is_empty());
}
