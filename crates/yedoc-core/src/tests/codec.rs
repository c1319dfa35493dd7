use crate::*;

fn temp_path(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
    dir.path().join(name)
}

#[test]
fn persist_then_load_round_trips_byte_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "roundtrip.graphml");

    let mut graph = Graph::new();
    let a = graph.add_node("a").unwrap();
    let b = graph.add_node("b").unwrap();
    graph.add_edge(a, b).unwrap();
    graph.persist(&path, PersistOptions::default()).unwrap();

    let reloaded = Graph::load(&path).unwrap();
    assert_eq!(graph.stringify(), reloaded.stringify());

    graph.add_node("c").unwrap();
    assert_ne!(graph.stringify(), reloaded.stringify());
}

#[test]
fn round_trip_preserves_groups_styles_urls_and_custom_properties() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "full.graphml");

    let mut graph = Graph::new();
    graph
        .define_custom_property("node", "Population", "int", "0")
        .unwrap();
    graph
        .define_custom_property("edge", "Weight", "double", "1.0")
        .unwrap();

    let a = graph
        .add_node_with(
            Owner::Root,
            "a",
            NodeOptions {
                shape: "ellipse".to_string(),
                shape_fill: "#99CC00".to_string(),
                url: Some("http://www.example.com".to_string()),
                description: Some("a node with a URL and description".to_string()),
                custom_properties: [("Population".to_string(), "7".to_string())]
                    .into_iter()
                    .collect(),
                ..NodeOptions::default()
            },
        )
        .unwrap();
    let group = graph
        .add_group_with(
            Owner::Root,
            "harbour",
            GroupOptions {
                closed: "true".to_string(),
                fill: "#F5F5F5".to_string(),
                url: Some("http://www.example.com/group".to_string()),
                ..GroupOptions::default()
            },
        )
        .unwrap();
    let inner = graph
        .add_node_with(Owner::Group(group), "inner", NodeOptions::default())
        .unwrap();
    graph
        .add_edge_with(
            Owner::Root,
            a,
            inner,
            EdgeOptions {
                name: Some("ferry".to_string()),
                arrowhead: "white_delta".to_string(),
                line_type: "dashed".to_string(),
                url: Some("http://www.example.com/edge".to_string()),
                ..EdgeOptions::default()
            },
        )
        .unwrap();

    graph.persist(&path, PersistOptions::default()).unwrap();
    let reloaded = Graph::load(&path).unwrap();
    assert_eq!(graph.stringify(), reloaded.stringify());

    let stats = reloaded.gather_statistics();
    let a2 = stats.find_object_by_id("n0").unwrap();
    let node = reloaded.node(a2).unwrap();
    assert_eq!(node.shape, "ellipse");
    assert_eq!(node.url.as_deref(), Some("http://www.example.com"));
    assert_eq!(node.properties["Population"], "7");

    let group2 = stats.find_object_by_id("n1").unwrap();
    assert_eq!(reloaded.group(group2).unwrap().closed, "true");
}

#[test]
fn uml_payload_serializes_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "uml.graphml");

    let mut graph = Graph::new();
    graph
        .add_node_with(
            Owner::Root,
            "AbstractClass",
            NodeOptions {
                node_type: "UMLClassNode".to_string(),
                uml: Some(UmlData {
                    attributes: "int foo".to_string(),
                    methods: "foo()".to_string(),
                    stereotype: Some("abstract".to_string()),
                }),
                ..NodeOptions::default()
            },
        )
        .unwrap();

    let text = graph.stringify();
    assert!(text.contains("<y:UMLClassNode>"));
    assert!(text.contains("stereotype=\"abstract\""));
    assert!(text.contains("<y:AttributeLabel type=\"rectangle\">int foo</y:AttributeLabel>"));
    assert!(text.contains("<y:MethodLabel type=\"rectangle\">foo()</y:MethodLabel>"));

    graph.persist(&path, PersistOptions::default()).unwrap();
    let reloaded = Graph::load(&path).unwrap();
    let stats = reloaded.gather_statistics();
    let node = reloaded
        .node(stats.find_object_by_id("n0").unwrap())
        .unwrap();
    let uml = node.uml.as_ref().unwrap();
    assert_eq!(uml.attributes, "int foo");
    assert_eq!(uml.methods, "foo()");
    assert_eq!(uml.stereotype.as_deref(), Some("abstract"));
    assert_eq!(graph.stringify(), reloaded.stringify());
}

#[test]
fn key_declarations_keep_their_contractual_order() {
    let mut graph = Graph::new();
    graph
        .define_custom_property("node", "Population", "int", "0")
        .unwrap();
    let text = graph.stringify();

    let positions: Vec<usize> = [
        "id=\"data_node\"",
        "id=\"url_node\"",
        "id=\"description_node\"",
        "id=\"url_edge\"",
        "id=\"description_edge\"",
        "id=\"node_Population\"",
        "id=\"data_edge\"",
    ]
    .iter()
    .map(|needle| text.find(needle).unwrap())
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn persist_refuses_to_overwrite_unless_asked() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "dup.graphml");

    let mut graph = Graph::new();
    graph.add_node("a").unwrap();
    graph.persist(&path, PersistOptions::default()).unwrap();

    let err = Graph::new()
        .persist(&path, PersistOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::FileExists { .. }));

    Graph::new()
        .persist(
            &path,
            PersistOptions {
                overwrite: true,
                ..PersistOptions::default()
            },
        )
        .unwrap();
}

#[test]
fn pretty_output_is_indented_compact_is_single_line() {
    let dir = tempfile::tempdir().unwrap();
    let compact_path = temp_path(&dir, "compact.graphml");
    let pretty_path = temp_path(&dir, "pretty.graphml");

    let mut graph = Graph::new();
    graph.add_node("a").unwrap();
    graph.add_node("b").unwrap();
    graph.persist(&compact_path, PersistOptions::default()).unwrap();
    graph
        .persist(
            &pretty_path,
            PersistOptions {
                pretty: true,
                ..PersistOptions::default()
            },
        )
        .unwrap();

    let compact = std::fs::read_to_string(&compact_path).unwrap();
    let pretty = std::fs::read_to_string(&pretty_path).unwrap();
    assert_ne!(compact, pretty);
    assert!(!compact.contains('\n'));
    assert!(pretty.matches('\n').count() > 2);

    // Both spellings parse back to the same document.
    let from_compact = Graph::load(&compact_path).unwrap();
    let from_pretty = Graph::load(&pretty_path).unwrap();
    assert_eq!(from_compact.stringify(), from_pretty.stringify());
}

#[test]
fn loading_a_missing_file_fails() {
    let err = Graph::load("definitely_not_existing.graphml").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn simplified_text_collapses_whitespace_and_prefixes() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "pretty.graphml");
    let mut graph = Graph::new();
    graph.add_node("a").unwrap();
    graph
        .persist(
            &path,
            PersistOptions {
                pretty: true,
                ..PersistOptions::default()
            },
        )
        .unwrap();

    let simplified = codec::read_simplified_text(&path).unwrap();
    assert!(!simplified.contains('\n'));
    assert!(!simplified.contains("y:"));
    assert!(!simplified.contains("yfiles."));
    assert!(simplified.contains("<graphml><key"));
}

#[test]
fn document_file_normalizes_basename_and_extension() {
    let file = DocumentFile::new("abc");
    assert_eq!(file.basename(), "abc.graphml");

    let file = DocumentFile::temp();
    assert_eq!(file.basename(), "temp.graphml");

    // An unusable directory falls back to the working directory.
    let file = DocumentFile::new("/definitely/not/a/dir/abc.graphml");
    assert_eq!(file.basename(), "abc.graphml");
    assert_eq!(
        file.path().parent().unwrap(),
        std::env::current_dir().unwrap()
    );
}

#[test]
fn unsupported_node_payloads_are_reported() {
    let text = r#"<graphml><key id="data_node" for="node" type="nodegraphics"/><graph edgedefault="directed" id="G"><node id="n0"><data key="data_node"><GenericNode configuration="fancy"/></data></node></graph></graphml>"#;
    let err = codec::parse_document_text(text).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}

#[test]
fn edges_may_reference_siblings_declared_later_in_document_order() {
    // Edge first in text; the node pass runs before the edge pass.
    let text = r##"<graphml><graph edgedefault="directed" id="G"><edge id="e0" source="n0" target="n1"><data key="data_edge"><PolyLineEdge><Arrows source="none" target="standard"/><LineStyle color="#000000" type="line" width="1.0"/></PolyLineEdge></data></edge><node id="n0"><data key="data_node"><ShapeNode><Fill color="#FFCC00" transparent="false"/><Shape type="rectangle"/></ShapeNode></data></node><node id="n1"><data key="data_node"><ShapeNode><Fill color="#FFCC00" transparent="false"/><Shape type="rectangle"/></ShapeNode></data></node></graph></graphml>"##;
    let graph = codec::parse_document_text(text).unwrap();
    assert_eq!(graph.gather_statistics().all_edges.len(), 1);
}

#[test]
fn simplify_handles_application_written_namespaces() {
    let raw = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
        "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\" xmlns:y=\"http://www.yworks.com/xml/graphml\">\n",
        "  <key for=\"node\" id=\"d6\" yfiles.type=\"nodegraphics\"/>\n",
        "  <graph edgedefault=\"directed\" id=\"G\">\n",
        "    <node id=\"n0\">\n",
        "      <data key=\"d6\"><y:ShapeNode><y:NodeLabel>a</y:NodeLabel><y:Shape type=\"rectangle\"/></y:ShapeNode></data>\n",
        "    </node>\n",
        "  </graph>\n",
        "</graphml>\n",
    );
    let simplified = codec::simplify_document_text(raw);
    assert!(simplified.contains("<graphml><key"));
    assert!(simplified.contains("<ShapeNode>"));
    assert!(simplified.contains("type=\"nodegraphics\""));
}
