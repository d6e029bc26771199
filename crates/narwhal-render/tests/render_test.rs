use narwhal_layout::{Algorithm, Edge, Graph, LayoutResult, Node, StressOptions, layout};
use narwhal_render::{Error, Format, RenderOptions, render};
use serde_json::Value;

fn triangle() -> Graph {
    let mut a = Node::new("a");
    a.label = Some("A & <B>".to_string());
    Graph {
        nodes: vec![a, Node::new("b"), Node::new("c")],
        edges: vec![
            Edge::new("a", "b"),
            Edge::new("b", "c"),
            Edge::new("c", "a").with_length(2.0),
        ],
    }
}

#[test]
fn json_lists_nodes_in_graph_order() {
    let g = triangle();
    let r = layout(&g, &Algorithm::Stress(StressOptions::default())).unwrap();
    let bytes = render(&g, &r, Format::Json, &RenderOptions::default()).unwrap();
    let v: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(v["dim"], 2);
    let nodes = v["nodes"].as_array().unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    for (n, (_, p)) in nodes.iter().zip(r.iter()) {
        let coords: Vec<f64> = n["coordinates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c.as_f64().unwrap())
            .collect();
        assert_eq!(coords.len(), p.len());
        for (c, e) in coords.iter().zip(p) {
            assert!((c - e).abs() < 1e-12);
        }
    }
}

#[test]
fn svg_contains_every_node_and_edge() {
    let g = triangle();
    let r = layout(&g, &Algorithm::Stress(StressOptions::default())).unwrap();
    let bytes = render(&g, &r, Format::Svg, &RenderOptions::default()).unwrap();
    let svg = String::from_utf8(bytes).unwrap();

    assert!(svg.starts_with("<svg "));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<line ").count(), 3);
    assert_eq!(svg.matches("<circle ").count(), 3);
    assert!(svg.contains("A &amp; &lt;B&gt;"));
    assert!(!svg.contains("A & <B>"));
}

#[test]
fn missing_positions_are_reported() {
    let g = triangle();
    let partial = LayoutResult {
        dim: 2,
        node_ids: vec!["a".to_string(), "b".to_string()],
        coordinates: vec![0.0, 0.0, 1.0, 0.0],
    };
    for format in [Format::Svg, Format::Json] {
        match render(&g, &partial, format, &RenderOptions::default()) {
            Err(Error::MissingPosition { node_id }) => assert_eq!(node_id, "c"),
            other => panic!("expected a missing position, got {other:?}"),
        }
    }
}

#[test]
fn one_dimensional_layouts_render_on_a_line() {
    let g = Graph {
        nodes: vec![Node::new("a"), Node::new("b")],
        edges: vec![Edge::new("a", "b")],
    };
    let opts = StressOptions {
        dim: 1,
        ..Default::default()
    };
    let r = layout(&g, &Algorithm::Stress(opts)).unwrap();
    let svg = String::from_utf8(render(&g, &r, Format::Svg, &RenderOptions::default()).unwrap())
        .unwrap();
    assert_eq!(svg.matches("<circle ").count(), 2);
}
