use narwhal_layout::{Graph, LayoutResult};
use serde::Serialize;

use crate::util::positions_for;
use crate::{RenderOptions, Result};

#[derive(Debug, Serialize)]
struct JsonLayout<'a> {
    dim: usize,
    nodes: Vec<JsonNode<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonNode<'a> {
    id: &'a str,
    coordinates: &'a [f64],
}

/// `{ "dim": .., "nodes": [{ "id": .., "coordinates": [..] }] }` in graph node order.
pub fn render_json(graph: &Graph, layout: &LayoutResult, options: &RenderOptions) -> Result<Vec<u8>> {
    let nodes = positions_for(graph, layout)?
        .into_iter()
        .map(|(id, i)| JsonNode {
            id,
            coordinates: layout.point(i),
        })
        .collect();
    let doc = JsonLayout {
        dim: layout.dim,
        nodes,
    };
    let mut bytes = if options.pretty {
        serde_json::to_vec_pretty(&doc)?
    } else {
        serde_json::to_vec(&doc)?
    };
    bytes.push(b'\n');
    Ok(bytes)
}
