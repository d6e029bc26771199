use narwhal_layout::{Graph, LayoutResult, Point};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

use crate::util::{escape_xml, fmt, positions_for};
use crate::{RenderOptions, Result};

/// Draws edges as lines and nodes as labelled circles.
///
/// Layouts with more than two dimensions are projected onto their first two axes; the y axis
/// points down as usual for SVG.
pub fn render_svg(graph: &Graph, layout: &LayoutResult, options: &RenderOptions) -> Result<String> {
    let nodes = positions_for(graph, layout)?;

    let (lo, hi) = layout.bounding_box().unwrap_or((
        Point { x: 0.0, y: 0.0 },
        Point { x: 0.0, y: 0.0 },
    ));
    let pad = options.margin + options.node_radius;
    let width = (hi.x - lo.x) * options.scale + 2.0 * pad;
    let height = (hi.y - lo.y) * options.scale + 2.0 * pad;
    let project = |i: usize| {
        let p = layout.point2(i);
        Point {
            x: (p.x - lo.x) * options.scale + pad,
            y: (p.y - lo.y) * options.scale + pad,
        }
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt(width),
        h = fmt(height),
    );

    let index: FxHashMap<&str, usize> = nodes.iter().copied().collect();
    out.push_str(r##"<g class="edges" stroke="#555" stroke-width="1.5">"##);
    out.push('\n');
    for e in &graph.edges {
        let (Some(&a), Some(&b)) = (index.get(e.source.as_str()), index.get(e.target.as_str()))
        else {
            continue;
        };
        let (p, q) = (project(a), project(b));
        let _ = writeln!(
            out,
            r#"<line data-id="{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            escape_xml(&e.display_id()),
            fmt(p.x),
            fmt(p.y),
            fmt(q.x),
            fmt(q.y),
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="nodes">"#);
    out.push('\n');
    for (node, &(id, i)) in graph.nodes.iter().zip(&nodes) {
        let p = project(i);
        let label = node.label.as_deref().unwrap_or(id);
        let _ = writeln!(
            out,
            r##"<g data-id="{id}"><circle cx="{x}" cy="{y}" r="{r}" fill="#fff" stroke="#333"/><text x="{x}" y="{ty}" font-size="{fs}" text-anchor="middle">{label}</text></g>"##,
            id = escape_xml(id),
            x = fmt(p.x),
            y = fmt(p.y),
            r = fmt(options.node_radius),
            ty = fmt(p.y - options.node_radius - 2.0),
            fs = fmt(options.font_size),
            label = escape_xml(label),
        );
    }
    out.push_str("</g>\n</svg>\n");
    Ok(out)
}
