use narwhal_layout::{Graph, LayoutResult};
use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Formats a number with at most three decimals and no trailing zeros.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let k = (v * 1000.0).round() / 1000.0;
    if k == 0.0 {
        return "0".to_string();
    }
    let mut s = format!("{k:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
    out
}

/// Index into `layout` for every node of `graph`, in graph order.
pub(crate) fn positions_for<'g>(
    graph: &'g Graph,
    layout: &LayoutResult,
) -> Result<Vec<(&'g str, usize)>> {
    let mut by_id: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, id) in layout.node_ids.iter().enumerate() {
        by_id.insert(id.as_str(), i);
    }
    graph
        .nodes
        .iter()
        .map(|n| match by_id.get(n.id.as_str()) {
            Some(&i) => Ok((n.id.as_str(), i)),
            None => Err(Error::MissingPosition {
                node_id: n.id.clone(),
            }),
        })
        .collect()
}
