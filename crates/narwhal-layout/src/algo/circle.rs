use crate::algo::CircleOptions;
use crate::error::{Error, Result};
use crate::graph::{Graph, LayoutResult};

/// Places nodes in input order on a circle, first node on the positive x axis, with the bounding
/// box starting at the origin.
pub fn layout(graph: &Graph, opts: &CircleOptions) -> Result<LayoutResult> {
    graph.validate()?;
    if !(opts.spacing > 0.0 && opts.spacing.is_finite()) {
        return Err(Error::InvalidOption {
            name: "spacing",
            message: format!("expected a positive spacing, got {}", opts.spacing),
        });
    }

    let n = graph.nodes.len();
    let radius = if n <= 1 {
        0.0
    } else {
        (n as f64 * opts.spacing / std::f64::consts::TAU).max(opts.spacing / 2.0)
    };

    let mut coordinates = Vec::with_capacity(n * 2);
    for i in 0..n {
        let angle = std::f64::consts::TAU * i as f64 / n as f64;
        coordinates.push(radius + radius * angle.cos());
        coordinates.push(radius + radius * angle.sin());
    }

    Ok(LayoutResult {
        dim: 2,
        node_ids: graph.nodes.iter().map(|n| n.id.clone()).collect(),
        coordinates,
    })
}

#[cfg(test)]
mod tests {
    use super::layout;
    use crate::algo::CircleOptions;
    use crate::graph::{Graph, Node};

    #[test]
    fn nodes_share_one_radius() {
        let g = Graph {
            nodes: (0..6).map(|i| Node::new(format!("n{i}"))).collect(),
            edges: Vec::new(),
        };
        let r = layout(&g, &CircleOptions::default()).unwrap();
        let radius = 6.0 / std::f64::consts::TAU;
        for i in 0..6 {
            let p = r.point(i);
            let d = ((p[0] - radius).powi(2) + (p[1] - radius).powi(2)).sqrt();
            assert!((d - radius).abs() < 1e-12);
        }
    }

    #[test]
    fn single_node_sits_at_the_origin() {
        let g = Graph {
            nodes: vec![Node::new("a")],
            edges: Vec::new(),
        };
        let r = layout(&g, &CircleOptions::default()).unwrap();
        assert_eq!(r.point(0), &[0.0, 0.0]);
    }
}
