use std::borrow::Cow;

use crate::algo::StressOptions;
use crate::distance::{Adjacency, connected_components, distance_matrix, induced_subgraph};
use crate::error::Result;
use crate::graph::{Graph, LayoutResult, Node};
use crate::init::{InitialPlacement, MDS_MAX_NODES, initial_coordinates};
use crate::rng::XorShift64Star;
use crate::sparse::SparseSymmetricMatrix;
use crate::stress::{StressMajorizationSmoother, WeightScheme, all_coincident};

/// Stress layout of every connected component, packed left to right.
///
/// The weighted scheme constrains node pairs within `opts.max_hops` edges to their
/// shortest-path distance. The uniform scheme only constrains the graph's edges, each to unit
/// length, so the spacing of non-adjacent nodes comes from the graph structure.
pub fn layout(graph: &Graph, opts: &StressOptions, scheme: WeightScheme) -> Result<LayoutResult> {
    opts.validate()?;
    let adjacency = graph.adjacency(opts.default_edge_length)?;
    let components = connected_components(&adjacency)?;

    let dim = opts.dim;
    let mut rng = XorShift64Star::new(opts.random_seed);
    let mut coordinates = vec![0.0; graph.nodes.len() * dim];
    let mut offset = 0.0;

    for comp in &components {
        let local = if comp.len() == 1 {
            vec![0.0; dim]
        } else {
            let sub = induced_subgraph(&adjacency, comp);
            let (matrix, placement) = component_matrices(&sub, opts, scheme)?;
            let initial = match given_positions(&graph.nodes, comp, dim) {
                Some(x) => x,
                None => initial_coordinates(
                    placement.as_ref().unwrap_or(&matrix),
                    dim,
                    opts.init,
                    &mut rng,
                ),
            };

            let mut sm = StressMajorizationSmoother::with_scheme(
                dim,
                Cow::Owned(matrix),
                &initial,
                opts.smoother_options(),
                scheme,
            )?;
            let outcome = sm.run(opts.max_iterations, opts.tolerance)?;
            tracing::debug!(
                nodes = comp.len(),
                iterations = outcome.iterations(),
                stress = outcome.stress(),
                converged = outcome.is_converged(),
                "component laid out"
            );
            sm.into_coordinates()
        };

        // Translate the component so its bounding box starts at the origin, then shift it past
        // the previous components along the first axis.
        let mut lo = vec![f64::INFINITY; dim];
        let mut hi = vec![f64::NEG_INFINITY; dim];
        for point in local.chunks_exact(dim) {
            for a in 0..dim {
                lo[a] = lo[a].min(point[a]);
                hi[a] = hi[a].max(point[a]);
            }
        }
        for (k, &node) in comp.iter().enumerate() {
            for a in 0..dim {
                let shift = if a == 0 { offset } else { 0.0 };
                coordinates[node * dim + a] = local[k * dim + a] - lo[a] + shift;
            }
        }
        offset += (hi[0] - lo[0]) + opts.component_gap;
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        components = components.len(),
        scheme = ?scheme,
        "stress layout finished"
    );

    Ok(LayoutResult {
        dim,
        node_ids: graph.nodes.iter().map(|n| n.id.clone()).collect(),
        coordinates,
    })
}

/// The matrix to smooth for one component, plus a separate matrix for the initial placement when
/// the smoothing matrix is too sparse for it.
fn component_matrices(
    sub: &Adjacency,
    opts: &StressOptions,
    scheme: WeightScheme,
) -> Result<(SparseSymmetricMatrix, Option<SparseSymmetricMatrix>)> {
    match scheme {
        WeightScheme::Distance => Ok((distance_matrix(sub, opts.max_hops)?, None)),
        WeightScheme::Uniform => {
            let unit: Vec<Vec<(usize, f64)>> = sub
                .iter()
                .map(|ns| ns.iter().map(|&(u, _)| (u, 1.0)).collect())
                .collect();
            let edges = distance_matrix(&unit, Some(1))?;
            // Hop counts give classical MDS the complete matrix it needs.
            let hops = (opts.init == InitialPlacement::ClassicalMds && sub.len() <= MDS_MAX_NODES)
                .then(|| distance_matrix(&unit, None))
                .transpose()?;
            Ok((edges, hops))
        }
    }
}

/// User-supplied 2D positions for a component, when every node has one and they are not all
/// the same point.
fn given_positions(nodes: &[Node], comp: &[usize], dim: usize) -> Option<Vec<f64>> {
    if dim != 2 {
        return None;
    }
    let mut out = Vec::with_capacity(comp.len() * 2);
    for &i in comp {
        out.push(nodes[i].x?);
        out.push(nodes[i].y?);
    }
    (comp.len() == 1 || !all_coincident(&out, 2)).then_some(out)
}
