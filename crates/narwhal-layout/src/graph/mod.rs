use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn validate(&self) -> Result<()> {
        self.node_index()?;
        self.check_edge_lengths()
    }

    fn check_edge_lengths(&self) -> Result<()> {
        for e in &self.edges {
            if let Some(length) = e.length {
                if !(length.is_finite() && length > 0.0) {
                    return Err(Error::InvalidEdgeLength {
                        edge_id: e.display_id(),
                        length,
                    });
                }
            }
        }
        Ok(())
    }

    /// Maps node ids to their position in `nodes`, checking ids are unique and every edge
    /// endpoint exists.
    pub fn node_index(&self) -> Result<FxHashMap<&str, usize>> {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        index.reserve(self.nodes.len());
        for (i, n) in self.nodes.iter().enumerate() {
            if index.insert(n.id.as_str(), i).is_some() {
                return Err(Error::DuplicateNode {
                    node_id: n.id.clone(),
                });
            }
        }
        for e in &self.edges {
            if !index.contains_key(e.source.as_str()) || !index.contains_key(e.target.as_str()) {
                return Err(Error::MissingEndpoint {
                    edge_id: e.display_id(),
                });
            }
        }
        Ok(index)
    }

    /// Undirected weighted adjacency lists, indexed like `nodes`.
    ///
    /// Self-loops are dropped and parallel edges keep their shortest length. Edges without a
    /// length use `default_length`.
    pub fn adjacency(&self, default_length: f64) -> Result<Vec<Vec<(usize, f64)>>> {
        let index = self.node_index()?;
        self.check_edge_lengths()?;

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            let (Some(&a), Some(&b)) = (index.get(e.source.as_str()), index.get(e.target.as_str()))
            else {
                continue;
            };
            if a == b {
                continue;
            }
            let length = e.length.unwrap_or(default_length);
            adjacency[a].push((b, length));
            adjacency[b].push((a, length));
        }
        for neigh in &mut adjacency {
            neigh.sort_by(|x, y| x.0.cmp(&y.0).then(x.1.total_cmp(&y.1)));
            neigh.dedup_by_key(|(v, _)| *v);
        }
        Ok(adjacency)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional initial position. Only used when every node of a component carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub source: String,
    pub target: String,
    /// Target length; the engine default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn display_id(&self) -> String {
        if self.id.is_empty() {
            format!("{}->{}", self.source, self.target)
        } else {
            self.id.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Node coordinates produced by an engine.
///
/// `coordinates` is a dense row-major `node_ids.len() × dim` buffer in input node order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub dim: usize,
    pub node_ids: Vec<String>,
    pub coordinates: Vec<f64>,
}

impl LayoutResult {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn point(&self, i: usize) -> &[f64] {
        &self.coordinates[i * self.dim..(i + 1) * self.dim]
    }

    pub fn position(&self, id: &str) -> Option<&[f64]> {
        self.node_ids
            .iter()
            .position(|n| n == id)
            .map(|i| self.point(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), self.point(i)))
    }

    /// Projection of a node onto the first two axes (`y = 0` for one-dimensional layouts).
    pub fn point2(&self, i: usize) -> Point {
        let p = self.point(i);
        Point {
            x: p.first().copied().unwrap_or(0.0),
            y: p.get(1).copied().unwrap_or(0.0),
        }
    }

    /// `(min, max)` corners over the first two axes.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        let mut it = (0..self.len()).map(|i| self.point2(i));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| {
            (
                Point {
                    x: lo.x.min(p.x),
                    y: lo.y.min(p.y),
                },
                Point {
                    x: hi.x.max(p.x),
                    y: hi.y.max(p.y),
                },
            )
        }))
    }
}
