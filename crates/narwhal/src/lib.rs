#![forbid(unsafe_code)]

//! `narwhal` computes and renders node-link layouts without a display.
//!
//! A [`Context`] names the available engines, a [`Graph`] carries the input model together with
//! its current layout, and a [`Layout`] ties the two together for as long as the result is in
//! use:
//!
//! ```
//! use narwhal::{Context, Graph, Layout};
//!
//! let ctx = Context::new();
//! let mut graph = Graph::from_json(
//!     r#"{"nodes": [{"id": "a"}, {"id": "b"}], "edges": [{"source": "a", "target": "b"}]}"#,
//! )?;
//! let layout = Layout::new(&ctx, &mut graph, "stress")?;
//! let svg = layout.render("svg")?;
//! assert!(svg.as_bytes().starts_with(b"<svg"));
//! # Ok::<(), narwhal::Error>(())
//! ```

mod context;
mod graph;
mod layout;

pub use context::Context;
pub use graph::Graph;
pub use layout::{Layout, RenderData};

pub use narwhal_layout::{
    Algorithm, CircleOptions, Edge, InitialPlacement, LayoutResult, Node, StressOptions,
};
pub use narwhal_render::{Format, RenderOptions};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown layout engine: {name}")]
    UnknownEngine { name: String },
    #[error("layout is no longer attached to a graph")]
    Detached,
    #[error(transparent)]
    Layout(#[from] narwhal_layout::Error),
    #[error(transparent)]
    Render(#[from] narwhal_render::Error),
    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
