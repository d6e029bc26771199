#![forbid(unsafe_code)]

//! Renderers for [`narwhal_layout::LayoutResult`]s.

pub mod json;
pub mod svg;
mod util;

use narwhal_layout::{Graph, LayoutResult};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported render format: {format}")]
    UnsupportedFormat { format: String },
    #[error("node `{node_id}` has no position in the layout")]
    MissingPosition { node_id: String },
    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Svg,
    Json,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Pixels per layout unit.
    pub scale: f64,
    /// Space around the drawing, in pixels.
    pub margin: f64,
    pub node_radius: f64,
    pub font_size: f64,
    /// Indent JSON output.
    pub pretty: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 72.0,
            margin: 24.0,
            node_radius: 8.0,
            font_size: 12.0,
            pretty: false,
        }
    }
}

/// Renders `layout` (computed for `graph`) in the requested format.
pub fn render(
    graph: &Graph,
    layout: &LayoutResult,
    format: Format,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    check_layout(layout)?;
    let bytes = match format {
        Format::Svg => svg::render_svg(graph, layout, options)?.into_bytes(),
        Format::Json => json::render_json(graph, layout, options)?,
    };
    tracing::debug!(format = %format, bytes = bytes.len(), "rendered layout");
    Ok(bytes)
}

fn check_layout(layout: &LayoutResult) -> Result<()> {
    if layout.dim == 0 {
        return Err(Error::InvalidLayout {
            message: "layout dimension must be at least 1".to_string(),
        });
    }
    let expected = layout.node_ids.len() * layout.dim;
    if layout.coordinates.len() != expected {
        return Err(Error::InvalidLayout {
            message: format!(
                "expected {expected} coordinates for {} nodes in {} dimensions, got {}",
                layout.node_ids.len(),
                layout.dim,
                layout.coordinates.len()
            ),
        });
    }
    Ok(())
}
