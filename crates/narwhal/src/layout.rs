use narwhal_layout::LayoutResult;
use narwhal_render::{Format, RenderOptions};

use crate::{Context, Error, Graph, Result};

/// A layout computed for a graph.
///
/// The context and the graph are held together: a `Layout` either refers to both or, once
/// released, to neither. Dropping it (or calling [`Layout::release`]) removes the result from
/// the graph again; [`Layout::persist`] leaves it attached.
#[derive(Debug)]
pub struct Layout<'a> {
    bound: Option<(&'a Context, &'a mut Graph)>,
    engine: String,
}

impl<'a> Layout<'a> {
    /// Lays out `graph` with the engine registered as `engine` in `ctx`.
    ///
    /// Any layout previously attached to the graph is discarded first, so on error the graph
    /// is left without one.
    pub fn new(ctx: &'a Context, graph: &'a mut Graph, engine: &str) -> Result<Self> {
        graph.clear_layout();
        let algorithm = ctx.engine(engine).ok_or_else(|| Error::UnknownEngine {
            name: engine.to_string(),
        })?;

        let result = narwhal_layout::layout(graph.model(), algorithm)?;
        tracing::debug!(
            engine,
            nodes = result.len(),
            dim = result.dim,
            "layout attached"
        );
        graph.layout = Some(result);

        Ok(Self {
            bound: Some((ctx, graph)),
            engine: engine.to_string(),
        })
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn context(&self) -> Option<&'a Context> {
        self.bound.as_ref().map(|(ctx, _)| *ctx)
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.bound.as_ref().map(|(_, graph)| &**graph)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn positions(&self) -> Option<&LayoutResult> {
        self.graph().and_then(Graph::layout)
    }

    /// Renders the attached layout. `format` is a name accepted by [`Format`]'s `FromStr`.
    pub fn render(&self, format: &str) -> Result<RenderData> {
        let format: Format = format.parse()?;
        self.render_with(format, &RenderOptions::default())
    }

    pub fn render_with(&self, format: Format, options: &RenderOptions) -> Result<RenderData> {
        let graph = self.graph().ok_or(Error::Detached)?;
        let positions = graph.layout().ok_or(Error::Detached)?;
        let bytes = narwhal_render::render(graph.model(), positions, format, options)?;
        Ok(RenderData { bytes, format })
    }

    /// Detaches from the context and graph, removing the layout from the graph.
    pub fn release(mut self) -> Option<&'a mut Graph> {
        let (_, graph) = self.bound.take()?;
        graph.clear_layout();
        Some(graph)
    }

    /// Detaches from the context and graph, leaving the layout attached to the graph.
    pub fn persist(mut self) -> Option<&'a mut Graph> {
        self.bound.take().map(|(_, graph)| graph)
    }
}

impl Drop for Layout<'_> {
    fn drop(&mut self) {
        if let Some((_, graph)) = self.bound.take() {
            graph.clear_layout();
        }
    }
}

/// Rendered bytes tagged with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderData {
    bytes: Vec<u8>,
    format: Format,
}

impl RenderData {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn format(&self) -> Format {
        self.format
    }
}
