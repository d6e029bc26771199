use narwhal_layout::LayoutResult;

use crate::Result;

/// An input graph together with the layout currently attached to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    model: narwhal_layout::Graph,
    pub(crate) layout: Option<LayoutResult>,
}

impl Graph {
    pub fn new(model: narwhal_layout::Graph) -> Self {
        Self {
            model,
            layout: None,
        }
    }

    /// Parses the JSON graph model (`{"nodes": [...], "edges": [...]}`).
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn model(&self) -> &narwhal_layout::Graph {
        &self.model
    }

    /// Mutable access to the model. Any attached layout is discarded since it no longer
    /// describes the graph.
    pub fn model_mut(&mut self) -> &mut narwhal_layout::Graph {
        self.layout = None;
        &mut self.model
    }

    pub fn into_model(self) -> narwhal_layout::Graph {
        self.model
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_ref()
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }

    /// Drops the attached layout, if any.
    pub fn clear_layout(&mut self) {
        self.layout = None;
    }
}

impl From<narwhal_layout::Graph> for Graph {
    fn from(model: narwhal_layout::Graph) -> Self {
        Self::new(model)
    }
}
