use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overlay layer placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Renderer", inline)]
#[serde(default)]
pub struct RendererOptions {
    /// Render window layer hosting the legends. Must sit above the base
    /// content layer (0).
    #[schemars(title = "Layer", range(min = 1, max = 16))]
    pub layer: u32,
    /// Whether the legend layer receives interaction events.
    #[schemars(skip)]
    pub interactive: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            layer: 1,
            interactive: false,
        }
    }
}
