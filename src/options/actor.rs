use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed styling applied to every new overlay actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Actor", inline)]
#[serde(default)]
pub struct ActorOptions {
    /// Swatch width relative to the legend extent.
    #[schemars(title = "Bar Ratio", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub bar_ratio: f64,
    /// Size fonts from the text properties rather than the bar size.
    #[schemars(title = "Unconstrained Font Size")]
    pub unconstrained_font_size: bool,
    /// Gap between a vertical bar and its labels.
    #[schemars(title = "Text Pad", range(min = 0.0, max = 20.0), extend("step" = 1.0))]
    pub text_pad: f64,
}

impl Default for ActorOptions {
    fn default() -> Self {
        Self {
            bar_ratio: 0.2,
            unconstrained_font_size: true,
            text_pad: 2.0,
        }
    }
}
