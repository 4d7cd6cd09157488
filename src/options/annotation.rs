use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color-name labeling parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Annotation", inline)]
#[serde(default)]
pub struct AnnotationOptions {
    /// Approximate number of indices a table is oversampled to so that
    /// centered name labels land on their swatch.
    #[schemars(title = "Target Colors", range(min = 1, max = 4096))]
    pub target_colors: u32,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self { target_colors: 256 }
    }
}
