//! Legend engine options with TOML preset support.
//!
//! Layer placement, default actor styling and color-name annotation
//! parameters are consolidated here. Options serialize to/from TOML.

mod actor;
mod annotation;
mod renderer;

use std::path::Path;

pub use actor::ActorOptions;
pub use annotation::AnnotationOptions;
pub use renderer::RendererOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LegendError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[actor]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct LegendOptions {
    /// Overlay layer placement.
    pub renderer: RendererOptions,
    /// Default styling of new actors.
    pub actor: ActorOptions,
    /// Color-name labeling.
    pub annotation: AnnotationOptions,
}

impl LegendOptions {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(LegendOptions)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`LegendError::OptionsParse`] on malformed TOML or an invalid layer.
    pub fn from_toml(content: &str) -> Result<Self, LegendError> {
        let options: Self = toml::from_str(content)
            .map_err(|e| LegendError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`LegendError::Io`] when the file cannot be read,
    /// [`LegendError::OptionsParse`] when it does not parse.
    pub fn load(path: &Path) -> Result<Self, LegendError> {
        let content = std::fs::read_to_string(path).map_err(LegendError::Io)?;
        let options = Self::from_toml(&content)?;
        log::info!("Loaded legend options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`LegendError::OptionsParse`] on serialization failure,
    /// [`LegendError::Io`] on write failure.
    pub fn save(&self, path: &Path) -> Result<(), LegendError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LegendError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LegendError::Io)?;
        }
        std::fs::write(path, content).map_err(LegendError::Io)?;
        log::info!("Saved legend options to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), LegendError> {
        if self.renderer.layer == 0 {
            return Err(LegendError::OptionsParse(
                "renderer.layer must be above the base layer (0)".to_owned(),
            ));
        }
        if self.annotation.target_colors == 0 {
            return Err(LegendError::OptionsParse(
                "annotation.target_colors must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = LegendOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = LegendOptions::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[actor]
bar_ratio = 0.3
";
        let opts = LegendOptions::from_toml(toml_str).unwrap();
        assert_eq!(opts.actor.bar_ratio, 0.3);
        // Everything else should be default
        assert!(opts.actor.unconstrained_font_size);
        assert_eq!(opts.actor.text_pad, 2.0);
        assert_eq!(opts.renderer.layer, 1);
        assert_eq!(opts.annotation.target_colors, 256);
    }

    #[test]
    fn base_layer_is_rejected() {
        let err = LegendOptions::from_toml("[renderer]\nlayer = 0\n")
            .unwrap_err();
        assert!(matches!(err, LegendError::OptionsParse(_)));
    }

    #[test]
    fn zero_target_colors_is_rejected() {
        let err =
            LegendOptions::from_toml("[annotation]\ntarget_colors = 0\n")
                .unwrap_err();
        assert!(matches!(err, LegendError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("color-legend-options-{}", std::process::id()));
        let path = dir.join("legend.toml");
        let mut opts = LegendOptions::default();
        opts.annotation.target_colors = 512;
        opts.save(&path).unwrap();
        let loaded = LegendOptions::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LegendOptions::load(Path::new("/nonexistent/legend.toml"))
            .unwrap_err();
        assert!(matches!(err, LegendError::Io(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(LegendOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("renderer"));
        assert!(props.contains_key("actor"));
        assert!(props.contains_key("annotation"));

        let renderer = &props["renderer"]["properties"];
        assert!(renderer.get("layer").is_some());
        assert!(renderer.get("interactive").is_none());
    }
}
