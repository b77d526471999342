use crate::style::{StylePreset, StyleRegistry};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Background photos wider than this are scaled down to fit.
    pub max_canvas_width: f32,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    /// Margin around each plain text line for hit-testing and highlights.
    pub text_hit_margin: f32,
    /// Margin around the scaled logo for hit-testing and highlights.
    pub logo_hit_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_canvas_width: 900.0,
            line_height: 1.2,
            text_hit_margin: 20.0,
            logo_hit_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub text_highlight_fill: String,
    pub text_highlight_stroke: String,
    pub logo_highlight_fill: String,
    pub logo_highlight_stroke: String,
    pub highlight_stroke_width: f32,
    /// Font used by the rasterizer when a family list matches nothing.
    pub fallback_font_family: String,
    pub assets_dir: PathBuf,
    pub export_file_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            text_highlight_fill: "rgba(255,255,0,0.25)".to_string(),
            text_highlight_stroke: "rgba(255,255,0,0.6)".to_string(),
            logo_highlight_fill: "rgba(0,150,255,0.25)".to_string(),
            logo_highlight_stroke: "rgba(0,150,255,0.6)".to_string(),
            highlight_stroke_width: 2.0,
            fallback_font_family: "Arial".to_string(),
            assets_dir: PathBuf::from("assets"),
            export_file_name: "edited.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub styles: StyleRegistry,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    max_canvas_width: Option<f32>,
    line_height: Option<f32>,
    text_hit_margin: Option<f32>,
    logo_hit_margin: Option<f32>,
    text_highlight_fill: Option<String>,
    text_highlight_stroke: Option<String>,
    logo_highlight_fill: Option<String>,
    logo_highlight_stroke: Option<String>,
    highlight_stroke_width: Option<f32>,
    fallback_font_family: Option<String>,
    assets_dir: Option<PathBuf>,
    export_file_name: Option<String>,
    presets: Option<BTreeMap<String, StylePreset>>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(v) = parsed.max_canvas_width {
        if v <= 0.0 {
            return Err(anyhow::anyhow!("maxCanvasWidth must be positive, got {v}"));
        }
        config.layout.max_canvas_width = v;
    }
    if let Some(v) = parsed.line_height {
        config.layout.line_height = v;
    }
    if let Some(v) = parsed.text_hit_margin {
        config.layout.text_hit_margin = v.max(0.0);
    }
    if let Some(v) = parsed.logo_hit_margin {
        config.layout.logo_hit_margin = v.max(0.0);
    }
    if let Some(v) = parsed.text_highlight_fill {
        config.render.text_highlight_fill = v;
    }
    if let Some(v) = parsed.text_highlight_stroke {
        config.render.text_highlight_stroke = v;
    }
    if let Some(v) = parsed.logo_highlight_fill {
        config.render.logo_highlight_fill = v;
    }
    if let Some(v) = parsed.logo_highlight_stroke {
        config.render.logo_highlight_stroke = v;
    }
    if let Some(v) = parsed.highlight_stroke_width {
        config.render.highlight_stroke_width = v;
    }
    if let Some(v) = parsed.fallback_font_family {
        config.render.fallback_font_family = v;
    }
    if let Some(v) = parsed.assets_dir {
        config.render.assets_dir = v;
    }
    if let Some(v) = parsed.export_file_name {
        config.render.export_file_name = v;
    }
    for (key, preset) in parsed.presets.unwrap_or_default() {
        config.styles.insert(key, preset);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn defaults_match_editor_constants() {
        let config = Config::default();
        assert_eq!(config.layout.max_canvas_width, 900.0);
        assert_eq!(config.layout.line_height, 1.2);
        assert_eq!(config.layout.text_hit_margin, 20.0);
        assert_eq!(config.layout.logo_hit_margin, 10.0);
        assert_eq!(config.render.export_file_name, "edited.png");
    }

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).expect("default config");
        assert_eq!(config.styles.len(), StyleRegistry::builtin().len());
    }

    #[test]
    fn overrides_margins_and_adds_presets() {
        let config = parse_config(
            r##"{
                "textHitMargin": 8,
                "logoHitMargin": -4,
                "presets": {
                    "neon": {"name": "Neon", "style": {"kind": "plain", "fontFamily": "sans-serif",
                             "fill": "#0ff", "stroke": "#f0f", "strokeWidth": 3}}
                }
            }"##,
        )
        .expect("config parses");
        assert_eq!(config.layout.text_hit_margin, 8.0);
        assert_eq!(config.layout.logo_hit_margin, 0.0);
        assert!(matches!(config.styles.resolve("neon").style, Style::Plain(_)));
        assert_eq!(config.styles.iter().last().map(|(key, _)| key), Some("neon"));
    }

    #[test]
    fn rejects_non_positive_canvas_width() {
        assert!(parse_config(r#"{"maxCanvasWidth": 0}"#).is_err());
    }
}
