use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Key of the preset every unknown lookup falls back to.
pub const NONE_PRESET: &str = "none";

static HIDDEN_PRESET: Lazy<StylePreset> = Lazy::new(|| StylePreset {
    name: "None".to_string(),
    style: Style::Hidden,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStyle {
    pub padding_x: f32,
    pub padding_y: f32,
    pub border_color: String,
    pub border_width: f32,
    pub background_color: String,
    pub shadow_color: String,
    pub shadow_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainStyle {
    pub font_family: String,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    #[serde(default)]
    pub letter_spacing: Option<f32>,
}

impl PlainStyle {
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0 && !is_transparent(&self.stroke)
    }

    /// Spacing only switches on per-character drawing when it is positive.
    pub fn letter_spacing(&self) -> Option<f32> {
        self.letter_spacing.filter(|spacing| *spacing > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxedStyle {
    pub font_family: String,
    pub fill: String,
    #[serde(rename = "box")]
    pub label_box: BoxStyle,
}

/// How a block is drawn. Boxed labels never stroke their glyphs and never
/// letter-space them; `Hidden` draws nothing and has no hit region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Style {
    Plain(PlainStyle),
    Boxed(BoxedStyle),
    Hidden,
}

impl Style {
    pub fn font_family(&self) -> Option<&str> {
        match self {
            Style::Plain(plain) => Some(plain.font_family.as_str()),
            Style::Boxed(boxed) => Some(boxed.font_family.as_str()),
            Style::Hidden => None,
        }
    }

    pub fn letter_spacing(&self) -> Option<f32> {
        match self {
            Style::Plain(plain) => plain.letter_spacing(),
            _ => None,
        }
    }

    pub fn label_box(&self) -> Option<&BoxStyle> {
        match self {
            Style::Boxed(boxed) => Some(&boxed.label_box),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    pub name: String,
    pub style: Style,
}

impl StylePreset {
    fn plain(name: &str, font_family: &str, fill: &str, stroke: &str, stroke_width: f32) -> Self {
        Self {
            name: name.to_string(),
            style: Style::Plain(PlainStyle {
                font_family: font_family.to_string(),
                fill: fill.to_string(),
                stroke: stroke.to_string(),
                stroke_width,
                letter_spacing: None,
            }),
        }
    }
}

/// Ordered lookup table of named presets. Keys keep insertion order so a
/// settings list shows them the way they were declared.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    presets: Vec<(String, StylePreset)>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StyleRegistry {
    pub fn builtin() -> Self {
        let mut spaced = StylePreset::plain(
            "Spaced caps",
            "Arial Black, sans-serif",
            "#FFFFFF",
            "#000000",
            4.0,
        );
        if let Style::Plain(plain) = &mut spaced.style {
            plain.letter_spacing = Some(12.0);
        }

        let label = StylePreset {
            name: "Label box".to_string(),
            style: Style::Boxed(BoxedStyle {
                font_family: "Arial, Helvetica, sans-serif".to_string(),
                fill: "#000000".to_string(),
                label_box: BoxStyle {
                    padding_x: 40.0,
                    padding_y: 30.0,
                    border_color: "#000000".to_string(),
                    border_width: 6.0,
                    background_color: "#ffffff".to_string(),
                    shadow_color: "#E87561".to_string(),
                    shadow_offset: 40.0,
                },
            }),
        };

        Self {
            presets: vec![
                (
                    "amo".to_string(),
                    StylePreset::plain(
                        "Amo-style",
                        "Impact, Arial Black, sans-serif",
                        "#FFFFFF",
                        "#FF3B30",
                        8.0,
                    ),
                ),
                (
                    "breaking".to_string(),
                    StylePreset::plain("Breaking", "Anton, sans-serif", "#FFFFFF", "#000000", 8.0),
                ),
                (
                    "simple".to_string(),
                    StylePreset::plain(
                        "Simple white",
                        "system-ui, sans-serif",
                        "#FFFFFF",
                        "transparent",
                        0.0,
                    ),
                ),
                ("spaced".to_string(), spaced),
                ("labelbox".to_string(), label),
                (NONE_PRESET.to_string(), HIDDEN_PRESET.clone()),
            ],
        }
    }

    pub fn get(&self, key: &str) -> Option<&StylePreset> {
        self.presets
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, preset)| preset)
    }

    /// Looks a key up, failing closed to the hidden `none` preset. Does not
    /// log; `Session` reports unknown keys when they are set.
    pub fn resolve(&self, key: &str) -> &StylePreset {
        self.get(key)
            .or_else(|| self.get(NONE_PRESET))
            .unwrap_or(&*HIDDEN_PRESET)
    }

    /// Adds a preset, replacing an existing one with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, preset: StylePreset) {
        let key = key.into();
        if let Some(slot) = self.presets.iter_mut().find(|(candidate, _)| *candidate == key) {
            slot.1 = preset;
        } else {
            self.presets.push((key, preset));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StylePreset)> {
        self.presets.iter().map(|(key, preset)| (key.as_str(), preset))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

pub fn is_transparent(color: &str) -> bool {
    let trimmed = color.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("transparent") || trimmed == "none"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_keep_declaration_order() {
        let registry = StyleRegistry::builtin();
        let keys: Vec<&str> = registry.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["amo", "breaking", "simple", "spaced", "labelbox", "none"]);
    }

    #[test]
    fn unknown_key_falls_back_to_hidden() {
        let registry = StyleRegistry::builtin();
        assert_eq!(registry.resolve("does-not-exist").style, Style::Hidden);
    }

    #[test]
    fn label_box_is_the_only_boxed_builtin() {
        let registry = StyleRegistry::builtin();
        let boxed: Vec<&str> = registry
            .iter()
            .filter(|(_, preset)| preset.style.label_box().is_some())
            .map(|(key, _)| key)
            .collect();
        assert_eq!(boxed, vec!["labelbox"]);
    }

    #[test]
    fn transparent_stroke_is_not_drawn() {
        let registry = StyleRegistry::builtin();
        let Style::Plain(simple) = &registry.resolve("simple").style else {
            panic!("simple should be a plain style");
        };
        assert!(!simple.has_stroke());
        let Style::Plain(amo) = &registry.resolve("amo").style else {
            panic!("amo should be a plain style");
        };
        assert!(amo.has_stroke());
    }

    #[test]
    fn zero_letter_spacing_is_ignored() {
        let style = Style::Plain(PlainStyle {
            font_family: "sans-serif".to_string(),
            fill: "#fff".to_string(),
            stroke: "#000".to_string(),
            stroke_width: 1.0,
            letter_spacing: Some(0.0),
        });
        assert_eq!(style.letter_spacing(), None);
    }

    #[test]
    fn insert_replaces_existing_key_in_place() {
        let mut registry = StyleRegistry::builtin();
        let before = registry.len();
        registry.insert(
            "amo",
            StylePreset::plain("Amo v2", "sans-serif", "#000", "#fff", 2.0),
        );
        assert_eq!(registry.len(), before);
        assert_eq!(registry.resolve("amo").name, "Amo v2");
        assert_eq!(registry.iter().next().map(|(key, _)| key), Some("amo"));
    }

    #[test]
    fn preset_round_trips_through_json() {
        let json = r##"{
            "name": "Neon",
            "style": {"kind": "plain", "fontFamily": "sans-serif", "fill": "#0ff",
                      "stroke": "#f0f", "strokeWidth": 3, "letterSpacing": 6}
        }"##;
        let preset: StylePreset = serde_json::from_str(json).expect("preset json");
        assert_eq!(preset.style.letter_spacing(), Some(6.0));
    }
}
