use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static SYSTEM_FONTS: Lazy<Mutex<FontCache>> = Lazy::new(|| Mutex::new(FontCache::new()));

// Advance used for glyphs a face cannot map, in em.
const MISSING_GLYPH_EM: f32 = 0.56;

/// Measures the rendered width of a run of text in the bold weight of a
/// font family. Implementations must sum per-character advances without
/// kerning so that measuring a line and measuring each of its characters
/// agree.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32, font_family: &str) -> f32;
}

/// Real advances read from the system's font files, falling back to the
/// character table when no face matches the family list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFonts;

impl TextMeasure for SystemFonts {
    fn measure(&self, text: &str, font_size: f32, font_family: &str) -> f32 {
        measure_text_width(text, font_size, font_family)
            .unwrap_or_else(|| CharTable.measure(text, font_size, font_family))
    }
}

/// Deterministic widths from a per-character table tuned for bold sans
/// faces. Used when fonts are unavailable and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTable;

impl TextMeasure for CharTable {
    fn measure(&self, text: &str, font_size: f32, _font_family: &str) -> f32 {
        if font_size <= 0.0 {
            return 0.0;
        }
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(bold_char_width_factor)
            .sum::<f32>()
            * font_size
    }
}

pub fn bold_char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.28,
        'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | ';' | '|' | '!' => 0.28,
        '(' | ')' | '[' | ']' | '{' | '}' | 'I' | 'f' | 't' | 'r' => 0.36,
        'm' | 'w' => 0.89,
        'M' | 'W' | '@' | '%' | '&' => 0.94,
        'A'..='Z' => 0.72,
        '0'..='9' => 0.56,
        'a'..='z' => 0.60,
        _ => 0.64,
    }
}

pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = SYSTEM_FONTS.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct FontCache {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<BoldFace>>,
}

impl FontCache {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            if face.is_none() {
                warn!("no bold face found for font family {key:?}");
            }
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        Some(face.measure_width(&text.replace('\t', "    "), font_size))
    }

    fn load_face(&mut self, font_family: &str) -> Option<BoldFace> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|part| !part.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => Family::SansSerif,
                "monospace" | "ui-monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
            debug!("loaded {} system font faces", self.db.len());
        }

        let query = Query {
            families: &families,
            weight: Weight::BOLD,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| {
                let face = Face::parse(data, index).ok()?;
                Some(BoldFace {
                    data: data.to_vec(),
                    index,
                    units_per_em: face.units_per_em().max(1),
                    advances: HashMap::new(),
                })
            })
            .flatten()
    }
}

struct BoldFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    advances: HashMap<char, Option<u16>>,
}

impl BoldFace {
    fn measure_width(&mut self, text: &str, font_size: f32) -> f32 {
        if text.chars().any(|ch| !self.advances.contains_key(&ch)) {
            let face = Face::parse(&self.data, self.index).ok();
            for ch in text.chars() {
                self.advances.entry(ch).or_insert_with(|| {
                    let face = face.as_ref()?;
                    face.glyph_index(ch)
                        .and_then(|glyph| face.glyph_hor_advance(glyph))
                });
            }
        }

        let scale = font_size / self.units_per_em as f32;
        let missing = font_size * MISSING_GLYPH_EM;
        text.chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| match self.advances.get(&ch).copied().flatten() {
                Some(advance) if advance > 0 => advance as f32 * scale,
                _ => missing,
            })
            .sum::<f32>()
            .max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
