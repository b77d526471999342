use crate::text_metrics::TextMeasure;

use super::{GlyphLayout, LineLayout};

/// Splits block text into lines. Empty text has no lines at all, so an
/// empty block draws nothing and has no hit region.
pub(super) fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

pub(super) fn line_center_y(center_y: f32, index: usize, count: usize, line_height: f32) -> f32 {
    center_y + (index as f32 - (count as f32 - 1.0) / 2.0) * line_height
}

pub(super) fn layout_line(
    text: String,
    center_x: f32,
    center_y: f32,
    font_size: f32,
    font_family: &str,
    letter_spacing: Option<f32>,
    measurer: &dyn TextMeasure,
) -> LineLayout {
    let Some(spacing) = letter_spacing else {
        let width = measurer.measure(&text, font_size, font_family);
        return LineLayout {
            text,
            center_y,
            width,
            glyphs: None,
        };
    };

    let widths: Vec<(char, f32)> = text
        .chars()
        .map(|ch| (ch, measurer.measure(&ch.to_string(), font_size, font_family)))
        .collect();
    let width = spaced_width(&widths, spacing);

    let mut glyphs = Vec::with_capacity(widths.len());
    let mut cursor = center_x - width / 2.0;
    for (ch, glyph_width) in widths {
        glyphs.push(GlyphLayout {
            ch,
            x: cursor,
            width: glyph_width,
        });
        cursor += glyph_width + spacing;
    }

    LineLayout {
        text,
        center_y,
        width,
        glyphs: Some(glyphs),
    }
}

fn spaced_width(widths: &[(char, f32)], spacing: f32) -> f32 {
    if widths.is_empty() {
        return 0.0;
    }
    let glyphs: f32 = widths.iter().map(|(_, width)| width).sum();
    glyphs + spacing * (widths.len() - 1) as f32
}
