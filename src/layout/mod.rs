mod text;
pub(crate) mod types;
pub use types::*;
use text::*;

use crate::config::LayoutConfig;
use crate::model::{LogoState, Point, Scene, TextBlock};
use crate::style::{Style, StyleRegistry};
use crate::text_metrics::TextMeasure;

/// Computes the geometry of every block, in array order, plus the logo box
/// when the logo is enabled and its natural size is known.
pub fn compute_scene_layout(
    scene: &Scene,
    logo_size: Option<(u32, u32)>,
    styles: &StyleRegistry,
    measurer: &dyn TextMeasure,
    config: &LayoutConfig,
) -> SceneLayout {
    let blocks = scene
        .blocks
        .iter()
        .map(|block| compute_block_layout(block, styles, measurer, config))
        .collect();
    let logo = logo_size.and_then(|size| compute_logo_layout(&scene.logo, size));
    SceneLayout { blocks, logo }
}

pub fn compute_block_layout(
    block: &TextBlock,
    styles: &StyleRegistry,
    measurer: &dyn TextMeasure,
    config: &LayoutConfig,
) -> BlockLayout {
    let style = styles.resolve(&block.preset).style.clone();
    let center = block.position();
    let font_size = block.font_size.max(0.0);
    let line_height = font_size * config.line_height;

    let lines: Vec<LineLayout> = match style.font_family() {
        Some(family) => {
            let raw = split_lines(&block.text);
            let count = raw.len();
            raw.into_iter()
                .enumerate()
                .map(|(idx, line)| {
                    layout_line(
                        line,
                        center.x,
                        line_center_y(center.y, idx, count, line_height),
                        font_size,
                        family,
                        style.letter_spacing(),
                        measurer,
                    )
                })
                .collect()
        }
        None => Vec::new(),
    };

    let text_width = lines.iter().map(|line| line.width).fold(0.0, f32::max);
    let text_height = lines.len() as f32 * line_height;
    let text_bounds = Rect::from_center(center, text_width, text_height);

    let frame = match &style {
        Style::Boxed(boxed) if !lines.is_empty() => {
            let label = &boxed.label_box;
            let rect = text_bounds.expand_xy(label.padding_x, label.padding_y);
            BlockFrame::Boxed {
                rect,
                shadow: shadow_quad(&rect, label.shadow_offset),
                shadow_offset: label.shadow_offset,
            }
        }
        _ => BlockFrame::Plain,
    };

    BlockLayout {
        id: block.id,
        center,
        font_size,
        line_height,
        lines,
        text_width,
        text_height,
        text_bounds,
        frame,
        style,
    }
}

/// Parallelogram hanging off the bottom edge of a label box, slanted
/// down and to the left by `offset`.
fn shadow_quad(rect: &Rect, offset: f32) -> [Point; 4] {
    let bottom = rect.bottom();
    [
        Point::new(rect.left(), bottom),
        Point::new(rect.right(), bottom),
        Point::new(rect.right() - offset, bottom + offset),
        Point::new(rect.left() - offset, bottom + offset),
    ]
}

pub fn compute_logo_layout(logo: &LogoState, natural_size: (u32, u32)) -> Option<LogoLayout> {
    if !logo.enabled {
        return None;
    }
    let width = natural_size.0 as f32 * logo.scale;
    let height = natural_size.1 as f32 * logo.scale;
    Some(LogoLayout {
        color: logo.color,
        bounds: Rect::from_center(logo.position, width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::CharTable;

    fn block(text: &str, preset: &str, font_size: f32) -> TextBlock {
        TextBlock {
            id: 7,
            text: text.to_string(),
            x: 500.0,
            y: 500.0,
            preset: preset.to_string(),
            font_size,
        }
    }

    fn layout_of(block: &TextBlock) -> BlockLayout {
        compute_block_layout(
            block,
            &StyleRegistry::builtin(),
            &CharTable,
            &LayoutConfig::default(),
        )
    }

    #[test]
    fn two_line_block_is_symmetric_around_center() {
        let layout = layout_of(&block("FIRST\nTEXT", "amo", 70.0));
        assert_eq!(layout.lines.len(), 2);
        let spacing = layout.lines[1].center_y - layout.lines[0].center_y;
        assert!((spacing - 84.0).abs() < 1e-3);
        let above = 500.0 - layout.lines[0].center_y;
        let below = layout.lines[1].center_y - 500.0;
        assert!((above - below).abs() < 1e-3);
        assert!((layout.text_height - 168.0).abs() < 1e-3);
    }

    #[test]
    fn text_width_is_widest_line() {
        let layout = layout_of(&block("FIRST\nTEXT", "amo", 70.0));
        let widest = layout.lines.iter().map(|l| l.width).fold(0.0, f32::max);
        assert_eq!(layout.text_width, widest);
        assert_eq!(layout.text_width, layout.lines[0].width);
    }

    #[test]
    fn boxed_rect_contains_padded_text() {
        let layout = layout_of(&block("SALE\ntoday only", "labelbox", 48.0));
        let BlockFrame::Boxed { rect, shadow, shadow_offset } = &layout.frame else {
            panic!("labelbox should produce a boxed frame");
        };
        let padded = layout.text_bounds.expand_xy(40.0, 30.0);
        assert!(rect.contains_rect(&padded));
        assert!(rect.contains_rect(&layout.text_bounds));
        assert_eq!(*shadow_offset, 40.0);
        assert_eq!(shadow[0], Point::new(rect.left(), rect.bottom()));
        assert_eq!(shadow[2], Point::new(rect.right() - 40.0, rect.bottom() + 40.0));
        assert_eq!(shadow[3], Point::new(rect.left() - 40.0, rect.bottom() + 40.0));
    }

    #[test]
    fn hidden_preset_has_no_lines() {
        let layout = layout_of(&block("visible?", "none", 40.0));
        assert!(layout.is_empty());
        assert_eq!(layout.text_bounds.width, 0.0);
    }

    #[test]
    fn unknown_preset_fails_closed() {
        let layout = layout_of(&block("hello", "missing", 40.0));
        assert_eq!(layout.style, Style::Hidden);
        assert!(layout.is_empty());
    }

    #[test]
    fn letter_spacing_widens_line() {
        let plain = layout_of(&block("SPACE", "breaking", 40.0));
        let spaced = layout_of(&block("SPACE", "spaced", 40.0));
        assert!(spaced.lines[0].glyphs.is_some());
        assert!(plain.lines[0].glyphs.is_none());
        let expected = plain.lines[0].width + 12.0 * 4.0;
        assert!((spaced.lines[0].width - expected).abs() < 0.01);
    }

    #[test]
    fn empty_boxed_block_has_no_label_box() {
        let layout = layout_of(&block("", "labelbox", 48.0));
        assert_eq!(layout.frame, BlockFrame::Plain);
        assert!(layout.is_empty());
    }

    #[test]
    fn logo_layout_scales_natural_size() {
        let logo = LogoState::default();
        let layout = compute_logo_layout(&logo, (400, 200)).expect("enabled");
        assert_eq!(layout.bounds, Rect::from_center(Point::new(200.0, 200.0), 200.0, 100.0));
        let disabled = LogoState {
            enabled: false,
            ..LogoState::default()
        };
        assert!(compute_logo_layout(&disabled, (400, 200)).is_none());
    }
}
