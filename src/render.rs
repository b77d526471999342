use crate::assets::DecodedImage;
use crate::config::{LayoutConfig, RenderConfig};
use crate::hit_test::{HitTarget, highlight_rect, logo_region};
use crate::layout::{BlockFrame, BlockLayout, LineLayout, Rect, SceneLayout};
use crate::model::Point;
use crate::style::{PlainStyle, Style};
use anyhow::Result;
use std::path::Path;

/// Size of the drawing surface after fitting the photo to the width cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub scale: f32,
    pub width: u32,
    pub height: u32,
}

pub fn canvas_size(image_width: u32, image_height: u32, max_width: f32) -> CanvasSize {
    let scale = if image_width as f32 > max_width {
        max_width / image_width as f32
    } else {
        1.0
    };
    CanvasSize {
        scale,
        width: ((image_width as f32 * scale).floor() as u32).max(1),
        height: ((image_height as f32 * scale).floor() as u32).max(1),
    }
}

/// Everything one render pass reads. Block coordinates are already in
/// canvas pixels; they are not rescaled with the background.
pub struct Frame<'a> {
    pub layout: &'a SceneLayout,
    pub background: &'a DecodedImage,
    pub canvas: CanvasSize,
    pub logo: Option<&'a DecodedImage>,
    pub hover: Option<HitTarget>,
}

pub fn render_svg(
    frame: &Frame<'_>,
    layout_cfg: &LayoutConfig,
    render_cfg: &RenderConfig,
) -> String {
    let mut svg = String::new();
    let width = frame.canvas.width;
    let height = frame.canvas.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&image_svg(
        Rect {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        },
        frame.background,
    ));

    for block in &frame.layout.blocks {
        if frame.hover != Some(HitTarget::Text(block.id)) {
            continue;
        }
        if let Some(rect) = highlight_rect(block, layout_cfg) {
            svg.push_str(&highlight_svg(
                &rect,
                &render_cfg.text_highlight_fill,
                &render_cfg.text_highlight_stroke,
                render_cfg.highlight_stroke_width,
            ));
        }
    }

    if frame.hover == Some(HitTarget::Logo)
        && let Some(rect) = logo_region(frame.layout, layout_cfg)
    {
        svg.push_str(&highlight_svg(
            &rect,
            &render_cfg.logo_highlight_fill,
            &render_cfg.logo_highlight_stroke,
            render_cfg.highlight_stroke_width,
        ));
    }

    for block in &frame.layout.blocks {
        svg.push_str(&block_svg(block));
    }

    if let (Some(logo), Some(image)) = (&frame.layout.logo, frame.logo) {
        svg.push_str(&image_svg(logo.bounds, image));
    }

    svg.push_str("</svg>");
    svg
}

fn image_svg(rect: Rect, image: &DecodedImage) -> String {
    format!(
        "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" preserveAspectRatio=\"none\" xlink:href=\"{}\"/>",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        image.data_uri()
    )
}

fn highlight_svg(rect: &Rect, fill: &str, stroke: &str, stroke_width: f32) -> String {
    format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        escape_xml(fill),
        escape_xml(stroke),
        stroke_width
    )
}

fn block_svg(block: &BlockLayout) -> String {
    let mut out = String::new();
    if block.is_empty() {
        return out;
    }

    match &block.style {
        Style::Hidden => {}
        Style::Boxed(boxed) => {
            if let BlockFrame::Boxed { rect, shadow, .. } = &block.frame {
                let label = &boxed.label_box;
                out.push_str(&format!(
                    "<path d=\"{}\" fill=\"{}\"/>",
                    points_to_path(shadow),
                    escape_xml(&label.shadow_color)
                ));
                out.push_str(&format!(
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    escape_xml(&label.background_color)
                ));
                out.push_str(&format!(
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    escape_xml(&label.border_color),
                    label.border_width
                ));
            }
            let font = font_attrs(&boxed.font_family, block.font_size);
            for line in &block.lines {
                out.push_str(&line_svg(block.center.x, line, &font, &fill_paint(&boxed.fill)));
            }
        }
        Style::Plain(plain) => {
            let font = font_attrs(&plain.font_family, block.font_size);
            let stroke = plain.has_stroke().then(|| stroke_paint(plain));
            let fill = fill_paint(&plain.fill);
            for line in &block.lines {
                let Some(glyphs) = &line.glyphs else {
                    if let Some(stroke) = &stroke {
                        out.push_str(&line_svg(block.center.x, line, &font, stroke));
                    }
                    out.push_str(&line_svg(block.center.x, line, &font, &fill));
                    continue;
                };
                for glyph in glyphs.iter().filter(|glyph| !glyph.ch.is_whitespace()) {
                    let ch = glyph.ch.to_string();
                    if let Some(stroke) = &stroke {
                        out.push_str(&glyph_svg(glyph.x, line.center_y, &ch, &font, stroke));
                    }
                    out.push_str(&glyph_svg(glyph.x, line.center_y, &ch, &font, &fill));
                }
            }
        }
    }
    out
}

fn font_attrs(font_family: &str, font_size: f32) -> String {
    format!(
        "font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\"",
        escape_xml(font_family),
        font_size
    )
}

fn fill_paint(fill: &str) -> String {
    format!("fill=\"{}\"", escape_xml(fill))
}

fn stroke_paint(plain: &PlainStyle) -> String {
    format!(
        "fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"",
        escape_xml(&plain.stroke),
        plain.stroke_width
    )
}

fn line_svg(x: f32, line: &LineLayout, font: &str, paint: &str) -> String {
    if line.text.is_empty() {
        return String::new();
    }
    format!(
        "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" xml:space=\"preserve\" {font} {paint}>{}</text>",
        line.center_y,
        escape_xml(&line.text)
    )
}

fn glyph_svg(x: f32, y: f32, ch: &str, font: &str, paint: &str) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"start\" dominant-baseline=\"central\" {font} {paint}>{}</text>",
        escape_xml(ch)
    )
}

fn points_to_path(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first.x, first.y);
    for point in rest {
        d.push_str(&format!(" L {:.2} {:.2}", point.x, point.y));
    }
    d.push_str(" Z");
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn rasterize_png(svg: &str, render_cfg: &RenderConfig) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.font_family = render_cfg.fallback_font_family.clone();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap =
        resvg::tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            anyhow::anyhow!("Failed to allocate {}x{} pixmap", size.width(), size.height())
        })?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    Ok(pixmap.encode_png()?)
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let png = rasterize_png(svg, render_cfg)?;
    std::fs::write(output, png)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
