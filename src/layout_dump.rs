use crate::config::LayoutConfig;
use crate::hit_test::{block_hit_regions, logo_region};
use crate::layout::{BlockFrame, Rect, SceneLayout};
use crate::model::Scene;
use crate::render::CanvasSize;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub canvas_width: Option<u32>,
    pub canvas_height: Option<u32>,
    pub blocks: Vec<BlockDump>,
    pub logo: Option<LogoDump>,
}

#[derive(Debug, Serialize)]
pub struct BlockDump {
    pub id: u32,
    pub preset: String,
    pub style: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub lines: Vec<String>,
    pub line_centers: Vec<f32>,
    pub text_width: f32,
    pub text_height: f32,
    pub bounds: [f32; 4],
    pub shadow: Option<Vec<[f32; 2]>>,
    pub hit_regions: Vec<[f32; 4]>,
}

#[derive(Debug, Serialize)]
pub struct LogoDump {
    pub color: String,
    pub bounds: [f32; 4],
    pub hit_region: Option<[f32; 4]>,
}

fn rect_array(rect: &Rect) -> [f32; 4] {
    [rect.x, rect.y, rect.width, rect.height]
}

impl LayoutDump {
    pub fn from_layout(
        layout: &SceneLayout,
        scene: &Scene,
        canvas: Option<CanvasSize>,
        config: &LayoutConfig,
    ) -> Self {
        let blocks = layout
            .blocks
            .iter()
            .map(|block| BlockDump {
                id: block.id,
                preset: scene
                    .block(block.id)
                    .map(|source| source.preset.clone())
                    .unwrap_or_default(),
                style: match &block.frame {
                    BlockFrame::Boxed { .. } => "boxed",
                    BlockFrame::Plain if block.style.letter_spacing().is_some() => "spaced",
                    BlockFrame::Plain if block.style.font_family().is_some() => "plain",
                    BlockFrame::Plain => "hidden",
                }
                .to_string(),
                x: block.center.x,
                y: block.center.y,
                font_size: block.font_size,
                lines: block.lines.iter().map(|line| line.text.clone()).collect(),
                line_centers: block.lines.iter().map(|line| line.center_y).collect(),
                text_width: block.text_width,
                text_height: block.text_height,
                bounds: rect_array(&block.bounds()),
                shadow: match &block.frame {
                    BlockFrame::Boxed { shadow, .. } => {
                        Some(shadow.iter().map(|point| [point.x, point.y]).collect())
                    }
                    BlockFrame::Plain => None,
                },
                hit_regions: block_hit_regions(block, config)
                    .iter()
                    .map(rect_array)
                    .collect(),
            })
            .collect();

        let logo = layout.logo.as_ref().map(|logo| LogoDump {
            color: format!("{:?}", logo.color).to_lowercase(),
            bounds: rect_array(&logo.bounds),
            hit_region: logo_region(layout, config).as_ref().map(rect_array),
        });

        LayoutDump {
            canvas_width: canvas.map(|c| c.width),
            canvas_height: canvas.map(|c| c.height),
            blocks,
            logo,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &SceneLayout,
    scene: &Scene,
    canvas: Option<CanvasSize>,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, scene, canvas, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_scene_layout;
    use crate::style::StyleRegistry;
    use crate::text_metrics::CharTable;

    #[test]
    fn dumps_default_scene() {
        let scene = Scene::default();
        let config = LayoutConfig::default();
        let layout = compute_scene_layout(
            &scene,
            Some((100, 40)),
            &StyleRegistry::builtin(),
            &CharTable,
            &config,
        );
        let dump = LayoutDump::from_layout(&layout, &scene, None, &config);
        assert_eq!(dump.blocks.len(), 2);
        assert_eq!(dump.blocks[0].lines, vec!["FIRST", "TEXT"]);
        assert_eq!(dump.blocks[0].style, "plain");
        assert_eq!(dump.blocks[0].hit_regions.len(), 2);
        assert_eq!(dump.blocks[1].style, "hidden");
        assert!(dump.blocks[1].hit_regions.is_empty());
        let logo = dump.logo.expect("logo dumped");
        assert_eq!(logo.color, "black");
        assert_eq!(logo.hit_region, Some([165.0, 180.0, 70.0, 40.0]));

        let json = serde_json::to_value(
            LayoutDump::from_layout(&layout, &scene, None, &config),
        )
        .expect("serializes");
        assert_eq!(json["blocks"][0]["line_centers"][1], 542.0);
    }
}
