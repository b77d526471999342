use crate::assets::{DecodedImage, ImageSlot, LoadOutcome, LoadTicket, LogoAssets};
use crate::config::Config;
use crate::controller::{DragState, InteractionController, PointerEvent};
use crate::error::OverlayError;
use crate::hit_test::{HitTarget, hit_test};
use crate::layout::{SceneLayout, compute_scene_layout};
use crate::model::{LogoColor, Point, Scene};
use crate::render::{CanvasSize, Frame, canvas_size, render_svg};
use crate::text_metrics::{SystemFonts, TextMeasure};
use log::debug;
use std::path::Path;

/// One editing session: the photo, the scene drawn over it, and the pointer
/// state. All mutation of the scene goes through here.
pub struct Session {
    config: Config,
    scene: Scene,
    background: ImageSlot,
    logos: LogoAssets,
    controller: InteractionController,
    measurer: Box<dyn TextMeasure>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_measurer(config, SystemFonts)
    }

    pub fn with_measurer(config: Config, measurer: impl TextMeasure + 'static) -> Self {
        Self {
            config,
            scene: Scene::default(),
            background: ImageSlot::new(),
            logos: LogoAssets::default(),
            controller: InteractionController::new(),
            measurer: Box::new(measurer),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Replaces the whole scene. Rejects duplicate ids, non-finite geometry
    /// and a logo scale that is not positive.
    pub fn set_scene(&mut self, scene: Scene) -> Result<(), OverlayError> {
        if let Some(id) = scene.duplicate_id() {
            return Err(OverlayError::Scene(format!("duplicate block id {id}")));
        }
        let logo = &scene.logo;
        if !(logo.scale.is_finite() && logo.scale > 0.0) {
            return Err(OverlayError::Scene(format!(
                "logo scale must be positive, got {}",
                logo.scale
            )));
        }
        if !(logo.position.x.is_finite() && logo.position.y.is_finite()) {
            return Err(OverlayError::Scene("logo position is not finite".to_string()));
        }
        for block in &scene.blocks {
            if !(block.x.is_finite() && block.y.is_finite() && block.font_size.is_finite()) {
                return Err(OverlayError::Scene(format!(
                    "block {} has a non-finite position or font size",
                    block.id
                )));
            }
            if self.config.styles.get(&block.preset).is_none() {
                debug!("block {} uses unknown preset {:?}", block.id, block.preset);
            }
        }
        self.scene = scene;
        self.controller = InteractionController::new();
        Ok(())
    }

    /// Handles a file pick. `None` means the picker was dismissed.
    pub fn upload_background(&mut self, file: Option<(&str, &[u8])>) -> Option<LoadOutcome> {
        let (name, bytes) = file?;
        Some(self.background.load_bytes(name, bytes))
    }

    pub fn begin_background_load(&mut self, source: impl Into<String>) -> LoadTicket {
        self.background.begin(source)
    }

    pub fn finish_background_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecodedImage, OverlayError>,
    ) -> LoadOutcome {
        self.background.finish(ticket, result)
    }

    pub fn background(&self) -> &ImageSlot {
        &self.background
    }

    pub fn load_logo(&mut self, color: LogoColor, source: &str, bytes: &[u8]) -> LoadOutcome {
        self.logos.slot_mut(color).load_bytes(source, bytes)
    }

    pub fn load_logos_from(&mut self, dir: &Path) {
        self.logos.load_dir(dir);
    }

    pub fn load_default_logos(&mut self) {
        let dir = self.config.render.assets_dir.clone();
        self.logos.load_dir(&dir);
    }

    pub fn set_text(&mut self, id: u32, text: impl Into<String>) -> bool {
        self.scene
            .block_mut(id)
            .map(|block| block.text = text.into())
            .is_some()
    }

    pub fn set_font_size(&mut self, id: u32, font_size: f32) -> bool {
        self.scene
            .block_mut(id)
            .map(|block| block.font_size = font_size.max(0.0))
            .is_some()
    }

    /// Accepts any key; unknown keys render as the hidden preset.
    pub fn set_preset(&mut self, id: u32, preset: impl Into<String>) -> bool {
        let preset = preset.into();
        if self.config.styles.get(&preset).is_none() {
            debug!("block {id} set to unknown preset {preset:?}");
        }
        self.scene
            .block_mut(id)
            .map(|block| block.preset = preset)
            .is_some()
    }

    pub fn set_logo_enabled(&mut self, enabled: bool) {
        self.scene.logo.enabled = enabled;
    }

    pub fn set_logo_color(&mut self, color: LogoColor) {
        self.scene.logo.color = color;
    }

    /// Non-positive scales are ignored.
    pub fn set_logo_scale(&mut self, scale: f32) -> bool {
        if scale <= 0.0 || !scale.is_finite() {
            return false;
        }
        self.scene.logo.scale = scale;
        true
    }

    pub fn layout(&self) -> SceneLayout {
        let logo_size = self.logos.get(self.scene.logo.color).map(DecodedImage::size);
        compute_scene_layout(
            &self.scene,
            logo_size,
            &self.config.styles,
            self.measurer.as_ref(),
            &self.config.layout,
        )
    }

    pub fn canvas_size(&self) -> Option<CanvasSize> {
        self.background.image().map(|image| {
            canvas_size(image.width, image.height, self.config.layout.max_canvas_width)
        })
    }

    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        hit_test(&self.layout(), point, &self.config.layout)
    }

    pub fn hover(&self) -> Option<HitTarget> {
        self.controller.hover()
    }

    pub fn drag(&self) -> DragState {
        self.controller.drag()
    }

    pub fn pointer_down(&mut self, point: Point) -> bool {
        let layout = self.layout();
        self.controller
            .pointer_down(point, &self.scene, &layout, &self.config.layout)
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        let layout = self.layout();
        self.controller
            .pointer_move(point, &mut self.scene, &layout, &self.config.layout)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.controller.pointer_up()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.controller.pointer_leave()
    }

    /// Feeds one event through the controller; returns whether to redraw.
    pub fn apply_event(&mut self, event: PointerEvent) -> bool {
        let layout = self.layout();
        self.controller
            .handle(event, &mut self.scene, &layout, &self.config.layout)
    }

    pub fn render_svg(&self) -> Result<String, OverlayError> {
        let background = self.background.image().ok_or(OverlayError::NoBackground)?;
        let layout = self.layout();
        let frame = Frame {
            layout: &layout,
            background,
            canvas: canvas_size(
                background.width,
                background.height,
                self.config.layout.max_canvas_width,
            ),
            logo: self.logos.get(self.scene.logo.color),
            hover: self.controller.hover(),
        };
        Ok(render_svg(&frame, &self.config.layout, &self.config.render))
    }

    #[cfg(feature = "png")]
    pub fn export_png(&self) -> Result<Vec<u8>, OverlayError> {
        let svg = self.render_svg()?;
        crate::render::rasterize_png(&svg, &self.config.render)
            .map_err(|err| OverlayError::Rasterize(err.to_string()))
    }

    /// Writes the PNG to `dir` under the configured export name
    /// (`edited.png` by default) and returns the written path.
    #[cfg(feature = "png")]
    pub fn export_png_to(&self, dir: &Path) -> Result<std::path::PathBuf, OverlayError> {
        let path = dir.join(&self.config.render.export_file_name);
        std::fs::write(&path, self.export_png()?)?;
        log::info!("exported {}", path.display());
        Ok(path)
    }
}
