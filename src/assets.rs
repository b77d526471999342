use crate::error::OverlayError;
use crate::model::LogoColor;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use log::{debug, info, warn};
use std::io::Cursor;
use std::path::Path;

/// A decoded raster, kept re-encoded as PNG so it can be embedded in the
/// SVG frame regardless of the upload's original format.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    png: Vec<u8>,
}

impl DecodedImage {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, OverlayError> {
    let decoded = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(DecodedImage {
        width: decoded.width(),
        height: decoded.height(),
        png,
    })
}

/// Identifies one load request. Only the most recent ticket of a slot may
/// complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Empty,
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request was made after this one; the result was dropped.
    Stale,
    /// Decoding failed; the previously loaded image is still in place.
    Failed,
}

/// Holds the latest successfully decoded image for one source, e.g. the
/// background photo or one logo variant.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    generation: u64,
    source: Option<String>,
    image: Option<DecodedImage>,
    status: LoadStatus,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, source: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        let source = source.into();
        debug!("image load #{} requested for {source}", self.generation);
        self.source = Some(source);
        self.status = LoadStatus::Pending;
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn finish(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecodedImage, OverlayError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                "dropping stale image load #{} (latest is #{})",
                ticket.generation, self.generation
            );
            return LoadOutcome::Stale;
        }
        match result {
            Ok(image) => {
                info!(
                    "loaded {} ({}x{})",
                    self.source.as_deref().unwrap_or("image"),
                    image.width,
                    image.height
                );
                self.image = Some(image);
                self.status = LoadStatus::Ready;
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(
                    "{}: {err}",
                    self.source.as_deref().unwrap_or("image")
                );
                self.status = LoadStatus::Failed(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Begins and completes a load in one step with bytes already in hand.
    pub fn load_bytes(&mut self, source: impl Into<String>, bytes: &[u8]) -> LoadOutcome {
        let ticket = self.begin(source);
        self.finish(ticket, decode_image(bytes))
    }

    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogoAssets {
    black: ImageSlot,
    white: ImageSlot,
}

impl LogoAssets {
    pub fn slot(&self, color: LogoColor) -> &ImageSlot {
        match color {
            LogoColor::Black => &self.black,
            LogoColor::White => &self.white,
        }
    }

    pub fn slot_mut(&mut self, color: LogoColor) -> &mut ImageSlot {
        match color {
            LogoColor::Black => &mut self.black,
            LogoColor::White => &mut self.white,
        }
    }

    pub fn get(&self, color: LogoColor) -> Option<&DecodedImage> {
        self.slot(color).image()
    }

    /// Loads both variants from `logo-black.png` / `logo-white.png` in `dir`.
    /// A missing or broken file only leaves that variant unavailable.
    pub fn load_dir(&mut self, dir: &Path) {
        for color in [LogoColor::Black, LogoColor::White] {
            let path = dir.join(color.asset_file_name());
            let slot = self.slot_mut(color);
            let ticket = slot.begin(path.display().to_string());
            let result = std::fs::read(&path)
                .map_err(OverlayError::from)
                .and_then(|bytes| decode_image(&bytes));
            slot.finish(ticket, result);
        }
    }
}
