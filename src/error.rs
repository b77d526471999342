/// Failures surfaced by the overlay library. Everything is local and
/// non-fatal: callers keep their previous frame and may retry by hand.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// The image bytes could not be decoded or re-encoded
    #[error("could not load image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering needs a decoded background photo
    #[error("no background image loaded")]
    NoBackground,

    #[error("failed to rasterize frame: {0}")]
    Rasterize(String),

    #[error("invalid scene: {0}")]
    Scene(String),
}
