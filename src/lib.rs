pub mod assets;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod render;
pub mod session;
pub mod style;
pub mod text_metrics;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use controller::{DragState, InteractionController, PointerEvent};
pub use error::OverlayError;
pub use hit_test::{HitTarget, find_text_hit, hit_logo, hit_test};
pub use layout::{SceneLayout, compute_scene_layout};
pub use model::{LogoColor, LogoState, Point, Scene, TextBlock};
pub use render::{CanvasSize, Frame, canvas_size, render_svg};
pub use session::Session;
pub use style::{Style, StylePreset, StyleRegistry};
pub use text_metrics::{CharTable, SystemFonts, TextMeasure};
