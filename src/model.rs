use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A position in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A positioned, styled text unit. `x`/`y` is the center of the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub id: u32,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub preset: String,
    pub font_size: f32,
}

impl TextBlock {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoColor {
    #[default]
    Black,
    White,
}

impl LogoColor {
    pub fn asset_file_name(self) -> &'static str {
        match self {
            LogoColor::Black => "logo-black.png",
            LogoColor::White => "logo-white.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoState {
    pub enabled: bool,
    pub color: LogoColor,
    pub scale: f32,
    pub position: Point,
}

impl Default for LogoState {
    fn default() -> Self {
        Self {
            enabled: true,
            color: LogoColor::Black,
            scale: 0.5,
            position: Point::new(200.0, 200.0),
        }
    }
}

/// Everything the user edits: text blocks in draw order plus the logo slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub blocks: Vec<TextBlock>,
    pub logo: LogoState,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            blocks: vec![
                TextBlock {
                    id: 1,
                    text: "FIRST\nTEXT".to_string(),
                    x: 500.0,
                    y: 500.0,
                    preset: "amo".to_string(),
                    font_size: 70.0,
                },
                TextBlock {
                    id: 2,
                    text: String::new(),
                    x: 300.0,
                    y: 380.0,
                    preset: "none".to_string(),
                    font_size: 0.0,
                },
            ],
            logo: LogoState::default(),
        }
    }
}

impl Scene {
    pub fn block(&self, id: u32) -> Option<&TextBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn block_mut(&mut self, id: u32) -> Option<&mut TextBlock> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    /// Ids must stay unique; returns the first id seen twice.
    pub fn duplicate_id(&self) -> Option<u32> {
        let mut seen = std::collections::HashSet::new();
        self.blocks
            .iter()
            .map(|block| block.id)
            .find(|id| !seen.insert(*id))
    }
}
