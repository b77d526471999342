use crate::model::{LogoColor, Point};
use crate::style::Style;

/// Axis-aligned rectangle stored as its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn expand(&self, margin: f32) -> Self {
        self.expand_xy(margin, margin)
    }

    pub fn expand_xy(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + dx * 2.0,
            height: self.height + dy * 2.0,
        }
    }

    pub fn extend_bottom(&self, amount: f32) -> Self {
        Self {
            height: self.height + amount,
            ..*self
        }
    }

    /// Inclusive on every edge, matching how pointer coordinates on a
    /// boundary pixel still select the entity.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }
}

/// One glyph of a letter-spaced line; `x` is its left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphLayout {
    pub ch: char,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub text: String,
    pub center_y: f32,
    pub width: f32,
    /// Present only when the block's style letter-spaces its glyphs.
    pub glyphs: Option<Vec<GlyphLayout>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockFrame {
    Plain,
    Boxed {
        rect: Rect,
        /// bottom-left, bottom-right, bottom-right shifted, bottom-left shifted
        shadow: [Point; 4],
        shadow_offset: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub id: u32,
    pub center: Point,
    pub font_size: f32,
    pub line_height: f32,
    pub lines: Vec<LineLayout>,
    pub text_width: f32,
    pub text_height: f32,
    /// Measured text box centered on the block, without padding.
    pub text_bounds: Rect,
    pub frame: BlockFrame,
    pub style: Style,
}

impl BlockLayout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The drawn outline: the label box for boxed styles, else the text box.
    pub fn bounds(&self) -> Rect {
        match &self.frame {
            BlockFrame::Boxed { rect, .. } => *rect,
            BlockFrame::Plain => self.text_bounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoLayout {
    pub color: LogoColor,
    pub bounds: Rect,
}

/// Geometry of a whole frame. `logo` is absent when the logo is disabled or
/// its asset has not finished decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneLayout {
    pub blocks: Vec<BlockLayout>,
    pub logo: Option<LogoLayout>,
}

impl SceneLayout {
    pub fn block(&self, id: u32) -> Option<&BlockLayout> {
        self.blocks.iter().find(|block| block.id == id)
    }
}
