use crate::config::LayoutConfig;
use crate::hit_test::{HitTarget, hit_test};
use crate::layout::SceneLayout;
use crate::model::{Point, Scene};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// At most one entity is dragged at a time; the offset is the pointer
/// position minus the entity's position when the drag started.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingLogo {
        offset: Point,
    },
    DraggingText {
        id: u32,
        offset: Point,
    },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    pub fn target(&self) -> Option<HitTarget> {
        match self {
            DragState::Idle => None,
            DragState::DraggingLogo { .. } => Some(HitTarget::Logo),
            DragState::DraggingText { id, .. } => Some(HitTarget::Text(*id)),
        }
    }
}

/// A pointer event in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    drag: DragState,
    hover: Option<HitTarget>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn hover(&self) -> Option<HitTarget> {
        self.hover
    }

    /// Starts a drag on whatever is under the pointer. Returns `true` when a
    /// drag began; the frame itself does not change.
    pub fn pointer_down(
        &mut self,
        point: Point,
        scene: &Scene,
        layout: &SceneLayout,
        config: &LayoutConfig,
    ) -> bool {
        self.drag = match hit_test(layout, point, config) {
            Some(HitTarget::Logo) => DragState::DraggingLogo {
                offset: point - scene.logo.position,
            },
            Some(HitTarget::Text(id)) => match scene.block(id) {
                Some(block) => DragState::DraggingText {
                    id,
                    offset: point - block.position(),
                },
                None => DragState::Idle,
            },
            None => DragState::Idle,
        };
        if let Some(target) = self.drag.target() {
            debug!("drag started on {target:?} at ({}, {})", point.x, point.y);
        }
        self.drag.is_active()
    }

    /// Moves the dragged entity, or refreshes hover feedback when idle.
    /// Returns `true` when the frame needs to be redrawn.
    pub fn pointer_move(
        &mut self,
        point: Point,
        scene: &mut Scene,
        layout: &SceneLayout,
        config: &LayoutConfig,
    ) -> bool {
        match self.drag {
            DragState::Idle => {
                let hover = hit_test(layout, point, config);
                let changed = hover != self.hover;
                self.hover = hover;
                changed
            }
            DragState::DraggingLogo { offset } => {
                let next = point - offset;
                let changed = next != scene.logo.position;
                scene.logo.position = next;
                trace!("logo moved to ({}, {})", next.x, next.y);
                changed
            }
            DragState::DraggingText { id, offset } => {
                let Some(block) = scene.block_mut(id) else {
                    self.drag = DragState::Idle;
                    return false;
                };
                let next = point - offset;
                let changed = next != block.position();
                block.set_position(next);
                trace!("block {id} moved to ({}, {})", next.x, next.y);
                changed
            }
        }
    }

    /// Ends any drag, leaving the entity where it was last moved.
    pub fn pointer_up(&mut self) -> bool {
        if self.drag.is_active() {
            debug!("drag ended on {:?}", self.drag.target());
        }
        self.drag = DragState::Idle;
        false
    }

    /// Same as releasing the pointer; hover feedback is cleared too since
    /// the pointer is no longer over anything.
    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up();
        self.hover.take().is_some()
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        scene: &mut Scene,
        layout: &SceneLayout,
        config: &LayoutConfig,
    ) -> bool {
        match event {
            PointerEvent::Down { x, y } => {
                self.pointer_down(Point::new(x, y), scene, layout, config);
                false
            }
            PointerEvent::Move { x, y } => {
                self.pointer_move(Point::new(x, y), scene, layout, config)
            }
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }
}
