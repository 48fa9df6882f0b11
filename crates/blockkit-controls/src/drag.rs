//! Drag-to-reorder state machine.
//!
//! Models the pointer gesture that reorders a list independently of any
//! toolkit:
//!
//! ```text
//! Idle ──press_handle──▶ Armed ──begin_drag──▶ Dragging
//!  ▲                       │                      │
//!  └──── release_handle ───┘                      │
//!  └───────────── drop_item / pointer_released ─────┘
//! ```
//!
//! Reorders are applied live while hovering, not on drop, so releasing the
//! pointer never rolls anything back.

/// A list the drag engine can reorder.
pub trait Reorderable {
    /// Number of items currently in the list.
    fn item_count(&self) -> usize;

    /// Remove the item at `from` and reinsert it at `to`.
    fn move_item(&mut self, from: usize, to: usize);
}

/// Vertical extent of a rendered item, in the same space as pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    pub top: f64,
    pub bottom: f64,
}

impl ItemBounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + (self.bottom - self.top) / 2.0
    }
}

/// Where the gesture currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// The handle of `index` is pressed; nothing has moved yet.
    Armed { index: usize },
    /// The item now at `index` is being dragged.
    Dragging { index: usize },
}

/// Drag reorder engine for one list.
#[derive(Debug, Clone, Default)]
pub struct DragReorder {
    state: DragState,
    handle_pressed: bool,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Current position of the dragged item, if a drag is in progress.
    pub fn dragged_index(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { index } => Some(index),
            _ => None,
        }
    }

    /// The drag handle of `index` was pressed.
    pub fn press_handle(&mut self, index: usize) {
        if self.state != DragState::Idle {
            tracing::debug!("Ignoring handle press on {} while {:?}", index, self.state);
            return;
        }
        self.handle_pressed = true;
        self.state = DragState::Armed { index };
    }

    /// The handle was released. Cancels an armed gesture.
    pub fn release_handle(&mut self) {
        self.handle_pressed = false;
        if let DragState::Armed { .. } = self.state {
            self.state = DragState::Idle;
        }
    }

    /// The drag primitive recognized movement on `index`.
    ///
    /// Only the item whose handle is held can be picked up; returns whether
    /// the drag started.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        match self.state {
            DragState::Armed { index: armed } if armed == index && self.handle_pressed => {
                self.state = DragState::Dragging { index };
                true
            }
            _ => false,
        }
    }

    /// The pointer hovers over `hover_index` at vertical position `pointer_y`.
    ///
    /// The dragged item swaps past the hovered one only once the pointer has
    /// crossed the hovered item's midpoint in the direction of travel, which
    /// keeps adjacent items from flickering back and forth. Returns the
    /// applied `(from, to)` move, if any.
    pub fn hover<L>(
        &mut self,
        list: &mut L,
        hover_index: usize,
        pointer_y: f64,
        hovered: ItemBounds,
    ) -> Option<(usize, usize)>
    where
        L: Reorderable + ?Sized,
    {
        let DragState::Dragging { index: drag_index } = self.state else {
            return None;
        };
        if drag_index == hover_index || hover_index >= list.item_count() {
            return None;
        }

        let middle = hovered.midpoint();
        // Moving down: wait until the pointer is below the midpoint.
        if drag_index < hover_index && pointer_y < middle {
            return None;
        }
        // Moving up: wait until the pointer is above the midpoint.
        if drag_index > hover_index && pointer_y > middle {
            return None;
        }

        list.move_item(drag_index, hover_index);
        self.state = DragState::Dragging { index: hover_index };
        Some((drag_index, hover_index))
    }

    /// The dragged item was dropped. Returns its final position.
    pub fn drop_item(&mut self) -> Option<usize> {
        let index = self.dragged_index();
        self.reset();
        index
    }

    /// A pointer release anywhere in the window; ends any gesture.
    pub fn pointer_released(&mut self) {
        if self.state != DragState::Idle {
            tracing::debug!("Pointer released while {:?}, resetting drag", self.state);
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.handle_pressed = false;
    }
}

impl<T> Reorderable for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }

    fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.len() || to >= self.len() {
            return;
        }
        let item = self.remove(from);
        self.insert(to, item);
    }
}
