//! Splitter drag lifecycle.
//!
//! ```text
//! Idle --pointer_down--> Dragging --pointer_move--> Dragging
//!   ^                        |
//!   +------pointer_up--------+  (commits the move)
//!   +------cancel_drag-------+  (discards the preview)
//! ```
//!
//! While dragging, only the splitter's `ghost_position` changes; block
//! lengths are untouched until release. At most one splitter drags at a time.

use serde::{Deserialize, Serialize};

use crate::block::SplitterRange;
use crate::engine::{LayoutEngine, MoveOutcome, SlotId, SlotRef};

/// Drag lifecycle state of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        splitter: SlotId,
        /// Pointer coordinate at press time.
        origin: f64,
    },
}

/// Reason a pointer event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    UnknownSlot,
    NotASplitter,
    NonFiniteCoordinate,
}

/// Effect of one drag lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        splitter: SlotId,
        origin: f64,
        range: SplitterRange,
    },
    Previewed {
        splitter: SlotId,
        raw_delta: f64,
        ghost_position: f64,
    },
    Committed {
        splitter: SlotId,
        requested: f64,
        outcome: MoveOutcome,
    },
    Canceled {
        splitter: SlotId,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragTransition {
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

impl LayoutEngine {
    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Splitter currently being dragged, if any.
    #[must_use]
    pub const fn moving_splitter(&self) -> Option<SlotId> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging { splitter, .. } => Some(splitter),
        }
    }

    /// Press on a splitter at `coordinate` (already on the layout axis).
    pub fn pointer_down(&mut self, slot: impl Into<SlotRef>, coordinate: f64) -> DragTransition {
        if self.drag != DragState::Idle {
            return self.noop(DragNoopReason::ActiveDragAlreadyInProgress);
        }
        if !coordinate.is_finite() {
            return self.noop(DragNoopReason::NonFiniteCoordinate);
        }
        let Some(index) = self.index_of(slot) else {
            return self.noop(DragNoopReason::UnknownSlot);
        };
        let Some(range) = self.splitter_range(index) else {
            return self.noop(DragNoopReason::NotASplitter);
        };

        let id = self.slots[index].id;
        if let Some(splitter) = self.slots[index].entry.as_splitter_mut() {
            splitter.initial_position = coordinate;
            splitter.available_length = range;
            splitter.ghost_position = 0.0;
        }
        self.transition(
            DragState::Dragging {
                splitter: id,
                origin: coordinate,
            },
            DragEffect::Started {
                splitter: id,
                origin: coordinate,
                range,
            },
        )
    }

    /// Pointer moved: update the clamped preview offset.
    ///
    /// A non-finite coordinate leaves the preview where it was.
    pub fn pointer_move(&mut self, coordinate: f64) -> DragTransition {
        let DragState::Dragging { splitter: id, .. } = self.drag else {
            return self.noop(DragNoopReason::IdleWithoutActiveDrag);
        };
        if !coordinate.is_finite() {
            return self.noop(DragNoopReason::NonFiniteCoordinate);
        }
        let Some(splitter) = self
            .index_of(id)
            .and_then(|index| self.slots[index].entry.as_splitter_mut())
        else {
            return self.noop(DragNoopReason::UnknownSlot);
        };

        let raw_delta = coordinate - splitter.initial_position;
        splitter.ghost_position = splitter.available_length.clamp(raw_delta);
        let ghost_position = splitter.ghost_position;
        self.transition(
            self.drag,
            DragEffect::Previewed {
                splitter: id,
                raw_delta,
                ghost_position,
            },
        )
    }

    /// Release: commit the drag as a splitter move and return to idle.
    ///
    /// A non-finite coordinate is ignored and the drag stays active.
    pub fn pointer_up(&mut self, coordinate: f64) -> DragTransition {
        let DragState::Dragging { splitter: id, origin } = self.drag else {
            return self.noop(DragNoopReason::IdleWithoutActiveDrag);
        };
        if !coordinate.is_finite() {
            return self.noop(DragNoopReason::NonFiniteCoordinate);
        }
        let requested = coordinate - origin;
        let outcome = self.move_splitter_length(id, requested);
        self.reset_splitter(id);

        #[cfg(feature = "tracing")]
        tracing::debug!(splitter = id.get(), requested, ?outcome, "splitter drag committed");

        self.transition(
            DragState::Idle,
            DragEffect::Committed {
                splitter: id,
                requested,
                outcome,
            },
        )
    }

    /// Abandon the active drag without touching any block length.
    pub fn cancel_drag(&mut self) -> Option<DragTransition> {
        let DragState::Dragging { splitter: id, .. } = self.drag else {
            return None;
        };
        self.reset_splitter(id);
        Some(self.transition(DragState::Idle, DragEffect::Canceled { splitter: id }))
    }

    /// [`pointer_down`](Self::pointer_down) with a 2-D host position,
    /// projected on the configured orientation.
    pub fn pointer_down_at(&mut self, slot: impl Into<SlotRef>, x: f64, y: f64) -> DragTransition {
        let coordinate = self.orientation().axis_coordinate(x, y);
        self.pointer_down(slot, coordinate)
    }

    pub fn pointer_move_at(&mut self, x: f64, y: f64) -> DragTransition {
        let coordinate = self.orientation().axis_coordinate(x, y);
        self.pointer_move(coordinate)
    }

    pub fn pointer_up_at(&mut self, x: f64, y: f64) -> DragTransition {
        let coordinate = self.orientation().axis_coordinate(x, y);
        self.pointer_up(coordinate)
    }

    fn reset_splitter(&mut self, id: SlotId) {
        let index = self.index_of(id);
        if let Some(splitter) = index.and_then(|index| self.slots[index].entry.as_splitter_mut()) {
            splitter.reset_drag();
        }
    }

    fn noop(&self, reason: DragNoopReason) -> DragTransition {
        DragTransition {
            from: self.drag,
            to: self.drag,
            effect: DragEffect::Noop { reason },
        }
    }

    fn transition(&mut self, to: DragState, effect: DragEffect) -> DragTransition {
        let from = self.drag;
        self.drag = to;

        #[cfg(feature = "tracing")]
        tracing::trace!(?from, ?to, ?effect, "splitter drag transition");

        DragTransition { from, to, effect }
    }
}
