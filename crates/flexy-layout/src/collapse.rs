//! Collapse/expand toggle for a single block.
//!
//! Moves a block to one of two lengths and pins it there with a lock, so
//! later splitter drags and reflow-free moves leave it alone.

use serde::{Deserialize, Serialize};

use crate::engine::{LayoutEngine, MoveOutcome, NoopReason, SlotRef};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollapseToggle {
    pub collapsed_length: f64,
    pub expanded_length: f64,
    collapsed: bool,
}

impl Default for CollapseToggle {
    fn default() -> Self {
        Self::new(35.0, 200.0)
    }
}

impl CollapseToggle {
    #[must_use]
    pub const fn new(collapsed_length: f64, expanded_length: f64) -> Self {
        Self {
            collapsed_length,
            expanded_length,
            collapsed: false,
        }
    }

    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Flip the block between its two lengths and lock it.
    ///
    /// The state only flips when `slot` names a block. The block stays locked
    /// even if the rest of the layout could not absorb the full change.
    pub fn toggle(&mut self, engine: &mut LayoutEngine, slot: impl Into<SlotRef>) -> MoveOutcome {
        let slot = slot.into();
        let Some(current) = engine.block(slot).map(|block| block.length()) else {
            return MoveOutcome::Noop {
                reason: NoopReason::NotABlock,
            };
        };
        engine.toggle_lock_block(slot, false);

        self.collapsed = !self.collapsed;
        let target = if self.collapsed {
            self.collapsed_length
        } else {
            self.expanded_length
        };
        let outcome = engine.move_block_length(slot, target - current);
        engine.toggle_lock_block(slot, true);
        outcome
    }
}
