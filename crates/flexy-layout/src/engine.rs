//! The layout engine: owns the block/splitter sequence and mediates every
//! length transfer across it.
//!
//! # Invariants
//!
//! After [`LayoutEngine::init`] and after every applied move, the lengths of
//! all committed entries add up to the container length (up to float
//! rounding). Moves are zero-sum: one side shrinks first and the other side
//! grows by exactly what was freed.
//!
//! # Addressing
//!
//! Entries are addressed with a [`SlotRef`], either a position in the
//! sequence or the [`SlotId`] handed out when the entry was added. Unknown
//! references are silently ignored and reported as [`NoopReason::UnknownSlot`].

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::block::{Block, Entry, Movable, Splitter, SplitterRange};
use crate::composite::{CompositeBlock, LENGTH_EPSILON};
use crate::config::{BlockConfig, LayoutConfig, LayoutConfigError, Orientation};
use crate::drag::DragState;

/// Stable handle of an entry, assigned when it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(u32);

impl SlotId {
    /// Reserved for the temporary reflow buffer; never handed out.
    const BUFFER: Self = Self(u32::MAX);

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Index-or-handle reference to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Index(usize),
    Id(SlotId),
}

impl From<usize> for SlotRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<SlotId> for SlotRef {
    fn from(id: SlotId) -> Self {
        Self::Id(id)
    }
}

/// Why a request left the layout untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    UnknownSlot,
    NotASplitter,
    NotABlock,
    ZeroDelta,
    TargetCannotMove,
    CounterpartCannotMove,
}

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Lengths changed. `delta` is the signed change of the target (the
    /// block, or the run before the splitter).
    Applied { delta: f64 },
    Noop { reason: NoopReason },
}

impl MoveOutcome {
    const fn noop(reason: NoopReason) -> Self {
        Self::Noop { reason }
    }

    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Applied delta, 0 for a no-op.
    #[must_use]
    pub const fn delta(&self) -> f64 {
        match self {
            Self::Applied { delta } => *delta,
            Self::Noop { .. } => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Slot {
    pub(crate) id: SlotId,
    pub(crate) entry: Entry,
}

/// Mediator over an ordered sequence of blocks and splitters.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    container_length: f64,
    pub(crate) slots: Vec<Slot>,
    pending_splitter: Option<Slot>,
    next_id: u32,
    pub(crate) drag: DragState,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::with_config(LayoutConfig::default())
    }
}

impl LayoutEngine {
    /// Create an empty engine after validating `config`.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: LayoutConfig) -> Self {
        Self {
            container_length: config.container_length,
            config,
            slots: Vec::new(),
            pending_splitter: None,
            next_id: 0,
            drag: DragState::Idle,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    #[must_use]
    pub const fn container_length(&self) -> f64 {
        self.container_length
    }

    /// Host resize signal. Reflows when the length actually changed.
    ///
    /// Non-finite lengths are ignored and negative ones clamp to 0.
    pub fn set_container_length(&mut self, length: f64) {
        if !length.is_finite() {
            return;
        }
        let length = length.max(0.0);
        if length == self.container_length {
            return;
        }
        self.container_length = length;
        self.init();
    }

    // ── Sequence construction ───────────────────────────────────────────

    /// Append an entry after checking its lengths.
    ///
    /// A splitter is staged until the next block arrives, so the sequence
    /// never holds two adjacent splitters or a trailing one. A block commits
    /// the staged splitter, is appended, and triggers a reflow.
    pub fn push(&mut self, entry: impl Into<Entry>) -> Result<SlotId, LayoutConfigError> {
        let entry = entry.into();
        entry.validate()?;
        Ok(self.append(entry))
    }

    /// Append a block built from `config` once the config validates.
    pub fn add_block(&mut self, config: BlockConfig) -> Result<SlotId, LayoutConfigError> {
        config.validate()?;
        Ok(self.append(Block::from_config(&config).into()))
    }

    /// Stage a splitter sized from the engine configuration.
    pub fn add_splitter(&mut self) -> SlotId {
        self.append(Splitter::new(self.config.splitter_length).into())
    }

    fn append(&mut self, entry: Entry) -> SlotId {
        let id = self.allocate_id();
        let slot = Slot { id, entry };
        if slot.entry.is_splitter() {
            self.pending_splitter = Some(slot);
            return id;
        }
        if let Some(splitter) = self.pending_splitter.take() {
            self.slots.push(splitter);
        }
        self.slots.push(slot);
        self.init();
        id
    }

    fn allocate_id(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == SlotId::BUFFER.0 {
            self.next_id = 0;
        }
        id
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Number of committed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.entry.is_splitter()).count()
    }

    #[must_use]
    pub fn splitter_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_splitter()).count()
    }

    /// Handle of the staged splitter waiting for its next block.
    #[must_use]
    pub fn pending_splitter(&self) -> Option<SlotId> {
        self.pending_splitter.as_ref().map(|slot| slot.id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (SlotId, &Entry)> + '_ {
        self.slots.iter().map(|slot| (slot.id, &slot.entry))
    }

    /// Current length of every committed entry, in sequence order.
    pub fn lengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.slots.iter().map(|slot| slot.entry.length())
    }

    /// Sum of every committed entry's length.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.lengths().sum()
    }

    #[must_use]
    pub fn index_of(&self, slot: impl Into<SlotRef>) -> Option<usize> {
        match slot.into() {
            SlotRef::Index(index) => (index < self.slots.len()).then_some(index),
            SlotRef::Id(id) => self.slots.iter().position(|slot| slot.id == id),
        }
    }

    #[must_use]
    pub fn entry(&self, slot: impl Into<SlotRef>) -> Option<&Entry> {
        self.index_of(slot).map(|index| &self.slots[index].entry)
    }

    #[must_use]
    pub fn block(&self, slot: impl Into<SlotRef>) -> Option<&Block> {
        self.entry(slot).and_then(Entry::as_block)
    }

    #[must_use]
    pub fn splitter(&self, slot: impl Into<SlotRef>) -> Option<&Splitter> {
        self.entry(slot).and_then(Entry::as_splitter)
    }

    /// Available length of the runs on each side of a splitter.
    ///
    /// Returns `None` when `slot` does not name a committed splitter.
    #[must_use]
    pub fn splitter_range(&self, slot: impl Into<SlotRef>) -> Option<SplitterRange> {
        let index = self.index_of(slot)?;
        if !self.slots[index].entry.is_splitter() {
            return None;
        }
        let (before, after) = self.runs_around(index);
        Some(SplitterRange {
            before: self.available_in(before),
            after: self.available_in(after),
        })
    }

    fn available_in(&self, range: Range<usize>) -> f64 {
        self.slots[range]
            .iter()
            .map(|slot| slot.entry.available_length())
            .sum()
    }

    /// Index ranges of the block runs directly before and after `index`,
    /// each bounded by the nearest splitter or the sequence edge.
    fn runs_around(&self, index: usize) -> (Range<usize>, Range<usize>) {
        let start = self.slots[..index]
            .iter()
            .rposition(|slot| slot.entry.is_splitter())
            .map_or(0, |pos| pos + 1);
        let end = self.slots[index + 1..]
            .iter()
            .position(|slot| slot.entry.is_splitter())
            .map_or(self.slots.len(), |pos| index + 1 + pos);
        (start..index, index + 1..end)
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Lock or unlock a block. Returns `false` when `slot` is not a block.
    pub fn toggle_lock_block(&mut self, slot: impl Into<SlotRef>, lock: bool) -> bool {
        let Some(index) = self.index_of(slot) else {
            return false;
        };
        match self.slots[index].entry.as_block_mut() {
            Some(block) => {
                block.set_locked(lock);
                true
            }
            None => false,
        }
    }

    /// Grow (`delta > 0`) or shrink (`delta < 0`) one block against every
    /// other block in the sequence.
    pub fn move_block_length(&mut self, slot: impl Into<SlotRef>, delta: f64) -> MoveOutcome {
        let Some(index) = self.index_of(slot) else {
            return MoveOutcome::noop(NoopReason::UnknownSlot);
        };
        let outcome = self.transfer_block(index, delta);

        #[cfg(feature = "tracing")]
        tracing::debug!(index, delta, ?outcome, "move block length");

        outcome
    }

    fn transfer_block(&mut self, index: usize, delta: f64) -> MoveOutcome {
        if delta == 0.0 || !delta.is_finite() {
            return MoveOutcome::noop(NoopReason::ZeroDelta);
        }
        let (before, rest) = self.slots.split_at_mut(index);
        let Some((target, after)) = rest.split_first_mut() else {
            return MoveOutcome::noop(NoopReason::UnknownSlot);
        };
        let target = &mut target.entry;
        let mut counterpart = view(before.iter_mut().chain(after.iter_mut()));

        if !counterpart.can_move_length(-delta) {
            return MoveOutcome::noop(NoopReason::CounterpartCannotMove);
        }
        if !target.can_move_length(delta) {
            return MoveOutcome::noop(NoopReason::TargetCannotMove);
        }
        let applied = zero_sum_transfer(target, &mut counterpart, delta);
        counterpart.clean();
        MoveOutcome::Applied { delta: applied }
    }

    /// Move a splitter by `delta`: the run before it grows by what the run
    /// after it gives up, or the other way round for a negative delta.
    pub fn move_splitter_length(&mut self, slot: impl Into<SlotRef>, delta: f64) -> MoveOutcome {
        let Some(index) = self.index_of(slot) else {
            return MoveOutcome::noop(NoopReason::UnknownSlot);
        };
        let outcome = self.transfer_splitter(index, delta);

        #[cfg(feature = "tracing")]
        tracing::debug!(index, delta, ?outcome, "move splitter length");

        outcome
    }

    fn transfer_splitter(&mut self, index: usize, delta: f64) -> MoveOutcome {
        if !self.slots[index].entry.is_splitter() {
            return MoveOutcome::noop(NoopReason::NotASplitter);
        }
        if delta == 0.0 || !delta.is_finite() {
            return MoveOutcome::noop(NoopReason::ZeroDelta);
        }
        let (before_run, after_run) = self.runs_around(index);
        let (head, tail) = self.slots.split_at_mut(index + 1);
        let mut before = view(head[before_run].iter_mut());
        let mut after = view(
            tail[after_run.start - index - 1..after_run.end - index - 1].iter_mut(),
        );

        if !before.can_move_length(delta) {
            return MoveOutcome::noop(NoopReason::TargetCannotMove);
        }
        if !after.can_move_length(-delta) {
            return MoveOutcome::noop(NoopReason::CounterpartCannotMove);
        }
        let applied = zero_sum_transfer(&mut before, &mut after, delta);
        after.clean();
        before.clean();
        MoveOutcome::Applied { delta: applied }
    }

    /// Reset every block and reallocate the whole container.
    ///
    /// Fixed-size blocks receive their `initial_length` first (as far as the
    /// container allows), then flexible blocks share what is left. Safe to
    /// call repeatedly; the result only depends on the configuration and the
    /// container length.
    pub fn init(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "reflow",
            container_length = self.container_length,
            entries = self.slots.len()
        )
        .entered();

        let count = self.slots.len();
        for slot in &mut self.slots {
            if let Entry::Block(block) = &mut slot.entry {
                block.set_locked(false);
                block.minimize();
            }
        }

        let splitters: f64 = self
            .slots
            .iter()
            .filter_map(|slot| slot.entry.as_splitter())
            .map(Splitter::length)
            .sum();
        let mut buffer = Block::new(0.0);
        buffer.move_length((self.container_length - splitters).max(0.0));
        self.slots.push(Slot {
            id: SlotId::BUFFER,
            entry: Entry::Block(buffer),
        });

        for index in 0..count {
            let Some(request) = self.slots[index]
                .entry
                .as_block()
                .filter(|block| block.is_fixed())
                .map(Block::initial_length)
            else {
                continue;
            };
            let _ = self.transfer_block(index, request);
            self.toggle_lock_block(index, true);
        }

        self.drain_buffer(count);
        for slot in &mut self.slots {
            if let Entry::Block(block) = &mut slot.entry {
                block.set_locked(false);
            }
        }
        // Only non-empty when every block was fixed and locked above.
        self.drain_buffer(count);

        self.slots.truncate(count);

        #[cfg(feature = "tracing")]
        tracing::debug!(total = self.total_length(), "reflow complete");
    }

    fn drain_buffer(&mut self, index: usize) {
        let leftover = self.slots[index].entry.length();
        if leftover > LENGTH_EPSILON {
            let _ = self.transfer_block(index, -leftover);
        }
    }
}

fn view<'a>(slots: impl Iterator<Item = &'a mut Slot>) -> CompositeBlock<'a> {
    CompositeBlock::new(slots.map(|slot| &mut slot.entry))
}

/// Shrink the side matching the sign of `delta` first, then grow the other
/// side by exactly what was freed. Returns the change applied to `target`.
fn zero_sum_transfer(
    target: &mut impl Movable,
    counterpart: &mut impl Movable,
    delta: f64,
) -> f64 {
    if delta < 0.0 {
        let freed = -target.move_length(delta);
        counterpart.move_length(freed);
        -freed
    } else {
        let freed = -counterpart.move_length(-delta);
        target.move_length(freed)
    }
}
