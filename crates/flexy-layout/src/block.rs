//! Sequence members: resizable [`Block`]s and fixed [`Splitter`]s.
//!
//! Both variants, and the transient [`CompositeBlock`](crate::CompositeBlock)
//! view built over them, share the [`Movable`] contract. The engine stores
//! members as the closed [`Entry`] enum so composites can filter splitters out
//! by tag instead of probing capabilities at runtime.

use serde::{Deserialize, Serialize};

use crate::config::{BlockConfig, LayoutConfigError, LengthField, check_length};

/// Default thickness of a splitter along the layout axis.
pub const DEFAULT_SPLITTER_LENGTH: f64 = 5.0;

/// Shared move/query contract of every length-bearing member.
pub trait Movable {
    /// Change the length by `delta` within the member's rules and return the
    /// delta that was actually applied.
    fn move_length(&mut self, delta: f64) -> f64;

    /// Whether the member can currently move in the direction of `delta`.
    fn can_move_length(&self, delta: f64) -> bool;

    /// Length the member can still give up.
    fn available_length(&self) -> f64;
}

/// Atomic resizable unit of the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    length: f64,
    min_length: f64,
    locked: bool,
    initial_length: f64,
}

impl Default for Block {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Block {
    /// Create an unlocked block with zero length.
    ///
    /// `initial_length` is the fixed size requested at reflow time. Anything
    /// that is not a positive finite number means "flexible".
    #[must_use]
    pub fn new(initial_length: f64) -> Self {
        Self {
            length: 0.0,
            min_length: 0.0,
            locked: false,
            initial_length: sanitize(initial_length),
        }
    }

    /// Create a block from host configuration.
    #[must_use]
    pub fn from_config(config: &BlockConfig) -> Self {
        Self::new(config.initial_length).with_min_length(config.min_length)
    }

    /// Set the floor used by [`Movable::available_length`].
    #[must_use]
    pub fn with_min_length(mut self, min_length: f64) -> Self {
        self.min_length = sanitize(min_length);
        self
    }

    /// Current allocated length.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub const fn min_length(&self) -> f64 {
        self.min_length
    }

    /// Fixed length applied during reflow, or 0 for a flexible block.
    #[must_use]
    pub const fn initial_length(&self) -> f64 {
        self.initial_length
    }

    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.initial_length > 0.0
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Check every stored length, e.g. after deserializing a snapshot.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        check_length(LengthField::Length, self.length)?;
        check_length(LengthField::MinLength, self.min_length)?;
        check_length(LengthField::InitialLength, self.initial_length)
    }

    /// Shrink to the zero floor, returning the (non-positive) applied delta.
    ///
    /// Locked blocks are left untouched.
    pub fn minimize(&mut self) -> f64 {
        self.move_length(-self.length)
    }
}

impl Movable for Block {
    fn move_length(&mut self, delta: f64) -> f64 {
        if self.locked || !delta.is_finite() {
            return 0.0;
        }
        let old = self.length;
        self.length = (self.length + delta).max(0.0);
        self.length - old
    }

    fn can_move_length(&self, delta: f64) -> bool {
        !(self.locked || (delta < 0.0 && self.available_length() <= 0.0))
    }

    fn available_length(&self) -> f64 {
        if self.locked {
            0.0
        } else {
            self.length - self.min_length
        }
    }
}

/// Before/after capacity around a splitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitterRange {
    /// Length the run before the splitter can give up.
    pub before: f64,
    /// Length the run after the splitter can give up.
    pub after: f64,
}

impl SplitterRange {
    /// Clamp a raw drag offset to `[-before, after]`. NaN clamps to 0.
    #[must_use]
    pub fn clamp(self, raw: f64) -> f64 {
        if raw.is_nan() {
            0.0
        } else if raw < 0.0 {
            -raw.abs().min(self.before.max(0.0))
        } else {
            raw.min(self.after.max(0.0))
        }
    }
}

/// Fixed-size divider between two runs of blocks.
///
/// Never takes part in redistribution; it only consumes its own length and
/// anchors drag previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Splitter {
    length: f64,
    /// Pointer coordinate captured when the drag started.
    pub initial_position: f64,
    /// Clamp computed when the drag started.
    pub available_length: SplitterRange,
    /// Live preview offset, not yet applied to any block.
    pub ghost_position: f64,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(DEFAULT_SPLITTER_LENGTH)
    }
}

impl Splitter {
    #[must_use]
    pub fn new(length: f64) -> Self {
        Self {
            length: sanitize(length),
            initial_position: 0.0,
            available_length: SplitterRange::default(),
            ghost_position: 0.0,
        }
    }

    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        check_length(LengthField::SplitterLength, self.length)
    }

    pub(crate) fn reset_drag(&mut self) {
        self.initial_position = 0.0;
        self.available_length = SplitterRange::default();
        self.ghost_position = 0.0;
    }
}

impl Movable for Splitter {
    fn move_length(&mut self, _delta: f64) -> f64 {
        0.0
    }

    fn can_move_length(&self, _delta: f64) -> bool {
        false
    }

    fn available_length(&self) -> f64 {
        0.0
    }
}

/// One member of the engine's sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Block(Block),
    Splitter(Splitter),
}

impl Entry {
    #[must_use]
    pub const fn is_splitter(&self) -> bool {
        matches!(self, Self::Splitter(_))
    }

    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        match self {
            Self::Block(block) => block.validate(),
            Self::Splitter(splitter) => splitter.validate(),
        }
    }

    /// Length this entry consumes in the container.
    #[must_use]
    pub const fn length(&self) -> f64 {
        match self {
            Self::Block(block) => block.length(),
            Self::Splitter(splitter) => splitter.length(),
        }
    }

    #[must_use]
    pub const fn as_block(&self) -> Option<&Block> {
        match self {
            Self::Block(block) => Some(block),
            Self::Splitter(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Self::Block(block) => Some(block),
            Self::Splitter(_) => None,
        }
    }

    #[must_use]
    pub const fn as_splitter(&self) -> Option<&Splitter> {
        match self {
            Self::Splitter(splitter) => Some(splitter),
            Self::Block(_) => None,
        }
    }

    pub fn as_splitter_mut(&mut self) -> Option<&mut Splitter> {
        match self {
            Self::Splitter(splitter) => Some(splitter),
            Self::Block(_) => None,
        }
    }
}

impl From<Block> for Entry {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<Splitter> for Entry {
    fn from(splitter: Splitter) -> Self {
        Self::Splitter(splitter)
    }
}

impl Movable for Entry {
    fn move_length(&mut self, delta: f64) -> f64 {
        match self {
            Self::Block(block) => block.move_length(delta),
            Self::Splitter(splitter) => splitter.move_length(delta),
        }
    }

    fn can_move_length(&self, delta: f64) -> bool {
        match self {
            Self::Block(block) => block.can_move_length(delta),
            Self::Splitter(splitter) => splitter.can_move_length(delta),
        }
    }

    fn available_length(&self) -> f64 {
        match self {
            Self::Block(block) => block.available_length(),
            Self::Splitter(splitter) => splitter.available_length(),
        }
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
