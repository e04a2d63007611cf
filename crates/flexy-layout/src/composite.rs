//! Transient aggregate view over a subset of the sequence.
//!
//! A [`CompositeBlock`] borrows its members mutably for the duration of one
//! engine operation and presents them as a single [`Movable`]. Requests are
//! spread with an iterative fair-share pass: every member that can move gets
//! an equal slice of what is left, and whatever a saturated member could not
//! absorb is re-offered to the others on the next round.

use crate::block::{Block, Entry, Movable};

/// Remaining lengths at or below this magnitude count as fully absorbed.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// A member of a [`CompositeBlock`].
#[derive(Debug)]
pub enum CompositeMember<'a> {
    Block(&'a mut Block),
    Composite(CompositeBlock<'a>),
}

impl<'a> From<&'a mut Block> for CompositeMember<'a> {
    fn from(block: &'a mut Block) -> Self {
        Self::Block(block)
    }
}

impl<'a> From<CompositeBlock<'a>> for CompositeMember<'a> {
    fn from(composite: CompositeBlock<'a>) -> Self {
        Self::Composite(composite)
    }
}

impl Movable for CompositeMember<'_> {
    fn move_length(&mut self, delta: f64) -> f64 {
        match self {
            Self::Block(block) => block.move_length(delta),
            Self::Composite(composite) => composite.move_length(delta),
        }
    }

    fn can_move_length(&self, delta: f64) -> bool {
        match self {
            Self::Block(block) => block.can_move_length(delta),
            Self::Composite(composite) => composite.can_move_length(delta),
        }
    }

    fn available_length(&self) -> f64 {
        match self {
            Self::Block(block) => block.available_length(),
            Self::Composite(composite) => composite.available_length(),
        }
    }
}

/// Borrowed group of movable members acting as one block.
#[derive(Debug, Default)]
pub struct CompositeBlock<'a> {
    members: Vec<CompositeMember<'a>>,
}

impl<'a> CompositeBlock<'a> {
    /// Build a view over sequence entries. Splitters are skipped.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a mut Entry>,
    {
        Self {
            members: entries
                .into_iter()
                .filter_map(Entry::as_block_mut)
                .map(CompositeMember::Block)
                .collect(),
        }
    }

    /// Build a view over explicit members (blocks or nested composites).
    pub fn from_members<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CompositeMember<'a>>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Release the borrowed members. The view cannot be used afterwards.
    pub fn clean(self) {}
}

impl Movable for CompositeBlock<'_> {
    fn move_length(&mut self, delta: f64) -> f64 {
        if !delta.is_finite() {
            return 0.0;
        }
        let mut remaining = delta;
        let mut moved = 0.0;

        while remaining.abs() > LENGTH_EPSILON {
            let mut divider = self
                .members
                .iter()
                .filter(|member| member.can_move_length(remaining))
                .count();
            if divider == 0 {
                break;
            }

            let mut progressed = false;
            for member in &mut self.members {
                if divider == 0 {
                    break;
                }
                if !member.can_move_length(remaining) {
                    continue;
                }
                let applied = member.move_length(remaining / divider as f64);
                moved += applied;
                remaining -= applied;
                if applied != 0.0 {
                    divider -= 1;
                    progressed = true;
                }
            }

            if !progressed {
                break;
            }
        }

        // summed per member so small moves survive next to a huge delta
        moved
    }

    fn can_move_length(&self, delta: f64) -> bool {
        self.members
            .iter()
            .any(|member| member.can_move_length(delta))
    }

    fn available_length(&self) -> f64 {
        self.members
            .iter()
            .map(Movable::available_length)
            .sum()
    }
}
