#![forbid(unsafe_code)]

//! One-dimensional space allocation for resizable block layouts.
//!
//! # Role
//! `flexy-layout` owns the arithmetic behind a row (or column) of resizable
//! blocks separated by fixed-size splitters. The host feeds it container
//! resizes, pointer coordinates and lock commands, and reads back one length
//! per entry to render. Rendering and event capture stay with the host.
//!
//! # Primary pieces
//! - [`Block`] and [`Splitter`]: the two kinds of sequence [`Entry`].
//! - [`CompositeBlock`]: a borrowed view that moves a group of blocks as one,
//!   spreading requests with an iterative fair share.
//! - [`LayoutEngine`]: owns the sequence, reflows it on structural changes and
//!   performs zero-sum block and splitter moves.
//! - Drag lifecycle ([`DragState`]) and [`CollapseToggle`] helpers on top.
//!
//! # Example
//! ```
//! use flexy_layout::{BlockConfig, LayoutConfig, LayoutEngine};
//!
//! let mut engine = LayoutEngine::new(LayoutConfig::horizontal().container_length(305.0))?;
//! let sidebar = engine.add_block(BlockConfig::fixed(100.0))?;
//! let splitter = engine.add_splitter();
//! engine.add_block(BlockConfig::flexible())?;
//!
//! assert_eq!(engine.block(sidebar).map(|b| b.length()), Some(100.0));
//! engine.move_splitter_length(splitter, 50.0);
//! assert_eq!(engine.block(sidebar).map(|b| b.length()), Some(150.0));
//! assert_eq!(engine.total_length(), 305.0);
//! # Ok::<(), flexy_layout::LayoutConfigError>(())
//! ```

pub mod block;
pub mod collapse;
pub mod composite;
pub mod config;
pub mod drag;
pub mod engine;

pub use block::{Block, DEFAULT_SPLITTER_LENGTH, Entry, Movable, Splitter, SplitterRange};
pub use collapse::CollapseToggle;
pub use composite::{CompositeBlock, CompositeMember, LENGTH_EPSILON};
pub use config::{BlockConfig, LayoutConfig, LayoutConfigError, LengthField, Orientation};
pub use drag::{DragEffect, DragNoopReason, DragState, DragTransition};
pub use engine::{LayoutEngine, MoveOutcome, NoopReason, SlotId, SlotRef};
