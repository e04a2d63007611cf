//! Host-facing configuration for an engine and its blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::DEFAULT_SPLITTER_LENGTH;

/// Axis along which blocks are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Blocks side by side; lengths are widths and drags follow `x`.
    #[default]
    Horizontal,
    /// Blocks stacked; lengths are heights and drags follow `y`.
    Vertical,
}

impl Orientation {
    /// Pick the pointer coordinate that lies on this axis.
    #[must_use]
    pub const fn axis_coordinate(self, x: f64, y: f64) -> f64 {
        match self {
            Self::Horizontal => x,
            Self::Vertical => y,
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// Length given to every splitter created through the engine.
    pub splitter_length: f64,
    /// Total length of the container at construction time.
    pub container_length: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            splitter_length: DEFAULT_SPLITTER_LENGTH,
            container_length: 0.0,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn horizontal() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn splitter_length(mut self, length: f64) -> Self {
        self.splitter_length = length;
        self
    }

    #[must_use]
    pub fn container_length(mut self, length: f64) -> Self {
        self.container_length = length;
        self
    }

    /// Check that every length is finite and non-negative.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        check_length(LengthField::SplitterLength, self.splitter_length)?;
        check_length(LengthField::ContainerLength, self.container_length)
    }
}

/// Per-block settings declared by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Fixed length requested at reflow; 0 keeps the block flexible.
    pub initial_length: f64,
    pub min_length: f64,
}

impl BlockConfig {
    /// A flexible block.
    #[must_use]
    pub fn flexible() -> Self {
        Self::default()
    }

    /// A block that asks for exactly `length` on every reflow.
    #[must_use]
    pub fn fixed(length: f64) -> Self {
        Self {
            initial_length: length,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn min_length(mut self, min_length: f64) -> Self {
        self.min_length = min_length;
        self
    }

    /// Check that both lengths are finite and non-negative.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        check_length(LengthField::InitialLength, self.initial_length)?;
        check_length(LengthField::MinLength, self.min_length)
    }
}

/// Which configured length failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthField {
    SplitterLength,
    ContainerLength,
    InitialLength,
    MinLength,
    Length,
}

impl fmt::Display for LengthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SplitterLength => "splitter_length",
            Self::ContainerLength => "container_length",
            Self::InitialLength => "initial_length",
            Self::MinLength => "min_length",
            Self::Length => "length",
        })
    }
}

/// Errors raised while validating configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutConfigError {
    NonFiniteLength { field: LengthField, value: f64 },
    NegativeLength { field: LengthField, value: f64 },
}

impl fmt::Display for LayoutConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteLength { field, value } => {
                write!(f, "{field} must be finite (got {value})")
            }
            Self::NegativeLength { field, value } => {
                write!(f, "{field} must be >= 0 (got {value})")
            }
        }
    }
}

impl std::error::Error for LayoutConfigError {}

pub(crate) fn check_length(field: LengthField, value: f64) -> Result<(), LayoutConfigError> {
    if !value.is_finite() {
        return Err(LayoutConfigError::NonFiniteLength { field, value });
    }
    if value < 0.0 {
        return Err(LayoutConfigError::NegativeLength { field, value });
    }
    Ok(())
}
