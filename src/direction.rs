//! Gradient directions and their fixed coordinates.
//!
//! The master artwork draws inside a group that maps a 20480-unit square onto
//! the visible canvas and flips the vertical axis, so "top" in visual space is
//! `y = 20480` in the coordinates used here.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Edge length of the artwork's internal coordinate space.
pub const EXTENT: u32 = 20480;

/// Start and end points of a linear gradient, in internal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientLine {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl GradientLine {
    const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// The axis along which gradient stops are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Direction {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    /// Visual top-left to bottom-right.
    #[default]
    Diagonal,
    /// Visual bottom-right to top-left.
    DiagonalReverse,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::LeftToRight,
        Direction::RightToLeft,
        Direction::TopToBottom,
        Direction::BottomToTop,
        Direction::Diagonal,
        Direction::DiagonalReverse,
    ];

    /// The token accepted on the command line.
    pub fn token(self) -> &'static str {
        match self {
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
            Self::Diagonal => "diagonal",
            Self::DiagonalReverse => "diagonal-reverse",
        }
    }

    /// The gradient endpoints for this direction.
    pub const fn line(self) -> GradientLine {
        match self {
            Self::LeftToRight => GradientLine::new(0, 0, EXTENT, 0),
            Self::RightToLeft => GradientLine::new(EXTENT, 0, 0, 0),
            Self::TopToBottom => GradientLine::new(0, EXTENT, 0, 0),
            Self::BottomToTop => GradientLine::new(0, 0, 0, EXTENT),
            Self::Diagonal => GradientLine::new(0, EXTENT, EXTENT, 0),
            Self::DiagonalReverse => GradientLine::new(EXTENT, 0, 0, EXTENT),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.token() == s)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown gradient direction `{s}` (expected one of: {})",
                    Self::ALL.map(Direction::token).join(", ")
                ))
            })
    }
}
