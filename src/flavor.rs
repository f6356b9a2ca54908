//! Built-in color presets.
//!
//! A flavor pairs a light-theme and a dark-theme [`PaintAssignment`] with the
//! direction its gradients run in. The table is compiled in and read-only for
//! the duration of a run.

use crate::direction::Direction;
use crate::error::{Error, Result};
use crate::paint::PaintAssignment;
use crate::theme::Theme;

/// A named palette applied to the master artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flavor {
    pub name: String,
    pub light: PaintAssignment,
    pub dark: PaintAssignment,
    pub direction: Direction,
}

impl Flavor {
    pub fn new(
        name: impl Into<String>,
        light: PaintAssignment,
        dark: PaintAssignment,
        direction: Direction,
    ) -> Self {
        Self {
            name: name.into(),
            light,
            dark,
            direction,
        }
    }

    /// Returns the paints for one theme.
    pub fn assignment(&self, theme: Theme) -> &PaintAssignment {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

// Heart, thick band, thin band, bubble.
type Palette = [&'static str; 4];

const PRESETS: &[(&str, Palette, Palette, Direction)] = &[
    (
        "black",
        ["#000000", "#000000", "#000000", "#000000"],
        ["#FFFFFF", "#FFFFFF", "#FFFFFF", "#FFFFFF"],
        Direction::Diagonal,
    ),
    (
        "classic",
        ["#E0245E", "#1F2937", "#6B7280", "#0066CC"],
        ["#FF4F7B", "#F3F4F6", "#9CA3AF", "#3399FF"],
        Direction::Diagonal,
    ),
    (
        "ocean",
        ["#FFFFFF", "#003366", "#66B2FF", "#004080:#0066CC:#0099FF"],
        ["#E6F2FF", "#99CCFF", "#336699", "#002040:#004080:#0066CC"],
        Direction::Diagonal,
    ),
    (
        "sunset",
        ["#FFF5E6", "#B33C00", "#FF9933", "#FF5E3A:#FF9500:#FFCC00"],
        ["#FFE0B3", "#FF8C42", "#FFB366", "#8C1C13:#BF4342:#E7A977"],
        Direction::TopToBottom,
    ),
    (
        "forest",
        ["#2E7D32:#81C784", "#1B5E20", "#A5D6A7", "#E8F5E9"],
        ["#66BB6A:#C8E6C9", "#A5D6A7", "#2E7D32", "#1B3A1D"],
        Direction::LeftToRight,
    ),
    (
        "mono",
        ["#212121", "#616161", "#9E9E9E", "#E0E0E0"],
        ["#FAFAFA", "#BDBDBD", "#757575", "#303030"],
        Direction::Diagonal,
    ),
];

/// Returns every built-in flavor in table order.
pub fn builtin_flavors() -> Vec<Flavor> {
    PRESETS
        .iter()
        .map(|&(name, light, dark, direction)| {
            Flavor::new(
                name,
                PaintAssignment::from_specs(light),
                PaintAssignment::from_specs(dark),
                direction,
            )
        })
        .collect()
}

/// Looks up a built-in flavor by name.
pub fn find_flavor(name: &str) -> Option<Flavor> {
    builtin_flavors().into_iter().find(|flavor| flavor.name == name)
}

/// Picks the named flavors, or all of them when `names` is empty.
///
/// Unknown names fail the whole selection so a typo is caught before any
/// output is written.
pub fn select_flavors<S: AsRef<str>>(names: &[S]) -> Result<Vec<Flavor>> {
    if names.is_empty() {
        return Ok(builtin_flavors());
    }
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            find_flavor(name).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown flavor `{name}` (available: {})",
                    flavor_names().join(", ")
                ))
            })
        })
        .collect()
}

/// Names of the built-in flavors in table order.
pub fn flavor_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, ..)| *name).collect()
}
