//! Light and dark themes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The background a set of assets is meant to sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    /// Short tag used for directory names and gradient id namespacing.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Flat color behind composited assets (touch icons, social previews).
    pub fn background(self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#000000",
        }
    }

    /// The `prefers-color-scheme` media feature value that selects this theme.
    pub fn color_scheme(self) -> &'static str {
        self.tag()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
