//! Rasterization and compositing backends.
//!
//! The driver never touches pixels itself. It hands file paths to a
//! [`Rasterizer`], which either shells out to external programs
//! ([`ExternalTools`]) or renders in-process ([`Builtin`]).
//!
//! # Operations
//!
//! ```text
//! themed .svg ──rasterize──▶ .png ──┬──bundle───▶ .ico
//!                                   ├──compose──▶ .png on a flat canvas
//!                                   └──flatten──▶ .jpg on a flat background
//! ```

pub mod builtin;
pub mod external;

pub use builtin::Builtin;
pub use external::{ExternalTools, ToolPaths};

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::SizePx;
use crate::error::Result;

/// A vector-to-raster renderer plus the image operations the catalog needs.
///
/// Every method reads its inputs from and writes its output to the given
/// paths; output format follows the output file's extension.
pub trait Rasterizer {
    /// Short name for log lines.
    fn name(&self) -> &str;

    /// Verifies that everything the backend needs is available.
    ///
    /// Called once before a run writes anything.
    fn preflight(&self) -> Result<()>;

    /// Renders `svg` to a PNG of exactly `size` pixels.
    ///
    /// The drawing keeps its aspect ratio and is centered on a transparent
    /// canvas, so a square logo on a wide size is padded, never stretched.
    fn rasterize(&self, svg: &Path, size: SizePx, out: &Path) -> Result<()>;

    /// Packs several PNGs into one multi-resolution icon file.
    fn bundle(&self, pngs: &[&Path], out: &Path) -> Result<()>;

    /// Centers `foreground` on a `canvas`-sized rectangle of `background`.
    fn compose(&self, foreground: &Path, canvas: SizePx, background: &str, out: &Path)
    -> Result<()>;

    /// Flattens `image` onto `background` and re-encodes it lossily.
    fn flatten(&self, image: &Path, background: &str, quality: u8, out: &Path) -> Result<()>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn preflight(&self) -> Result<()> {
        (**self).preflight()
    }

    fn rasterize(&self, svg: &Path, size: SizePx, out: &Path) -> Result<()> {
        (**self).rasterize(svg, size, out)
    }

    fn bundle(&self, pngs: &[&Path], out: &Path) -> Result<()> {
        (**self).bundle(pngs, out)
    }

    fn compose(
        &self,
        foreground: &Path,
        canvas: SizePx,
        background: &str,
        out: &Path,
    ) -> Result<()> {
        (**self).compose(foreground, canvas, background, out)
    }

    fn flatten(&self, image: &Path, background: &str, quality: u8, out: &Path) -> Result<()> {
        (**self).flatten(image, background, quality, out)
    }
}

/// Which [`Rasterizer`] implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Backend {
    /// `rsvg-convert` and ImageMagick.
    #[default]
    External,
    /// resvg and the image crate, no external programs.
    Builtin,
}

impl Backend {
    /// Instantiates the backend.
    pub fn create(self, tools: &ToolPaths) -> Box<dyn Rasterizer> {
        match self {
            Self::External => Box::new(ExternalTools::new(tools.clone())),
            Self::Builtin => Box::new(Builtin::new()),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::External => "external",
            Self::Builtin => "builtin",
        })
    }
}
