//! The declarative table of assets produced for every flavor and theme.
//!
//! Each [`AssetSpec`] names one output file, its pixel size and how it is
//! composed. The driver walks this table with a single generic loop; adding
//! an asset means adding a row here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::theme::Theme;

// ============================================================================
// SizePx
// ============================================================================

/// A 2D size in pixel units.
///
/// Parses from and displays as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl fmt::Display for SizePx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for SizePx {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::InvalidArgument(format!("size `{s}` is not of the form WxH"));

        let (width, height) = s.split_once(['x', 'X']).ok_or_else(malformed)?;
        let width: u32 = width.trim().parse().map_err(|_| malformed())?;
        let height: u32 = height.trim().parse().map_err(|_| malformed())?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "size `{s}` must be at least 1x1"
            )));
        }
        Ok(Self::new(width, height))
    }
}

// ============================================================================
// Asset table
// ============================================================================

/// How an asset is built from the themed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// The themed vector document itself.
    Vector,

    /// Rasterized straight to PNG at the asset size.
    Raster,

    /// Rasterized at each listed edge length and bundled into one icon file.
    Bundle(&'static [u32]),

    /// A `logo`-pixel square icon centered on a canvas of the theme
    /// background color.
    Canvas { logo: u32 },

    /// Like [`Canvas`](Self::Canvas), then flattened and re-encoded as JPEG.
    Flattened { logo: u32 },
}

/// One row of the asset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub name: &'static str,
    pub size: SizePx,
    pub composite: Composite,
}

impl AssetSpec {
    const fn new(name: &'static str, size: SizePx, composite: Composite) -> Self {
        Self {
            name,
            size,
            composite,
        }
    }
}

/// Sizes packed into `favicon.ico`.
pub const FAVICON_SIZES: &[u32] = &[16, 32, 48];

/// Tile image referenced by `browserconfig.xml`.
pub const TILE_IMAGE: &str = "mstile-150x150.png";

/// Every asset written into each theme directory.
pub const CATALOG: &[AssetSpec] = &[
    AssetSpec::new("favicon.svg", SizePx::square(2048), Composite::Vector),
    AssetSpec::new("favicon.ico", SizePx::square(48), Composite::Bundle(FAVICON_SIZES)),
    AssetSpec::new("favicon-16x16.png", SizePx::square(16), Composite::Raster),
    AssetSpec::new("favicon-32x32.png", SizePx::square(32), Composite::Raster),
    AssetSpec::new(
        "apple-touch-icon.png",
        SizePx::square(180),
        Composite::Canvas { logo: 150 },
    ),
    AssetSpec::new("android-chrome-192x192.png", SizePx::square(192), Composite::Raster),
    AssetSpec::new("android-chrome-512x512.png", SizePx::square(512), Composite::Raster),
    // Maskable icons keep their content inside the central 80% safe zone.
    AssetSpec::new(
        "maskable-icon-512x512.png",
        SizePx::square(512),
        Composite::Canvas { logo: 410 },
    ),
    AssetSpec::new(TILE_IMAGE, SizePx::square(150), Composite::Raster),
    AssetSpec::new(
        "social-preview.png",
        SizePx::new(1200, 630),
        Composite::Canvas { logo: 480 },
    ),
    AssetSpec::new(
        "social-preview.jpg",
        SizePx::new(1200, 630),
        Composite::Flattened { logo: 480 },
    ),
];

/// Looks up a catalog entry by file name.
pub fn asset(name: &str) -> Option<&'static AssetSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

// ============================================================================
// Output targets
// ============================================================================

/// Directory holding one flavor's outputs.
pub fn flavor_dir(root: &Path, flavor: &str) -> PathBuf {
    root.join(flavor)
}

/// Directory holding one theme of one flavor.
pub fn theme_dir(root: &Path, flavor: &str, theme: Theme) -> PathBuf {
    flavor_dir(root, flavor).join(theme.tag())
}

/// Path of the auto-switching document for a flavor.
pub fn adaptive_path(root: &Path, flavor: &str) -> PathBuf {
    flavor_dir(root, flavor).join(format!("{flavor}.svg"))
}

/// One file to produce: a flavor, a theme and a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub flavor: String,
    pub theme: Theme,
    pub asset: &'static AssetSpec,
}

impl OutputTarget {
    /// Where this target is written under `root`.
    pub fn path(&self, root: &Path) -> PathBuf {
        theme_dir(root, &self.flavor, self.theme).join(self.asset.name)
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.flavor, self.theme, self.asset.name)
    }
}

/// Expands one flavor and theme into its targets, in catalog order.
pub fn theme_targets(flavor: &str, theme: Theme) -> impl Iterator<Item = OutputTarget> + '_ {
    CATALOG.iter().map(move |asset| OutputTarget {
        flavor: flavor.to_owned(),
        theme,
        asset,
    })
}

/// Expands flavors × themes × catalog into every target of a run.
pub fn expand_targets(flavors: &[Flavor]) -> Vec<OutputTarget> {
    flavors
        .iter()
        .flat_map(|flavor| {
            Theme::ALL
                .into_iter()
                .flat_map(move |theme| theme_targets(&flavor.name, theme))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
