//! logo-forge: themed icon and branding asset generation
//!
//! This crate recolors a master SVG by injecting CSS fills and gradients, then
//! derives the full set of favicons, app icons, manifests and social preview
//! images for every color preset ("flavor") in a light and a dark theme.
//!
//! # Pipeline
//!
//! 1. [`resolve`] turns a [`PaintAssignment`] and a [`Direction`] into a
//!    [`StyleFragment`]: gradient definitions plus one CSS rule per paint
//!    class.
//! 2. [`MasterTemplate`] injects fragments before the document's closing tag,
//!    producing an in-memory [`DerivedDocument`]. Both themes can be combined
//!    behind `prefers-color-scheme` media queries.
//! 3. [`Generator`] walks the [`CATALOG`] for each flavor and theme and hands
//!    the work to a [`Rasterizer`].
//!
//! # Example
//!
//! ```
//! use logo_forge::{inject, resolve, Direction, PaintAssignment, PaintClass};
//!
//! let paints = PaintAssignment::new()
//!     .with(PaintClass::Heart, "#E0245E")
//!     .with(PaintClass::Bubble, "#004080:#0066CC:#0099FF");
//!
//! let fragment = resolve(&paints, Direction::Diagonal, None);
//! let svg = inject("<svg xmlns=\"http://www.w3.org/2000/svg\">\n</svg>\n", &fragment).unwrap();
//!
//! assert!(svg.contains(r##"<stop offset="50%" stop-color="#0066CC"/>"##));
//! assert!(svg.contains(".bubble{fill:url(#bubble-gradient)}"));
//! ```
//!
//! # Backends
//!
//! [`ExternalTools`] drives `rsvg-convert` and ImageMagick, and checks they
//! are installed before a run starts. [`Builtin`] renders with resvg and
//! encodes with the image crate, with no external programs.

mod catalog;
mod config;
mod direction;
mod driver;
mod error;
mod flavor;
mod manifest;
mod paint;
mod style;
mod template;
mod theme;

pub mod raster;

#[cfg(feature = "cli")]
pub mod cli;

pub use catalog::{
    adaptive_path, asset, expand_targets, flavor_dir, theme_dir, theme_targets, AssetSpec,
    Composite, OutputTarget, SizePx, CATALOG, FAVICON_SIZES, TILE_IMAGE,
};
pub use config::{ForgeConfig, DEFAULT_CONFIG_FILE};
pub use direction::{Direction, GradientLine, EXTENT};
pub use driver::{Generator, RunReport, TargetFailure, DEFAULT_JPEG_QUALITY};
pub use error::{Error, Result};
pub use flavor::{builtin_flavors, find_flavor, flavor_names, select_flavors, Flavor};
pub use manifest::{browser_config, write_manifests, ManifestIcon, WebManifest};
pub use paint::{ColorSpec, Gradient, PaintAssignment, PaintClass, DEFAULT_FILL, STOP_DELIMITER};
pub use raster::{Backend, Builtin, ExternalTools, Rasterizer, ToolPaths};
pub use style::{
    gradient_id, resolve, stop_offset, Fill, GradientDef, GradientStop, StyleFragment, StyleRule,
};
pub use template::{
    inject, inject_adaptive, inject_with, DerivedDocument, Injection, MasterTemplate,
    CLOSING_MARKER,
};
pub use theme::Theme;
