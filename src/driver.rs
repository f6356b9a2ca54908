//! The asset fan-out driver.
//!
//! [`Generator::run`] walks flavors one at a time. For each it writes the
//! auto-switching document, then for each theme derives the themed document
//! and produces every [`CATALOG`] entry through the configured
//! [`Rasterizer`], followed by the manifests.
//!
//! # Failure policy
//!
//! A missing tool is detected by [`Rasterizer::preflight`] before anything is
//! written and aborts the run. Everything after that is per target: a failed
//! asset is logged with its flavor, theme and name, recorded in the
//! [`RunReport`], and the run moves on to the next asset.
//!
//! # Layout
//!
//! ```text
//! <root>/<flavor>/<flavor>.svg          auto-switching document
//! <root>/<flavor>/<theme>/<asset>       one file per catalog entry
//! <root>/<flavor>/<theme>/site.webmanifest
//! <root>/<flavor>/<theme>/browserconfig.xml
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};

use crate::catalog::{
    adaptive_path, theme_dir, theme_targets, Composite, OutputTarget, SizePx, CATALOG,
};
use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::manifest::write_manifests;
use crate::raster::Rasterizer;
use crate::style::resolve;
use crate::template::{DerivedDocument, MasterTemplate};
use crate::theme::Theme;

/// Default quality factor for lossy outputs.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Asset label used in reports for the auto-switching document.
const ADAPTIVE_ASSET: &str = "adaptive document";
/// Asset label used in reports for the manifest pair.
const MANIFEST_ASSET: &str = "manifests";
/// Asset label used when a whole theme could not be started.
const ALL_ASSETS: &str = "*";

// ============================================================================
// Run report
// ============================================================================

/// A unit of work that did not complete.
#[derive(Debug)]
pub struct TargetFailure {
    pub flavor: String,
    /// `None` for flavor-level outputs such as the auto-switching document.
    pub theme: Option<Theme>,
    pub asset: String,
    pub error: Error,
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.theme {
            Some(theme) => write!(f, "{}/{}/{}: {}", self.flavor, theme, self.asset, self.error),
            None => write!(f, "{}/{}: {}", self.flavor, self.asset, self.error),
        }
    }
}

/// Outcome of a [`Generator::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Units written successfully.
    pub completed: usize,
    /// Catalog entries never attempted because their theme could not start.
    pub skipped: usize,
    pub failures: Vec<TargetFailure>,
}

impl RunReport {
    /// True when every unit was produced.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, flavor: &str, theme: Option<Theme>, asset: &str, result: Result<()>) {
        match result {
            Ok(()) => {
                self.completed += 1;
                tracing::debug!(flavor, theme = ?theme, asset, "written");
            }
            Err(error) => {
                tracing::warn!(flavor, theme = ?theme, asset, %error, "failed");
                self.failures.push(TargetFailure {
                    flavor: flavor.to_owned(),
                    theme,
                    asset: asset.to_owned(),
                    error,
                });
            }
        }
    }
}

// ============================================================================
// Scratch space
// ============================================================================

/// Temporary files for one theme of one flavor.
///
/// Both the persisted document and the scratch directory are deleted when
/// this value is dropped, whether the theme finished or not.
struct ThemeWorkspace {
    document: NamedTempFile,
    scratch: TempDir,
}

impl ThemeWorkspace {
    fn new(document: &DerivedDocument) -> Result<Self> {
        Ok(Self {
            document: document.persist()?,
            scratch: tempfile::Builder::new().prefix("logo-forge-").tempdir()?,
        })
    }

    fn svg(&self) -> &Path {
        self.document.path()
    }

    fn scratch(&self, name: &str) -> PathBuf {
        self.scratch.path().join(name)
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Produces the full asset catalog for a set of flavors.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use logo_forge::{builtin_flavors, Builtin, Generator, MasterTemplate};
///
/// let generator = Generator::new(MasterTemplate::bundled(), Builtin::new());
/// let report = generator.run(Path::new("dist"), &builtin_flavors())?;
/// assert!(report.is_success());
/// # Ok::<(), logo_forge::Error>(())
/// ```
pub struct Generator<R = Box<dyn Rasterizer>> {
    template: MasterTemplate,
    rasterizer: R,
    jpeg_quality: u8,
}

impl<R: Rasterizer> Generator<R> {
    pub fn new(template: MasterTemplate, rasterizer: R) -> Self {
        Self {
            template,
            rasterizer,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Sets the quality factor for lossy outputs (clamped to 1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Generates every flavor under `root`.
    ///
    /// Returns `Err` only for failures that prevent the run from starting;
    /// per-target failures are collected in the report.
    pub fn run(&self, root: &Path, flavors: &[Flavor]) -> Result<RunReport> {
        self.rasterizer.preflight()?;
        fs::create_dir_all(root)?;

        tracing::info!(
            root = %root.display(),
            flavors = flavors.len(),
            backend = self.rasterizer.name(),
            "generating assets"
        );

        let mut report = RunReport::default();
        for flavor in flavors {
            self.generate_flavor(root, flavor, &mut report);
        }

        tracing::info!(
            completed = report.completed,
            failed = report.failures.len(),
            skipped = report.skipped,
            "run finished"
        );
        Ok(report)
    }

    fn generate_flavor(&self, root: &Path, flavor: &Flavor, report: &mut RunReport) {
        let span = tracing::info_span!("flavor", name = %flavor.name);
        let _enter = span.enter();

        let adaptive = self
            .adaptive_document(flavor)
            .and_then(|document| document.write_to(&adaptive_path(root, &flavor.name)));
        report.record(&flavor.name, None, ADAPTIVE_ASSET, adaptive);

        for theme in Theme::ALL {
            self.generate_theme(root, flavor, theme, report);
        }
    }

    /// Derives the document that carries both themes behind media queries.
    pub fn adaptive_document(&self, flavor: &Flavor) -> Result<DerivedDocument> {
        let light = resolve(&flavor.light, flavor.direction, Some(Theme::Light.tag()));
        let dark = resolve(&flavor.dark, flavor.direction, Some(Theme::Dark.tag()));
        self.template.derive_adaptive(&light, &dark)
    }

    /// Derives the single-theme document.
    pub fn themed_document(&self, flavor: &Flavor, theme: Theme) -> Result<DerivedDocument> {
        let fragment = resolve(flavor.assignment(theme), flavor.direction, None);
        self.template.derive_themed(&fragment)
    }

    fn generate_theme(&self, root: &Path, flavor: &Flavor, theme: Theme, report: &mut RunReport) {
        let started = self.themed_document(flavor, theme).and_then(|document| {
            let workspace = ThemeWorkspace::new(&document)?;
            fs::create_dir_all(theme_dir(root, &flavor.name, theme))?;
            Ok((document, workspace))
        });
        let (document, workspace) = match started {
            Ok(started) => started,
            Err(error) => {
                report.skipped += CATALOG.len();
                report.record(&flavor.name, Some(theme), ALL_ASSETS, Err(error));
                return;
            }
        };

        for target in theme_targets(&flavor.name, theme) {
            let result = self.produce(&target, &document, &workspace, &target.path(root));
            report.record(&flavor.name, Some(theme), target.asset.name, result);
        }

        let manifests = write_manifests(&theme_dir(root, &flavor.name, theme));
        report.record(&flavor.name, Some(theme), MANIFEST_ASSET, manifests);
    }

    fn produce(
        &self,
        target: &OutputTarget,
        document: &DerivedDocument,
        workspace: &ThemeWorkspace,
        out: &Path,
    ) -> Result<()> {
        let asset = target.asset;
        let background = target.theme.background();
        let svg = workspace.svg();

        match asset.composite {
            Composite::Vector => document.write_to(out),
            Composite::Raster => self.rasterizer.rasterize(svg, asset.size, out),
            Composite::Bundle(edges) => {
                let pngs = edges
                    .iter()
                    .map(|&edge| {
                        let png = workspace.scratch(&format!("{}-{edge}.png", asset.name));
                        self.rasterizer.rasterize(svg, SizePx::square(edge), &png)?;
                        Ok(png)
                    })
                    .collect::<Result<Vec<_>>>()?;
                let pngs: Vec<&Path> = pngs.iter().map(PathBuf::as_path).collect();
                self.rasterizer.bundle(&pngs, out)
            }
            Composite::Canvas { logo } => {
                let icon = workspace.scratch(&format!("{}-logo.png", asset.name));
                self.rasterizer.rasterize(svg, SizePx::square(logo), &icon)?;
                self.rasterizer.compose(&icon, asset.size, background, out)
            }
            Composite::Flattened { logo } => {
                let icon = workspace.scratch(&format!("{}-logo.png", asset.name));
                let canvas = workspace.scratch(&format!("{}-canvas.png", asset.name));
                self.rasterizer.rasterize(svg, SizePx::square(logo), &icon)?;
                self.rasterizer.compose(&icon, asset.size, background, &canvas)?;
                self.rasterizer.flatten(&canvas, background, self.jpeg_quality, out)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
