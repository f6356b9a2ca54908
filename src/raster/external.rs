//! Backend that shells out to `rsvg-convert` and ImageMagick.

use std::cell::OnceCell;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use super::Rasterizer;
use crate::catalog::SizePx;
use crate::error::{Error, Result};

const DEFAULT_RASTERIZER: &str = "rsvg-convert";
const DEFAULT_COMPOSITOR: &str = "magick";
/// ImageMagick 6 ships its compositor as `convert`.
const LEGACY_COMPOSITOR: &str = "convert";

/// Programs used by [`ExternalTools`], by name or path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub rasterizer: PathBuf,
    pub compositor: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            rasterizer: DEFAULT_RASTERIZER.into(),
            compositor: DEFAULT_COMPOSITOR.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Resolved {
    rasterizer: PathBuf,
    compositor: PathBuf,
}

/// Runs `rsvg-convert` for rendering and ImageMagick for everything else.
///
/// Tools are looked up on `PATH` once, during [`preflight`](Rasterizer::preflight)
/// or the first operation, whichever comes first.
#[derive(Debug, Default)]
pub struct ExternalTools {
    tools: ToolPaths,
    resolved: OnceCell<Resolved>,
}

impl ExternalTools {
    pub fn new(tools: ToolPaths) -> Self {
        Self {
            tools,
            resolved: OnceCell::new(),
        }
    }

    fn resolved(&self) -> Result<&Resolved> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let resolved = self.resolve()?;
        Ok(self.resolved.get_or_init(|| resolved))
    }

    fn resolve(&self) -> Result<Resolved> {
        let rasterizer = locate(&self.tools.rasterizer).ok_or_else(|| Error::MissingDependency {
            tool: self.tools.rasterizer.display().to_string(),
            hint: "install librsvg (e.g. `apt install librsvg2-bin` or `brew install librsvg`)"
                .into(),
        })?;

        let compositor = locate(&self.tools.compositor)
            .or_else(|| {
                // Only fall back when the default was not overridden.
                (self.tools.compositor == Path::new(DEFAULT_COMPOSITOR))
                    .then(|| locate(Path::new(LEGACY_COMPOSITOR)))
                    .flatten()
            })
            .ok_or_else(|| Error::MissingDependency {
                tool: self.tools.compositor.display().to_string(),
                hint: "install ImageMagick (e.g. `apt install imagemagick` or `brew install imagemagick`)"
                    .into(),
            })?;

        tracing::debug!(
            rasterizer = %rasterizer.display(),
            compositor = %compositor.display(),
            "resolved external tools"
        );
        Ok(Resolved {
            rasterizer,
            compositor,
        })
    }
}

fn locate(tool: &Path) -> Option<PathBuf> {
    which::which(tool).ok()
}

/// Runs `tool` and maps a non-zero exit into [`Error::ExternalTool`].
fn run(tool: &Path, args: Vec<OsString>) -> Result<()> {
    let name = tool
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| tool.display().to_string());
    tracing::trace!(tool = %name, ?args, "running");

    let output = Command::new(tool).args(&args).output().map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            Error::MissingDependency {
                tool: name.clone(),
                hint: "the tool disappeared from PATH during the run".into(),
            }
        } else {
            Error::Io(err)
        }
    })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::ExternalTool {
            tool: name,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

// ============================================================================
// Command lines
// ============================================================================

/// Renders to fit inside `size` with the aspect ratio kept.
fn rasterize_args(svg: &Path, size: SizePx, out: &Path) -> Vec<OsString> {
    vec![
        "--keep-aspect-ratio".into(),
        "-w".into(),
        size.width.to_string().into(),
        "-h".into(),
        size.height.to_string().into(),
        "-o".into(),
        out.into(),
        svg.into(),
    ]
}

/// Pads a fitted render to exactly `size`, centered on transparency.
fn extent_args(image: &Path, size: SizePx, out: &Path) -> Vec<OsString> {
    vec![
        image.into(),
        "-background".into(),
        "none".into(),
        "-gravity".into(),
        "center".into(),
        "-extent".into(),
        size.to_string().into(),
        out.into(),
    ]
}

fn bundle_args(pngs: &[&Path], out: &Path) -> Vec<OsString> {
    pngs.iter()
        .map(|png| OsString::from(png))
        .chain(std::iter::once(out.into()))
        .collect()
}

fn compose_args(foreground: &Path, canvas: SizePx, background: &str, out: &Path) -> Vec<OsString> {
    vec![
        "-size".into(),
        canvas.to_string().into(),
        format!("xc:{background}").into(),
        foreground.into(),
        "-gravity".into(),
        "center".into(),
        "-composite".into(),
        out.into(),
    ]
}

fn flatten_args(image: &Path, background: &str, quality: u8, out: &Path) -> Vec<OsString> {
    vec![
        image.into(),
        "-background".into(),
        background.into(),
        "-flatten".into(),
        "-quality".into(),
        quality.to_string().into(),
        out.into(),
    ]
}

impl Rasterizer for ExternalTools {
    fn name(&self) -> &str {
        "external"
    }

    fn preflight(&self) -> Result<()> {
        self.resolved().map(|_| ())
    }

    fn rasterize(&self, svg: &Path, size: SizePx, out: &Path) -> Result<()> {
        let tools = self.resolved()?;
        let fitted = tempfile::Builder::new()
            .prefix("logo-forge-")
            .suffix(".png")
            .tempfile()?
            .into_temp_path();
        run(&tools.rasterizer, rasterize_args(svg, size, &fitted))?;
        run(&tools.compositor, extent_args(&fitted, size, out))
    }

    fn bundle(&self, pngs: &[&Path], out: &Path) -> Result<()> {
        run(&self.resolved()?.compositor, bundle_args(pngs, out))
    }

    fn compose(
        &self,
        foreground: &Path,
        canvas: SizePx,
        background: &str,
        out: &Path,
    ) -> Result<()> {
        run(
            &self.resolved()?.compositor,
            compose_args(foreground, canvas, background, out),
        )
    }

    fn flatten(&self, image: &Path, background: &str, quality: u8, out: &Path) -> Result<()> {
        run(
            &self.resolved()?.compositor,
            flatten_args(image, background, quality, out),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn rasterize_command_line() {
        let args = rasterize_args(Path::new("in.svg"), SizePx::new(32, 16), Path::new("out.png"));
        assert_eq!(
            strings(args),
            ["--keep-aspect-ratio", "-w", "32", "-h", "16", "-o", "out.png", "in.svg"]
        );
    }

    #[test]
    fn extent_pads_to_the_exact_size() {
        let args = extent_args(Path::new("fit.png"), SizePx::new(1200, 630), Path::new("out.png"));
        assert_eq!(
            strings(args),
            ["fit.png", "-background", "none", "-gravity", "center", "-extent", "1200x630", "out.png"]
        );
    }

    #[test]
    fn bundle_command_line_ends_with_output() {
        let pngs = [Path::new("16.png"), Path::new("32.png")];
        assert_eq!(
            strings(bundle_args(&pngs, Path::new("favicon.ico"))),
            ["16.png", "32.png", "favicon.ico"]
        );
    }

    #[test]
    fn compose_command_line() {
        let args = compose_args(
            Path::new("logo.png"),
            SizePx::new(1200, 630),
            "#000000",
            Path::new("social.png"),
        );
        assert_eq!(
            strings(args),
            [
                "-size", "1200x630", "xc:#000000", "logo.png", "-gravity", "center",
                "-composite", "social.png"
            ]
        );
    }

    #[test]
    fn flatten_command_line() {
        let args = flatten_args(Path::new("a.png"), "white", 85, Path::new("a.jpg"));
        assert_eq!(
            strings(args),
            ["a.png", "-background", "white", "-flatten", "-quality", "85", "a.jpg"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_reports_status_and_stderr() {
        let args = vec!["-c".into(), "echo oops >&2; exit 3".into()];
        match run(Path::new("sh"), args).unwrap_err() {
            Error::ExternalTool {
                tool,
                status,
                stderr,
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_tool_is_ok() {
        run(Path::new("sh"), vec!["-c".into(), "exit 0".into()]).unwrap();
    }

    #[test]
    fn vanished_tool_is_a_missing_dependency() {
        let err = run(Path::new("/logo-forge/no/such/tool"), Vec::new()).unwrap_err();
        assert!(err.is_precondition());
        match err {
            Error::MissingDependency { tool, hint } => {
                assert_eq!(tool, "tool");
                assert!(hint.contains("PATH"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_tool_fails_preflight() {
        let tools = ExternalTools::new(ToolPaths {
            rasterizer: "logo-forge-no-such-rasterizer".into(),
            compositor: "logo-forge-no-such-compositor".into(),
        });
        let err = tools.preflight().unwrap_err();
        match err {
            Error::MissingDependency { tool, hint } => {
                assert_eq!(tool, "logo-forge-no-such-rasterizer");
                assert!(hint.contains("librsvg"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn overridden_compositor_has_no_fallback() {
        let tools = ToolPaths {
            compositor: "logo-forge-no-such-compositor".into(),
            ..ToolPaths::default()
        };
        let external = ExternalTools::new(tools);
        // Whether or not rsvg-convert is installed, the compositor can never
        // be found, so preflight must fail.
        assert!(matches!(
            external.preflight(),
            Err(Error::MissingDependency { .. })
        ));
    }
}
