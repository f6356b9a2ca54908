//! Recolors the master artwork once and optionally rasterizes it.
//!
//! ```text
//! logo-paint --heart '#E0245E' --bubble '#004080:#0066CC:#0099FF' \
//!            --direction diagonal --size 512x512 --output logo
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use logo_forge::cli;
use logo_forge::{
    resolve, Backend, ColorSpec, Direction, MasterTemplate, PaintAssignment, PaintClass,
    Rasterizer, SizePx, ToolPaths,
};

#[derive(Parser, Debug)]
#[command(name = "logo-paint", version)]
#[command(about = "Recolor the logo and render a single asset")]
struct Cli {
    /// Heart color: a color, or colon-separated gradient stops
    #[arg(long, value_name = "COLOR")]
    heart: Option<ColorSpec>,

    /// Thick band color or gradient
    #[arg(long, value_name = "COLOR")]
    thick_band: Option<ColorSpec>,

    /// Thin band color or gradient
    #[arg(long, value_name = "COLOR")]
    thin_band: Option<ColorSpec>,

    /// Bubble color or gradient
    #[arg(long, value_name = "COLOR")]
    bubble: Option<ColorSpec>,

    /// Direction gradients run in
    #[arg(short, long, value_enum, default_value_t = Direction::Diagonal)]
    direction: Direction,

    /// Output basename; `.svg` and `.png`/`.jpg` are appended
    #[arg(short, long, default_value = "logo")]
    output: String,

    /// Also rasterize at this size, as WxH
    #[arg(short, long, value_name = "WxH")]
    size: Option<SizePx>,

    /// Flatten the raster onto this color and write a JPEG
    #[arg(short, long, value_name = "COLOR", requires = "size")]
    background: Option<String>,

    /// JPEG quality when flattening
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Master SVG to recolor instead of the bundled artwork
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Rasterizing backend
    #[arg(long, value_enum, default_value_t = Backend::External)]
    backend: Backend,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn paints(&self) -> PaintAssignment {
        let mut paints = PaintAssignment::new();
        let given = [
            (PaintClass::Heart, &self.heart),
            (PaintClass::ThickBand, &self.thick_band),
            (PaintClass::ThinBand, &self.thin_band),
            (PaintClass::Bubble, &self.bubble),
        ];
        for (class, spec) in given {
            if let Some(spec) = spec {
                paints.set(class, spec.clone());
            }
        }
        paints
    }

    fn output_path(&self, extension: &str) -> PathBuf {
        PathBuf::from(format!("{}.{extension}", self.output))
    }
}

fn rasterize(cli: &Cli, rasterizer: &dyn Rasterizer, svg: &Path, size: SizePx) -> Result<PathBuf> {
    match &cli.background {
        None => {
            let png = cli.output_path("png");
            rasterizer.rasterize(svg, size, &png)?;
            Ok(png)
        }
        Some(background) => {
            let scratch = tempfile::tempdir().context("failed to create scratch directory")?;
            let png = scratch.path().join("raster.png");
            let jpg = cli.output_path("jpg");
            rasterizer.rasterize(svg, size, &png)?;
            rasterizer.flatten(&png, background, cli.quality, &jpg)?;
            Ok(jpg)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Check tools before writing anything.
    let rasterizer = cli
        .size
        .map(|_| cli.backend.create(&ToolPaths::default()))
        .map(|rasterizer| rasterizer.preflight().map(|()| rasterizer))
        .transpose()?;

    let template = MasterTemplate::load_or_bundled(cli.template.as_deref())
        .context("failed to load template")?;
    let fragment = resolve(&cli.paints(), cli.direction, None);
    let document = template.derive_themed(&fragment)?;

    let svg = cli.output_path("svg");
    document
        .write_to(&svg)
        .with_context(|| format!("failed to write {}", svg.display()))?;
    tracing::info!(path = %svg.display(), "wrote document");

    if let (Some(rasterizer), Some(size)) = (rasterizer, cli.size) {
        let raster = rasterize(cli, rasterizer.as_ref(), &svg, size)?;
        tracing::info!(path = %raster.display(), %size, "wrote raster");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => cli::fail(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn colors_map_onto_paint_classes() {
        let cli = Cli::try_parse_from([
            "logo-paint",
            "--heart",
            "#ff0000",
            "--bubble",
            "#004080:#0066CC:#0099FF",
        ])
        .unwrap();
        let paints = cli.paints();

        assert_eq!(paints.get(PaintClass::Heart), &ColorSpec::solid("#ff0000"));
        assert_eq!(paints.get(PaintClass::Bubble).as_gradient().unwrap().len(), 3);
        assert_eq!(paints.get(PaintClass::ThinBand), &ColorSpec::default());
        assert_eq!(cli.direction, Direction::Diagonal);
        assert_eq!(cli.output_path("svg"), PathBuf::from("logo.svg"));
    }

    #[test]
    fn size_and_direction_are_parsed() {
        let cli = Cli::try_parse_from([
            "logo-paint",
            "--direction",
            "bottom-to-top",
            "--size",
            "1200x630",
            "--background",
            "#ffffff",
        ])
        .unwrap();
        assert_eq!(cli.direction, Direction::BottomToTop);
        assert_eq!(cli.size, Some(SizePx::new(1200, 630)));
    }

    #[test]
    fn invalid_usage_is_rejected() {
        let rejected = [
            vec!["logo-paint", "--colour", "red"],
            vec!["logo-paint", "--direction", "sideways"],
            vec!["logo-paint", "--size", "big"],
            vec!["logo-paint", "--background", "#fff"],
        ];
        for args in rejected {
            let shown = args.join(" ");
            assert!(Cli::try_parse_from(args).is_err(), "{shown}");
        }
    }
}
