//! Generates the full themed asset catalog for every flavor.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use logo_forge::cli::{self, EXIT_PARTIAL};
use logo_forge::{
    flavor_names, select_flavors, Backend, ForgeConfig, Generator, MasterTemplate, RunReport,
};

#[derive(Parser, Debug)]
#[command(name = "logo-forge", version)]
#[command(about = "Generate favicons, app icons and social previews for every flavor")]
struct Cli {
    /// Output root; defaults to `output` from the configuration (`dist`)
    output: Option<PathBuf>,

    /// Configuration file (defaults to ./logo-forge.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Master SVG to recolor instead of the bundled artwork
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Rasterizing backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Only generate this flavor (repeatable)
    #[arg(long = "flavor", value_name = "NAME")]
    flavors: Vec<String>,

    /// JPEG quality for lossy outputs
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Print the built-in flavor names and exit
    #[arg(long)]
    list_flavors: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layers command-line flags over the loaded configuration.
    fn apply_to(&self, config: &mut ForgeConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(template) = &self.template {
            config.template = Some(template.clone());
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if !self.flavors.is_empty() {
            config.flavors = self.flavors.clone();
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    let mut config =
        ForgeConfig::discover(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);

    let flavors = select_flavors(&config.flavors)?;
    let template = MasterTemplate::load_or_bundled(config.template.as_deref())
        .with_context(|| match &config.template {
            Some(path) => format!("failed to read template {}", path.display()),
            None => "failed to load bundled template".to_string(),
        })?;

    let generator = Generator::new(template, config.backend.create(&config.tools))
        .with_jpeg_quality(config.jpeg_quality);
    let report = generator.run(&config.output, &flavors)?;
    Ok(report)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    if cli.list_flavors {
        for name in flavor_names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(report) if report.is_success() => {
            println!("{} outputs written", report.completed);
            ExitCode::SUCCESS
        }
        Ok(report) => {
            eprintln!(
                "{} outputs written, {} failed, {} skipped:",
                report.completed,
                report.failures.len(),
                report.skipped
            );
            for failure in &report.failures {
                eprintln!("  {failure}");
            }
            ExitCode::from(EXIT_PARTIAL)
        }
        Err(err) => cli::fail(&err),
    }
}
