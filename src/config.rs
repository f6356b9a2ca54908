//! Generator configuration file handling (`logo-forge.toml`).
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. Command-line flags override whatever is loaded here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::{Backend, ToolPaths};

/// Name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "logo-forge.toml";

/// Top-level configuration.
///
/// ```toml
/// output = "dist"
/// template = "assets/logo.svg"
/// backend = "external"
/// jpeg_quality = 85
/// flavors = ["ocean", "black"]
///
/// [tools]
/// rasterizer = "rsvg-convert"
/// compositor = "magick"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Root directory for generated assets.
    pub output: PathBuf,
    /// Master document; the bundled artwork when unset.
    pub template: Option<PathBuf>,
    pub backend: Backend,
    /// Quality factor for lossy outputs (1-100).
    pub jpeg_quality: u8,
    /// Flavors to generate; empty means all built-in flavors.
    pub flavors: Vec<String>,
    pub tools: ToolPaths,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist"),
            template: None,
            backend: Backend::default(),
            jpeg_quality: 85,
            flavors: Vec::new(),
            tools: ToolPaths::default(),
        }
    }
}

impl ForgeConfig {
    /// Parses a configuration from TOML text.
    ///
    /// `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| Error::Config {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content, path)?;

        // Relative paths in the file are relative to the file itself.
        if let Some(base) = path.parent() {
            config.output = base.join(&config.output);
            config.template = config.template.map(|template| base.join(template));
        }
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] from the
    /// working directory if it exists, otherwise the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::load(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Checks value ranges that the type system does not.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::InvalidArgument(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| Error::InvalidArgument(format!("cannot serialize config: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ForgeConfig::from_toml_str("", Path::new("empty.toml")).unwrap();
        assert_eq!(config, ForgeConfig::default());
        assert_eq!(config.backend, Backend::External);
        assert_eq!(config.tools.rasterizer, PathBuf::from("rsvg-convert"));
    }

    #[test]
    fn fields_override_defaults() {
        let toml = r#"
            backend = "builtin"
            jpeg_quality = 70
            flavors = ["ocean"]

            [tools]
            compositor = "/opt/im/bin/convert"
        "#;
        let config = ForgeConfig::from_toml_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.backend, Backend::Builtin);
        assert_eq!(config.jpeg_quality, 70);
        assert_eq!(config.flavors, ["ocean"]);
        assert_eq!(config.tools.compositor, PathBuf::from("/opt/im/bin/convert"));
        assert_eq!(config.tools.rasterizer, PathBuf::from("rsvg-convert"));
    }

    #[test]
    fn unknown_backend_is_a_config_error() {
        let err = ForgeConfig::from_toml_str("backend = \"gimp\"", Path::new("bad.toml")).unwrap_err();
        match err {
            Error::Config { path, .. } => assert_eq!(path, PathBuf::from("bad.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let err = ForgeConfig::from_toml_str("jpeg_quality = 0", Path::new("q.toml")).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn relative_paths_resolve_against_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "output = \"out\"\ntemplate = \"art/logo.svg\"\n").unwrap();

        let config = ForgeConfig::load(&path).unwrap();
        assert_eq!(config.output, dir.path().join("out"));
        assert_eq!(config.template, Some(dir.path().join("art/logo.svg")));
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = ForgeConfig {
            flavors: vec!["mono".into()],
            ..ForgeConfig::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(ForgeConfig::from_toml_str(&text, Path::new("x.toml")).unwrap(), config);
    }
}
