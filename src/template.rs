//! Injecting style fragments into the master document.
//!
//! The master document is treated as text. Nothing is parsed: the injector
//! copies it verbatim and inserts a `<defs>` block and a `<style>` block right
//! before the line that closes the root element.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::style::StyleFragment;
use crate::theme::Theme;

/// Text that closes the root element of the master document.
pub const CLOSING_MARKER: &str = "</svg>";

const BUNDLED_ARTWORK: &str = include_str!("../assets/logo.svg");

// ============================================================================
// Injection
// ============================================================================

/// What to insert into a template.
#[derive(Debug, Clone, Copy)]
pub enum Injection<'a> {
    /// One theme, decided at generation time.
    Single(&'a StyleFragment),

    /// Both themes, each behind a `prefers-color-scheme` media query so the
    /// viewer picks one.
    Adaptive {
        light: &'a StyleFragment,
        dark: &'a StyleFragment,
    },
}

impl Injection<'_> {
    fn render(&self) -> String {
        match self {
            Self::Single(fragment) => format!(
                "<defs>\n{}</defs>\n<style>\n{}</style>\n",
                fragment.definitions_markup(),
                fragment.rules_markup()
            ),
            Self::Adaptive { light, dark } => format!(
                "<defs>\n{}{}</defs>\n<style>\n{}{}</style>\n",
                light.definitions_markup(),
                dark.definitions_markup(),
                media_block(Theme::Light, light),
                media_block(Theme::Dark, dark)
            ),
        }
    }
}

fn media_block(theme: Theme, fragment: &StyleFragment) -> String {
    format!(
        "@media (prefers-color-scheme: {}) {{\n{}}}\n",
        theme.color_scheme(),
        fragment.rules_markup()
    )
}

/// Finds where the style blocks go.
///
/// Returns the start of the line holding the last closing marker when that
/// line has nothing else before the marker, otherwise the marker itself.
fn insertion_point(template: &str) -> Option<usize> {
    let marker = template.rfind(CLOSING_MARKER)?;
    let line_start = template[..marker].rfind('\n').map_or(0, |nl| nl + 1);
    if template[line_start..marker].trim().is_empty() {
        Some(line_start)
    } else {
        Some(marker)
    }
}

/// Inserts `injection` into `template` before the closing marker.
///
/// Fails with [`Error::TemplateInjection`] when the template has no closing
/// marker; the template is never returned unchanged.
pub fn inject_with(template: &str, injection: Injection<'_>) -> Result<String> {
    let at = insertion_point(template).ok_or(Error::TemplateInjection {
        marker: CLOSING_MARKER,
    })?;

    let block = injection.render();
    let mut derived = String::with_capacity(template.len() + block.len() + 1);
    derived.push_str(&template[..at]);
    if !derived.is_empty() && !derived.ends_with('\n') {
        derived.push('\n');
    }
    derived.push_str(&block);
    derived.push_str(&template[at..]);
    Ok(derived)
}

/// Inserts a single theme's styles.
///
/// # Example
///
/// ```
/// use logo_forge::{inject, resolve, Direction, PaintAssignment};
///
/// let fragment = resolve(&PaintAssignment::uniform("#000000"), Direction::Diagonal, None);
/// let derived = inject("<svg>\n</svg>\n", &fragment).unwrap();
/// assert!(derived.contains(".bubble{fill:#000000}\n</style>\n</svg>"));
/// ```
pub fn inject(template: &str, fragment: &StyleFragment) -> Result<String> {
    inject_with(template, Injection::Single(fragment))
}

/// Inserts both themes behind `prefers-color-scheme` media queries.
///
/// The fragments should be resolved with distinct theme tags so their
/// gradient ids do not collide.
pub fn inject_adaptive(
    template: &str,
    light: &StyleFragment,
    dark: &StyleFragment,
) -> Result<String> {
    inject_with(template, Injection::Adaptive { light, dark })
}

// ============================================================================
// Documents
// ============================================================================

/// The master vector document.
#[derive(Debug, Clone)]
pub struct MasterTemplate {
    source: String,
}

impl MasterTemplate {
    /// The artwork compiled into this crate.
    pub fn bundled() -> Self {
        Self {
            source: BUNDLED_ARTWORK.to_owned(),
        }
    }

    /// Reads a template from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded template");
        Ok(Self { source })
    }

    /// Wraps template text that is already in memory.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Loads `path` if given, the bundled artwork otherwise.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::bundled()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Derives a document with `injection` applied.
    pub fn derive(&self, injection: Injection<'_>) -> Result<DerivedDocument> {
        inject_with(&self.source, injection).map(DerivedDocument::new)
    }

    /// Derives a single-theme document.
    pub fn derive_themed(&self, fragment: &StyleFragment) -> Result<DerivedDocument> {
        self.derive(Injection::Single(fragment))
    }

    /// Derives the auto-switching document.
    pub fn derive_adaptive(
        &self,
        light: &StyleFragment,
        dark: &StyleFragment,
    ) -> Result<DerivedDocument> {
        self.derive(Injection::Adaptive { light, dark })
    }
}

/// A styled copy of the master document, held in memory.
///
/// It only reaches the disk when written to its final location or when a tool
/// needs a path to read it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedDocument {
    text: String,
}

impl DerivedDocument {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the contents of the last `<style>` block.
    pub fn style_block(&self) -> Option<&str> {
        let open = self.text.rfind("<style>")? + "<style>".len();
        let close = open + self.text[open..].find("</style>")?;
        Some(&self.text[open..close])
    }

    /// Writes the document to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.text)?;
        Ok(())
    }

    /// Writes the document to a uniquely named temporary file.
    ///
    /// The file is deleted when the returned handle is dropped.
    pub fn persist(&self) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("logo-forge-")
            .suffix(".svg")
            .tempfile()?;
        file.write_all(self.text.as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}

// ============================================================================
// Tests
// ============================================================================
