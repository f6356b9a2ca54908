//! Paint classes and the colors assigned to them.
//!
//! The master artwork exposes four independently colorable regions, each
//! tagged with a CSS class. A [`PaintAssignment`] maps every region to a
//! [`ColorSpec`], which is either a flat color or a list of gradient stops.
//!
//! Color strings are opaque: they are never validated or converted, only
//! copied into the generated markup.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Separator between gradient stops in a color string.
pub const STOP_DELIMITER: char = ':';

/// Fill applied to classes that were not given a color.
pub const DEFAULT_FILL: &str = "#000000";

// ============================================================================
// PaintClass
// ============================================================================

/// One of the four colorable regions of the master artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaintClass {
    Heart,
    ThickBand,
    ThinBand,
    Bubble,
}

impl PaintClass {
    /// All classes in declaration order, which is also the emission order.
    pub const ALL: [PaintClass; 4] = [
        PaintClass::Heart,
        PaintClass::ThickBand,
        PaintClass::ThinBand,
        PaintClass::Bubble,
    ];

    /// The CSS class name used by the artwork.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Heart => "heart",
            Self::ThickBand => "thick-band",
            Self::ThinBand => "thin-band",
            Self::Bubble => "bubble",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PaintClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

impl FromStr for PaintClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.css_class() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown paint class `{s}`")))
    }
}

// ============================================================================
// ColorSpec
// ============================================================================

/// An ordered, non-empty list of gradient stop colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    stops: Vec<String>,
}

impl Gradient {
    /// Creates a gradient from its stop colors.
    ///
    /// Fails with [`Error::InvalidArgument`] if `stops` is empty.
    pub fn new<I, S>(stops: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stops: Vec<String> = stops.into_iter().map(Into::into).collect();
        if stops.is_empty() {
            return Err(Error::InvalidArgument(
                "a gradient needs at least one stop".into(),
            ));
        }
        Ok(Self { stops })
    }

    /// Returns the stop colors in order.
    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    /// Returns the number of stops (always at least one).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// The paint for one class: a flat color or a gradient.
///
/// Parsing decides the variant once; nothing downstream inspects the raw
/// string again.
///
/// # Example
///
/// ```
/// use logo_forge::ColorSpec;
///
/// let solid: ColorSpec = "#ff0000".parse().unwrap();
/// assert!(solid.is_solid());
///
/// let ramp: ColorSpec = "#004080:#0066CC:#0099FF".parse().unwrap();
/// assert_eq!(ramp.as_gradient().unwrap().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    Solid(String),
    Gradient(Gradient),
}

impl ColorSpec {
    /// Creates a flat color.
    pub fn solid(color: impl Into<String>) -> Self {
        Self::Solid(color.into())
    }

    /// Parses a color string: anything containing [`STOP_DELIMITER`] becomes
    /// a gradient, everything else a flat color.
    pub fn parse(spec: &str) -> Self {
        if spec.contains(STOP_DELIMITER) {
            // Splitting a string that contains the delimiter always yields at
            // least two parts, so the gradient is never empty.
            Self::Gradient(Gradient {
                stops: spec.split(STOP_DELIMITER).map(str::to_owned).collect(),
            })
        } else {
            Self::Solid(spec.to_owned())
        }
    }

    /// Returns true for flat colors.
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }

    /// Returns the gradient, if this is one.
    pub fn as_gradient(&self) -> Option<&Gradient> {
        match self {
            Self::Gradient(gradient) => Some(gradient),
            Self::Solid(_) => None,
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::solid(DEFAULT_FILL)
    }
}

impl FromStr for ColorSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => f.write_str(color),
            Self::Gradient(gradient) => {
                f.write_str(&gradient.stops.join(&STOP_DELIMITER.to_string()))
            }
        }
    }
}

// ============================================================================
// PaintAssignment
// ============================================================================

/// A color for each of the four paint classes.
///
/// Classes that are never set keep [`DEFAULT_FILL`].
///
/// # Example
///
/// ```
/// use logo_forge::{PaintAssignment, PaintClass};
///
/// let paints = PaintAssignment::new()
///     .with(PaintClass::Heart, "#ff0000")
///     .with(PaintClass::Bubble, "#004080:#0099FF");
///
/// assert_eq!(paints.get(PaintClass::ThinBand).to_string(), "#000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaintAssignment {
    paints: [ColorSpec; 4],
}

impl PaintAssignment {
    /// Creates an assignment with every class set to [`DEFAULT_FILL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assignment that paints every class with the same color.
    pub fn uniform(spec: impl Into<ColorSpec>) -> Self {
        let spec = spec.into();
        Self {
            paints: std::array::from_fn(|_| spec.clone()),
        }
    }

    /// Creates an assignment from four color strings in declaration order
    /// (heart, thick band, thin band, bubble).
    pub fn from_specs(specs: [&str; 4]) -> Self {
        Self {
            paints: specs.map(ColorSpec::parse),
        }
    }

    /// Sets the color of one class.
    pub fn with(mut self, class: PaintClass, spec: impl Into<ColorSpec>) -> Self {
        self.set(class, spec);
        self
    }

    /// Sets the color of one class in place.
    pub fn set(&mut self, class: PaintClass, spec: impl Into<ColorSpec>) {
        self.paints[class.index()] = spec.into();
    }

    /// Returns the color of one class.
    pub fn get(&self, class: PaintClass) -> &ColorSpec {
        &self.paints[class.index()]
    }

    /// Iterates classes and their colors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (PaintClass, &ColorSpec)> {
        PaintClass::ALL.into_iter().zip(self.paints.iter())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_color_is_solid() {
        assert_eq!(ColorSpec::parse("#0066CC"), ColorSpec::solid("#0066CC"));
        assert_eq!(ColorSpec::parse("rebeccapurple"), ColorSpec::solid("rebeccapurple"));
    }

    #[test]
    fn delimited_color_is_gradient() {
        let spec = ColorSpec::parse("#004080:#0066CC:#0099FF");
        let gradient = spec.as_gradient().expect("should be a gradient");
        assert_eq!(gradient.stops(), ["#004080", "#0066CC", "#0099FF"]);
    }

    #[test]
    fn stops_are_passed_through_verbatim() {
        let spec = ColorSpec::parse("not a color: rgb(1, 2, 3)");
        let gradient = spec.as_gradient().unwrap();
        assert_eq!(gradient.stops(), ["not a color", " rgb(1, 2, 3)"]);
    }

    #[test]
    fn trailing_delimiter_keeps_empty_stop() {
        let spec = ColorSpec::parse("#fff:");
        assert_eq!(spec.as_gradient().unwrap().stops(), ["#fff", ""]);
    }

    #[test]
    fn empty_gradient_is_rejected() {
        let err = Gradient::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn display_restores_source_string() {
        for source in ["#123456", "#a:#b", "red:green:blue"] {
            assert_eq!(ColorSpec::parse(source).to_string(), source);
        }
    }

    #[test]
    fn unset_classes_default_to_black() {
        let paints = PaintAssignment::new().with(PaintClass::Heart, "#ff0000");
        assert_eq!(paints.get(PaintClass::Heart), &ColorSpec::solid("#ff0000"));
        for class in [PaintClass::ThickBand, PaintClass::ThinBand, PaintClass::Bubble] {
            assert_eq!(paints.get(class), &ColorSpec::solid(DEFAULT_FILL));
        }
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let paints = PaintAssignment::from_specs(["a", "b", "c", "d"]);
        let order: Vec<_> = paints.iter().map(|(class, spec)| (class, spec.to_string())).collect();
        assert_eq!(
            order,
            vec![
                (PaintClass::Heart, "a".to_string()),
                (PaintClass::ThickBand, "b".to_string()),
                (PaintClass::ThinBand, "c".to_string()),
                (PaintClass::Bubble, "d".to_string()),
            ]
        );
    }

    #[test]
    fn class_names_round_trip() {
        for class in PaintClass::ALL {
            assert_eq!(class.css_class().parse::<PaintClass>().unwrap(), class);
        }
        assert!("stripe".parse::<PaintClass>().is_err());
    }
}
