//! Style resolution: paint assignments to gradient definitions and CSS rules.
//!
//! [`resolve`] is a pure function. It returns a [`StyleFragment`] value that
//! the template injector renders into the master document; nothing here
//! touches the filesystem.

use std::fmt;

use crate::direction::{Direction, GradientLine};
use crate::paint::{ColorSpec, Gradient, PaintAssignment, PaintClass};

// ============================================================================
// Fragment types
// ============================================================================

/// One `<stop>` of a gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientStop {
    /// Position along the gradient axis, in whole percent.
    pub offset: u32,
    pub color: String,
}

/// A `<linearGradient>` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientDef {
    pub id: String,
    pub line: GradientLine,
    pub stops: Vec<GradientStop>,
}

/// What a class rule fills with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    /// A flat color, copied verbatim.
    Color(String),
    /// A reference to a [`GradientDef`] by id.
    Gradient(String),
}

/// A `.class{fill:...}` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub class: PaintClass,
    pub fill: Fill,
}

/// Gradient definitions plus class rules for one theme.
///
/// Rendering is split in two so the injector can place definitions and rules
/// in different containers: see [`StyleFragment::definitions_markup`] and
/// [`StyleFragment::rules_markup`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleFragment {
    pub definitions: Vec<GradientDef>,
    pub rules: Vec<StyleRule>,
}

impl StyleFragment {
    /// Returns the rule for a class, if present.
    pub fn rule(&self, class: PaintClass) -> Option<&StyleRule> {
        self.rules.iter().find(|rule| rule.class == class)
    }

    /// Returns the gradient definition with the given id, if present.
    pub fn definition(&self, id: &str) -> Option<&GradientDef> {
        self.definitions.iter().find(|def| def.id == id)
    }

    /// Renders the gradient definitions, one element per line.
    pub fn definitions_markup(&self) -> String {
        self.definitions.iter().map(|def| format!("{def}\n")).collect()
    }

    /// Renders the class rules, one rule per line.
    pub fn rules_markup(&self) -> String {
        self.rules.iter().map(|rule| format!("{rule}\n")).collect()
    }
}

impl fmt::Display for GradientStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"<stop offset="{}%" stop-color="{}"/>"#, self.offset, self.color)
    }
}

impl fmt::Display for GradientDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let GradientLine { x1, y1, x2, y2 } = self.line;
        write!(
            f,
            r#"<linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">"#,
            self.id
        )?;
        for stop in &self.stops {
            write!(f, "{stop}")?;
        }
        f.write_str("</linearGradient>")
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fill {
            Fill::Color(color) => write!(f, ".{}{{fill:{color}}}", self.class),
            Fill::Gradient(id) => write!(f, ".{}{{fill:url(#{id})}}", self.class),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Builds the gradient id for a class.
///
/// Documents that carry a single theme use the class alone; documents that
/// embed both themes pass a `theme_tag` so the two sets of ids stay distinct.
pub fn gradient_id(class: PaintClass, theme_tag: Option<&str>) -> String {
    match theme_tag {
        Some(tag) => format!("{class}-gradient-{tag}"),
        None => format!("{class}-gradient"),
    }
}

/// Offset in whole percent of stop `index` out of `count`.
///
/// Stops are spread evenly from 0% to 100% with integer division. A single
/// stop sits at 0%.
pub fn stop_offset(index: usize, count: usize) -> u32 {
    if count <= 1 {
        return 0;
    }
    (index * 100 / (count - 1)) as u32
}

fn gradient_def(id: String, gradient: &Gradient, line: GradientLine) -> GradientDef {
    let count = gradient.len();
    let stops = gradient
        .stops()
        .iter()
        .enumerate()
        .map(|(index, color)| GradientStop {
            offset: stop_offset(index, count),
            color: color.clone(),
        })
        .collect();
    GradientDef { id, line, stops }
}

/// Resolves a paint assignment into a style fragment.
///
/// Flat colors become `.class{fill:color}` rules. Gradients become a
/// `<linearGradient>` running along `direction` plus a rule that references
/// it. Every gradient in one call shares the same endpoints.
///
/// # Example
///
/// ```
/// use logo_forge::{resolve, Direction, PaintAssignment, PaintClass};
///
/// let paints = PaintAssignment::new().with(PaintClass::Bubble, "#004080:#0099FF");
/// let fragment = resolve(&paints, Direction::Diagonal, None);
///
/// assert_eq!(fragment.definitions.len(), 1);
/// assert_eq!(
///     fragment.rule(PaintClass::Bubble).unwrap().to_string(),
///     ".bubble{fill:url(#bubble-gradient)}"
/// );
/// ```
pub fn resolve(
    assignment: &PaintAssignment,
    direction: Direction,
    theme_tag: Option<&str>,
) -> StyleFragment {
    let line = direction.line();
    let mut fragment = StyleFragment::default();

    for (class, spec) in assignment.iter() {
        let fill = match spec {
            ColorSpec::Solid(color) => Fill::Color(color.clone()),
            ColorSpec::Gradient(gradient) => {
                let id = gradient_id(class, theme_tag);
                fragment.definitions.push(gradient_def(id.clone(), gradient, line));
                Fill::Gradient(id)
            }
        };
        fragment.rules.push(StyleRule { class, fill });
    }

    fragment
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(def: &GradientDef) -> Vec<u32> {
        def.stops.iter().map(|stop| stop.offset).collect()
    }

    #[test]
    fn solid_colors_become_flat_rules() {
        let paints = PaintAssignment::new().with(PaintClass::ThinBand, "hsl(10, 50%, 50%)");
        let fragment = resolve(&paints, Direction::LeftToRight, None);

        assert!(fragment.definitions.is_empty());
        assert_eq!(
            fragment.rule(PaintClass::ThinBand).unwrap().to_string(),
            ".thin-band{fill:hsl(10, 50%, 50%)}"
        );
    }

    #[test]
    fn black_flavor_has_no_gradients() {
        let paints = PaintAssignment::uniform("#000000");
        let fragment = resolve(&paints, Direction::Diagonal, None);

        assert!(fragment.definitions.is_empty());
        assert_eq!(
            fragment.rules_markup(),
            ".heart{fill:#000000}\n\
             .thick-band{fill:#000000}\n\
             .thin-band{fill:#000000}\n\
             .bubble{fill:#000000}\n"
        );
    }

    #[test]
    fn three_stop_diagonal_bubble() {
        let paints = PaintAssignment::new().with(PaintClass::Bubble, "#004080:#0066CC:#0099FF");
        let fragment = resolve(&paints, Direction::Diagonal, None);

        assert_eq!(fragment.definitions.len(), 1);
        let def = &fragment.definitions[0];
        assert_eq!(def.id, "bubble-gradient");
        assert_eq!(offsets(def), vec![0, 50, 100]);
        assert_eq!(
            def.line,
            GradientLine { x1: 0, y1: 20480, x2: 20480, y2: 0 }
        );
        assert_eq!(
            def.to_string(),
            r##"<linearGradient id="bubble-gradient" gradientUnits="userSpaceOnUse" x1="0" y1="20480" x2="20480" y2="0"><stop offset="0%" stop-color="#004080"/><stop offset="50%" stop-color="#0066CC"/><stop offset="100%" stop-color="#0099FF"/></linearGradient>"##
        );
        assert_eq!(
            fragment.rule(PaintClass::Bubble).unwrap().fill,
            Fill::Gradient("bubble-gradient".into())
        );
    }

    #[test]
    fn stop_offsets_are_floored_and_span_full_range() {
        for count in 2..=12 {
            let stops: Vec<String> = (0..count).map(|i| format!("#{i:06}")).collect();
            let paints = PaintAssignment::new().with(PaintClass::Heart, stops.join(":").as_str());
            let fragment = resolve(&paints, Direction::TopToBottom, None);
            let found = offsets(&fragment.definitions[0]);

            assert_eq!(found.len(), count);
            assert_eq!(found[0], 0);
            assert_eq!(found[count - 1], 100);
            assert!(found.windows(2).all(|w| w[0] <= w[1]));
            for (i, offset) in found.iter().enumerate() {
                assert_eq!(*offset as usize, i * 100 / (count - 1));
            }
        }
        // 100 / 3 truncates rather than rounds.
        assert_eq!(stop_offset(1, 4), 33);
        assert_eq!(stop_offset(2, 4), 66);
    }

    #[test]
    fn single_stop_gradient_sits_at_zero() {
        // A one-stop gradient still goes through the gradient path and renders
        // the same as a flat fill, but keeps its definition.
        let gradient = Gradient::new(["#abcdef"]).unwrap();
        let paints = PaintAssignment::new().with(PaintClass::Heart, ColorSpec::Gradient(gradient));
        let fragment = resolve(&paints, Direction::Diagonal, None);

        assert_eq!(fragment.definitions.len(), 1);
        assert_eq!(
            fragment.definitions[0].stops,
            vec![GradientStop { offset: 0, color: "#abcdef".into() }]
        );
        assert_eq!(
            fragment.rule(PaintClass::Heart).unwrap().to_string(),
            ".heart{fill:url(#heart-gradient)}"
        );
    }

    #[test]
    fn gradients_share_the_direction() {
        let paints = PaintAssignment::from_specs(["#a:#b", "#c:#d", "#e", "#f:#0"]);
        let fragment = resolve(&paints, Direction::BottomToTop, None);

        assert_eq!(fragment.definitions.len(), 3);
        assert!(fragment
            .definitions
            .iter()
            .all(|def| def.line == Direction::BottomToTop.line()));
        assert_eq!(fragment.rules.len(), 4);
    }

    #[test]
    fn theme_tag_namespaces_ids() {
        let paints = PaintAssignment::new().with(PaintClass::ThickBand, "#111:#222");
        let light = resolve(&paints, Direction::Diagonal, Some("light"));
        let dark = resolve(&paints, Direction::Diagonal, Some("dark"));

        assert_eq!(light.definitions[0].id, "thick-band-gradient-light");
        assert_eq!(dark.definitions[0].id, "thick-band-gradient-dark");
        assert_eq!(
            dark.rule(PaintClass::ThickBand).unwrap().to_string(),
            ".thick-band{fill:url(#thick-band-gradient-dark)}"
        );
    }
}
