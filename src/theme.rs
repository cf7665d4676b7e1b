//! Visual themes.
//!
//! A theme resolves every colour and proportion used while painting the
//! board. Themes are plain data: they deserialize from JSON with every field
//! optional, falling back to the built-in default.

use crate::error::{Error, Result};
use crate::intersections::StoneColor;
use crate::flattened::Mark;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub board: BoardStyle,
    pub lines: LineStyle,
    pub star_points: StarPointStyle,
    pub coord_labels: CoordLabelStyle,
    pub stones: StoneStyles,
    /// Drop shadows under placed stones; `None` disables the shadow layer
    pub shadows: Option<ShadowStyle>,
    pub marks: MarkStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarPointStyle {
    pub fill: String,
    /// Radius as a fraction of the intersection spacing
    pub size_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordLabelStyle {
    pub fill: String,
    /// Font size as a fraction of the intersection spacing
    pub size_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoneStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    /// Colour of marks drawn on top of this stone
    pub mark_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoneStyles {
    pub empty: StoneStyle,
    pub black: StoneStyle,
    pub white: StoneStyle,
    pub black_hover: StoneStyle,
    pub white_hover: StoneStyle,
    /// Stone radius as a fraction of the intersection spacing
    pub radius_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowStyle {
    pub fill: String,
    pub opacity: f64,
    /// Offset of the shadow centre as a fraction of the stone radius
    pub offset_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkStyle {
    pub stroke_width: f64,
    /// Glyph size as a fraction of the stone radius
    pub size_fraction: f64,
    /// Label font size as a fraction of the intersection spacing
    pub label_size_fraction: f64,
    pub font_family: String,
    pub correct_variation_fill: String,
    pub stone_marker_fill: String,
}

impl Default for BoardStyle {
    fn default() -> Self {
        Self { fill: "#f5be7e".into(), stroke: "none".into(), stroke_width: 0.0 }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self { stroke: "#000000".into(), stroke_width: 0.5 }
    }
}

impl Default for StarPointStyle {
    fn default() -> Self {
        Self { fill: "#000000".into(), size_fraction: 0.1 }
    }
}

impl Default for CoordLabelStyle {
    fn default() -> Self {
        Self { fill: "#000000".into(), size_fraction: 0.5 }
    }
}

impl Default for StoneStyle {
    fn default() -> Self {
        Self {
            fill: "none".into(),
            stroke: "none".into(),
            stroke_width: 0.0,
            opacity: 0.0,
            mark_color: "#000000".into(),
        }
    }
}

impl StoneStyle {
    fn solid(fill: &str, stroke: &str, opacity: f64, mark_color: &str) -> Self {
        Self {
            fill: fill.into(),
            stroke: stroke.into(),
            stroke_width: 0.5,
            opacity,
            mark_color: mark_color.into(),
        }
    }
}

impl Default for StoneStyles {
    fn default() -> Self {
        Self {
            empty: StoneStyle::default(),
            black: StoneStyle::solid("#000000", "#000000", 1.0, "#ffffff"),
            white: StoneStyle::solid("#ffffff", "#000000", 1.0, "#000000"),
            black_hover: StoneStyle::solid("#000000", "#000000", 0.5, "#ffffff"),
            white_hover: StoneStyle::solid("#ffffff", "#000000", 0.5, "#000000"),
            radius_fraction: 0.48,
        }
    }
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self { fill: "#555555".into(), opacity: 0.5, offset_fraction: 0.2 }
    }
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            size_fraction: 0.5,
            label_size_fraction: 0.6,
            font_family: "sans-serif".into(),
            correct_variation_fill: "#3a9c3a".into(),
            stone_marker_fill: "#808080".into(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            board: BoardStyle::default(),
            lines: LineStyle::default(),
            star_points: StarPointStyle::default(),
            coord_labels: CoordLabelStyle::default(),
            stones: StoneStyles::default(),
            shadows: Some(ShadowStyle::default()),
            marks: MarkStyle::default(),
        }
    }
}

impl Theme {
    /// Names accepted by [`Theme::by_name`]
    pub const BUILTIN: [&'static str; 2] = ["default", "textbook"];

    /// Look up a built-in theme
    pub fn by_name(name: &str) -> Result<Theme> {
        match name {
            "default" => Ok(Theme::default()),
            "textbook" => Ok(Theme::textbook()),
            other => Err(Error::ThemeError(format!("unknown theme '{}'", other))),
        }
    }

    /// Flat black-on-white style used in printed diagrams. No shadows.
    pub fn textbook() -> Theme {
        Theme {
            board: BoardStyle { fill: "#ffffff".into(), ..BoardStyle::default() },
            lines: LineStyle { stroke: "#000000".into(), stroke_width: 1.0 },
            shadows: None,
            ..Theme::default()
        }
    }

    /// Parse a theme from JSON; missing fields take their default value
    pub fn from_json(data: &str) -> Result<Theme> {
        let theme: Theme = serde_json::from_str(data)?;
        theme.validate()?;
        Ok(theme)
    }

    /// Reject proportions and opacities that cannot be drawn
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("stones.radius_fraction", self.stones.radius_fraction),
            ("star_points.size_fraction", self.star_points.size_fraction),
            ("coord_labels.size_fraction", self.coord_labels.size_fraction),
            ("marks.size_fraction", self.marks.size_fraction),
            ("marks.label_size_fraction", self.marks.label_size_fraction),
        ];
        for (name, v) in fractions {
            if !(v > 0.0 && v <= 1.0) {
                return Err(Error::ThemeError(format!("{} must be in (0, 1], got {}", name, v)));
            }
        }

        let mut unit = vec![
            ("stones.empty.opacity", self.stones.empty.opacity),
            ("stones.black.opacity", self.stones.black.opacity),
            ("stones.white.opacity", self.stones.white.opacity),
            ("stones.black_hover.opacity", self.stones.black_hover.opacity),
            ("stones.white_hover.opacity", self.stones.white_hover.opacity),
        ];
        if let Some(shadows) = &self.shadows {
            unit.push(("shadows.opacity", shadows.opacity));
            unit.push(("shadows.offset_fraction", shadows.offset_fraction));
        }
        for (name, v) in unit {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::ThemeError(format!("{} must be in [0, 1], got {}", name, v)));
            }
        }

        let widths = [
            ("board.stroke_width", self.board.stroke_width),
            ("lines.stroke_width", self.lines.stroke_width),
            ("marks.stroke_width", self.marks.stroke_width),
        ];
        for (name, v) in widths {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::ThemeError(format!("{} must be a non-negative number, got {}", name, v)));
            }
        }
        Ok(())
    }

    pub fn stone(&self, color: StoneColor) -> &StoneStyle {
        match color {
            StoneColor::Empty => &self.stones.empty,
            StoneColor::Black => &self.stones.black,
            StoneColor::White => &self.stones.white,
            StoneColor::BlackHover => &self.stones.black_hover,
            StoneColor::WhiteHover => &self.stones.white_hover,
        }
    }

    /// Fill used for a mark drawn over a stone of the given colour
    pub fn mark_fill(&self, mark: Mark, under: StoneColor) -> &str {
        match mark {
            Mark::CorrectVariation => &self.marks.correct_variation_fill,
            Mark::StoneMarker => &self.marks.stone_marker_fill,
            _ => &self.stone(under).mark_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_resolve() {
        for name in Theme::BUILTIN {
            let t = Theme::by_name(name).unwrap();
            assert!(t.validate().is_ok());
        }
        assert!(Theme::by_name("neon").is_err());
        assert!(Theme::textbook().shadows.is_none());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let t = Theme::from_json(r##"{"board": {"fill": "#dcb35c"}, "shadows": null}"##).unwrap();
        assert_eq!(t.board.fill, "#dcb35c");
        assert_eq!(t.lines, LineStyle::default());
        assert!(t.shadows.is_none());
    }

    #[test]
    fn invalid_fraction_is_rejected() {
        let err = Theme::from_json(r#"{"stones": {"radius_fraction": 2.0}}"#).unwrap_err();
        assert!(matches!(err, Error::ThemeError(_)));
    }

    #[test]
    fn every_drawn_proportion_is_checked() {
        for bad in [
            r#"{"marks": {"label_size_fraction": -1}}"#,
            r#"{"coord_labels": {"size_fraction": 0}}"#,
            r#"{"shadows": {"opacity": 1.5}}"#,
            r#"{"shadows": {"offset_fraction": -0.2}}"#,
            r#"{"stones": {"black": {"opacity": 2}}}"#,
            r#"{"lines": {"stroke_width": -1}}"#,
        ] {
            let err = Theme::from_json(bad).unwrap_err();
            assert!(matches!(err, Error::ThemeError(_)), "{} accepted", bad);
        }
    }

    #[test]
    fn shadow_values_checked_only_with_shadow_layer() {
        let mut t = Theme::textbook();
        assert!(t.validate().is_ok());
        t.shadows = Some(ShadowStyle { opacity: f64::NAN, ..ShadowStyle::default() });
        assert!(t.validate().is_err());
    }

    #[test]
    fn mark_colour_follows_stone() {
        let t = Theme::default();
        assert_eq!(t.mark_fill(Mark::Circle, StoneColor::Black), "#ffffff");
        assert_eq!(t.mark_fill(Mark::Circle, StoneColor::Empty), "#000000");
        assert_eq!(t.mark_fill(Mark::CorrectVariation, StoneColor::Black), "#3a9c3a");
    }
}
