// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for path labels.
//!
//! Labels laid along a path need the rendered length of every line before the
//! path can be stretched to fit them. The rendering surface owns fonts and
//! shaping, so label layout depends only on the small [`TextMeasurer`]
//! interface defined here.
//!
//! Styles arrive as SVG presentation attributes (`font-size`, `font-family`,
//! ...). [`TextStyle::from_attributes`] turns such an attribute set into the
//! handful of properties that affect measurement; everything else (fill,
//! class, opacity) is ignored.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;

/// Font size used when no `font-size` attribute is present (the SVG initial value).
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// A single-line text measurement interface.
///
/// Implementations can be:
/// - heuristic (fast, but inaccurate),
/// - backed by a shaping engine (e.g. Parley), or
/// - backed by a host renderer that already knows the resolved fonts.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as one run; callers split on `\n` themselves.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in surface pixels.
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
    /// Extra advance added after every character, in pixels.
    pub letter_spacing: f64,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
            letter_spacing: 0.0,
        }
    }

    /// Builds a style from SVG presentation attributes.
    ///
    /// Later attributes win over earlier ones, so callers can pass inherited
    /// attributes first and the element's own attributes last. Unparseable
    /// values are ignored and leave the previous value in place.
    pub fn from_attributes<'a, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut style = Self::default();
        for (name, value) in attributes {
            style.apply_attribute(name, value);
        }
        style
    }

    /// Applies a single presentation attribute to this style.
    ///
    /// Returns `true` if the attribute affects measurement and was understood.
    pub fn apply_attribute(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        match name {
            "font-size" => match parse_length(value) {
                Some(size) if size >= 0.0 => {
                    self.font_size = size;
                    true
                }
                _ => false,
            },
            "font-family" => match FontFamily::parse(value) {
                Some(family) => {
                    self.font_family = family;
                    true
                }
                None => false,
            },
            "font-weight" => match FontWeight::parse(value) {
                Some(weight) => {
                    self.font_weight = weight;
                    true
                }
                None => false,
            },
            "font-style" => match FontStyle::parse(value) {
                Some(font_style) => {
                    self.font_style = font_style;
                    true
                }
                None => false,
            },
            "letter-spacing" => {
                if value == "normal" {
                    self.letter_spacing = 0.0;
                    return true;
                }
                match parse_length(value) {
                    Some(spacing) => {
                        self.letter_spacing = spacing;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

/// Parses an absolute CSS length (`12`, `12px`, `9pt`) into pixels.
fn parse_length(value: &str) -> Option<f64> {
    let (number, scale) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else {
        (value, 1.0)
    };
    let parsed: f64 = number.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed * scale)
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Inter"`, `"Helvetica Neue"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Parses the first entry of a CSS font-family list.
    ///
    /// Quotes around named families are stripped. Returns `None` for an empty list.
    pub fn parse(list: &str) -> Option<Self> {
        let first = list.split(',').next()?.trim();
        let first = first.trim_matches(|c| c == '"' || c == '\'').trim();
        match first {
            "" => None,
            "serif" => Some(Self::Serif),
            "sans-serif" => Some(Self::SansSerif),
            "monospace" => Some(Self::Monospace),
            name => Some(Self::Named(Arc::from(name))),
        }
    }

    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);

    /// Parses `normal`, `bold`, or a numeric weight in `1..=1000`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::NORMAL),
            "bold" => Some(Self::BOLD),
            _ => value
                .parse::<u16>()
                .ok()
                .filter(|w| (1..=1000).contains(w))
                .map(Self),
        }
    }
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

impl FontStyle {
    /// Parses a CSS `font-style` keyword.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "italic" => Some(Self::Italic),
            v if v.starts_with("oblique") => Some(Self::Oblique),
            _ => None,
        }
    }
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// The advance width along the text direction.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Metrics of an empty run.
    pub const EMPTY: Self = Self {
        advance_width: 0.0,
        ascent: 0.0,
        descent: 0.0,
        leading: 0.0,
    };

    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// A tiny heuristic text measurer suitable for tests, demos, and headless layout.
///
/// It assumes an average glyph width of ~0.6em and a baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let chars = text.chars().count();
        if chars == 0 {
            return TextMetrics::EMPTY;
        }
        let per_char = 0.6 * style.font_size + style.letter_spacing;
        TextMetrics {
            advance_width: (per_char * chars as f64).max(0.0),
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn attributes_override_defaults_in_order() {
        let style = TextStyle::from_attributes([
            ("font-size", "10px"),
            ("fill", "white"),
            ("font-family", "'Open Sans', sans-serif"),
            ("font-weight", "bold"),
            ("font-size", "12"),
        ]);
        assert_eq!(style.font_size, 12.0);
        assert_eq!(style.font_family, FontFamily::Named(Arc::from("Open Sans")));
        assert_eq!(style.font_weight, FontWeight::BOLD);
        assert_eq!(style.font_style, FontStyle::Normal);
    }

    #[test]
    fn unparseable_values_keep_previous_value() {
        let mut style = TextStyle::new(14.0);
        assert!(!style.apply_attribute("font-size", "large"));
        assert!(!style.apply_attribute("font-weight", "1200"));
        assert_eq!(style.font_size, 14.0);
        assert_eq!(style.font_weight, FontWeight::NORMAL);
    }

    #[test]
    fn point_sizes_convert_to_pixels() {
        let style = TextStyle::from_attributes([("font-size", "9pt")]);
        assert!((style.font_size - 12.0).abs() < 1e-9);
    }

    #[test]
    fn heuristic_width_scales_with_chars_and_spacing() {
        let m = HeuristicTextMeasurer;
        let mut style = TextStyle::new(10.0);
        assert_eq!(m.measure("", &style).advance_width, 0.0);
        assert!((m.measure("abcd", &style).advance_width - 24.0).abs() < 1e-9);
        style.letter_spacing = 1.0;
        assert!((m.measure("abcd", &style).advance_width - 28.0).abs() < 1e-9);
    }
}
