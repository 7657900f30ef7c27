// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label styling: caller overrides, theme defaults, and their resolution.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};

use peniko::Color;
use peniko::color::palette::css;

/// Presentation attributes applied to a label's `text` element.
///
/// Ordered so that serialized output and measurement are deterministic.
pub type Attributes = BTreeMap<String, String>;

/// Class set on every label `text` and `textPath` element.
pub const LABEL_CLASS: &str = "textpath-label";

/// Class added to the `textPath` of clickable labels.
pub const CLICKABLE_CLASS: &str = "textpath-clickable";

/// The visual theme of the surface a label is drawn on.
///
/// Consulted once per layout pass to pick a contrasting default text color.
/// Labels never mutate it.
#[derive(Clone, Debug)]
pub struct ThemeContext {
    basemap: String,
    dark: bool,
    fill_on_light: Color,
    fill_on_dark: Color,
}

impl ThemeContext {
    /// A theme for the named basemap.
    pub fn new(basemap: impl Into<String>, dark: bool) -> Self {
        Self {
            basemap: basemap.into(),
            dark,
            fill_on_light: css::BLACK,
            fill_on_dark: css::WHITE,
        }
    }

    /// A light theme.
    pub fn light() -> Self {
        Self::new("light", false)
    }

    /// A dark theme.
    pub fn dark() -> Self {
        Self::new("dark", true)
    }

    /// A theme for `basemap`, dark when it is one of `dark_basemaps`.
    pub fn from_basemap(basemap: &str, dark_basemaps: &[&str]) -> Self {
        Self::new(basemap, dark_basemaps.contains(&basemap))
    }

    /// Overrides the text colors used on light and dark basemaps.
    pub fn with_contrast(mut self, on_light: impl Into<Color>, on_dark: impl Into<Color>) -> Self {
        self.fill_on_light = on_light.into();
        self.fill_on_dark = on_dark.into();
        self
    }

    /// The basemap name.
    pub fn basemap(&self) -> &str {
        &self.basemap
    }

    /// Whether the basemap is dark.
    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// The default label color for this theme.
    pub fn text_fill(&self) -> Color {
        if self.dark {
            self.fill_on_dark
        } else {
            self.fill_on_light
        }
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::light()
    }
}

/// Formats a color as an SVG paint value (`#rrggbb`).
pub(crate) fn svg_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

/// Caller-supplied label options; unset fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextOptions {
    /// Presentation attribute overrides (e.g. `font-size`, `fill`).
    pub attributes: Attributes,
    /// Repeat the text along the path.
    pub repeat: Option<bool>,
    /// Center the label on the path.
    pub center: Option<bool>,
    /// Insert the label underneath existing surface content.
    pub below: Option<bool>,
    /// Vertical offset (`dy`) of the label from the path.
    pub offset: Option<f64>,
    /// Forward pointer events on the label to its path.
    pub clickable: Option<bool>,
}

impl TextOptions {
    /// Creates empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a presentation attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets whether the text repeats along the path.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Sets whether the label is centered on the path.
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = Some(center);
        self
    }

    /// Sets whether the label is inserted below existing content.
    pub fn with_below(mut self, below: bool) -> Self {
        self.below = Some(below);
        self
    }

    /// Sets the vertical offset from the path.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets whether pointer events are forwarded to the path.
    pub fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = Some(clickable);
        self
    }
}

/// Fully resolved label options.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleOptions {
    /// Presentation attributes for the `text` element.
    pub attributes: Attributes,
    /// Repeat the text along the path.
    ///
    /// Carried for hosts that render it; the path is stretched to exactly one
    /// copy of the text, so layout itself never repeats.
    pub repeat: bool,
    /// Center the label on the path.
    pub center: bool,
    /// Insert the label underneath existing surface content.
    pub below: bool,
    /// Vertical offset; `None` uses the path's stroke width.
    pub offset: Option<f64>,
    /// Forward pointer events on the label to its path.
    pub clickable: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("class".to_string(), LABEL_CLASS.to_string());
        Self {
            attributes,
            repeat: false,
            center: true,
            below: false,
            offset: None,
            clickable: false,
        }
    }
}

impl StyleOptions {
    /// Resolves `overrides` over theme defaults over built-in defaults.
    pub fn resolve(overrides: &TextOptions, theme: &ThemeContext) -> Self {
        let mut style = Self::default();
        style
            .attributes
            .insert("fill".to_string(), svg_color(theme.text_fill()));
        style.attributes.extend(
            overrides
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if let Some(repeat) = overrides.repeat {
            style.repeat = repeat;
        }
        if let Some(center) = overrides.center {
            style.center = center;
        }
        if let Some(below) = overrides.below {
            style.below = below;
        }
        if overrides.offset.is_some() {
            style.offset = overrides.offset;
        }
        if let Some(clickable) = overrides.clickable {
            style.clickable = clickable;
        }
        style
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn theme_picks_contrasting_fill() {
        let dark = ThemeContext::from_basemap("satellite", &["dark_map", "satellite"]);
        assert!(dark.is_dark());
        assert_eq!(
            StyleOptions::resolve(&TextOptions::new(), &dark).attributes["fill"],
            "#ffffff"
        );
        let light = ThemeContext::from_basemap("streets", &["dark_map", "satellite"]);
        assert_eq!(
            StyleOptions::resolve(&TextOptions::new(), &light).attributes["fill"],
            "#000000"
        );
    }

    #[test]
    fn caller_overrides_win_over_theme_and_defaults() {
        let overrides = TextOptions::new()
            .with_attribute("fill", "red")
            .with_attribute("font-size", "14")
            .with_center(false)
            .with_offset(4.0);
        let style = StyleOptions::resolve(&overrides, &ThemeContext::dark());
        assert_eq!(style.attributes["fill"], "red");
        assert_eq!(style.attributes["font-size"], "14");
        assert_eq!(style.attributes["class"], LABEL_CLASS);
        assert!(!style.center);
        assert!(!style.below);
        assert!(!style.repeat);
        assert_eq!(style.offset, Some(4.0));
    }

    #[test]
    fn defaults_center_and_are_not_clickable() {
        let style = StyleOptions::resolve(&TextOptions::new(), &ThemeContext::default());
        assert!(style.center);
        assert!(!style.clickable);
        assert_eq!(style.offset, None);
    }
}
