// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parley-backed text measurement adapter.
//!
//! This crate implements [`textpath_text::TextMeasurer`] using Parley, so path
//! labels are stretched to shaping-aware line lengths instead of a glyph-width
//! estimate.

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use core::cell::RefCell;

use parley::style::{FontFamily as ParleyFontFamily, FontStack, GenericFamily, StyleProperty};
use parley::{
    Alignment, AlignmentOptions, FontContext, FontStyle as ParleyFontStyle, FontWeight, Layout,
    LayoutContext,
};
use textpath_text::{FontFamily, FontStyle, TextMeasurer, TextMetrics, TextStyle};

/// A [`TextMeasurer`] backed by Parley.
///
/// Each call shapes one line; the font and layout contexts are reused across calls.
pub struct ParleyTextMeasurer {
    font_cx: RefCell<FontContext>,
    layout_cx: RefCell<LayoutContext<()>>,
    display_scale: f32,
    quantize: bool,
}

impl core::fmt::Debug for ParleyTextMeasurer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParleyTextMeasurer")
            .field("display_scale", &self.display_scale)
            .field("quantize", &self.quantize)
            .finish_non_exhaustive()
    }
}

impl ParleyTextMeasurer {
    /// Creates a measurer using Parley's default system font configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_font_context(FontContext::new())
    }

    /// Creates a measurer over a caller-populated font context.
    ///
    /// Embedders that register their own fonts (for example the fonts their
    /// map style ships with) should use this so measured lengths match what
    /// the surface renders.
    #[must_use]
    pub fn with_font_context(font_cx: FontContext) -> Self {
        Self {
            font_cx: RefCell::new(font_cx),
            layout_cx: RefCell::new(LayoutContext::new()),
            display_scale: 1.0,
            quantize: true,
        }
    }

    /// Sets the display scale (device pixel ratio) passed to Parley.
    ///
    /// Measurements are divided by the scale, so results stay in surface pixels.
    #[must_use]
    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale.max(0.0);
        self
    }

    /// Sets whether Parley should quantize layout coordinates to pixel boundaries.
    #[must_use]
    pub fn with_quantize(mut self, quantize: bool) -> Self {
        self.quantize = quantize;
        self
    }

    fn shape(&self, text: &str, style: &TextStyle, scale: f32) -> Layout<()> {
        let mut font_cx = self.font_cx.borrow_mut();
        let mut layout_cx = self.layout_cx.borrow_mut();

        let mut builder = layout_cx.ranged_builder(&mut font_cx, text, scale, self.quantize);
        builder.push_default(StyleProperty::FontSize(clamp_f32(style.font_size)));
        builder.push_default(StyleProperty::FontStack(font_stack(&style.font_family)));
        builder.push_default(StyleProperty::FontStyle(match style.font_style {
            FontStyle::Normal => ParleyFontStyle::Normal,
            FontStyle::Italic => ParleyFontStyle::Italic,
            FontStyle::Oblique => ParleyFontStyle::Oblique(None),
        }));
        builder.push_default(StyleProperty::FontWeight(FontWeight::new(f32::from(
            style.font_weight.0,
        ))));
        if style.letter_spacing != 0.0 {
            builder.push_default(StyleProperty::LetterSpacing(clamp_f32(
                style.letter_spacing,
            )));
        }

        let mut layout: Layout<()> = builder.build(text);
        // Labels never wrap: a line is laid out at its natural width.
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());
        layout
    }
}

impl Default for ParleyTextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

fn font_stack(family: &FontFamily) -> FontStack<'_> {
    FontStack::from(match family {
        FontFamily::Serif => ParleyFontFamily::Generic(GenericFamily::Serif),
        FontFamily::SansSerif => ParleyFontFamily::Generic(GenericFamily::SansSerif),
        FontFamily::Monospace => ParleyFontFamily::Generic(GenericFamily::Monospace),
        FontFamily::Named(name) => ParleyFontFamily::Named(Cow::Borrowed(name.as_ref())),
    })
}

/// Narrows a style length to `f32`, mapping non-finite and negative values to zero.
fn clamp_f32(value: f64) -> f32 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    if value >= f64::from(f32::MAX) {
        f32::MAX
    } else {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Value is clamped to f32::MAX above"
        )]
        {
            value as f32
        }
    }
}

impl TextMeasurer for ParleyTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let text = text.split('\n').next().unwrap_or("");
        if text.is_empty() {
            return TextMetrics::EMPTY;
        }

        let scale = self.display_scale.max(1.0e-6);
        let layout = self.shape(text, style, scale);
        let Some(line) = layout.lines().next() else {
            return TextMetrics::EMPTY;
        };

        let m = line.metrics();
        let unscale = |v: f32| f64::from(v) / f64::from(scale);
        TextMetrics {
            advance_width: unscale(m.advance),
            ascent: unscale(m.ascent),
            descent: unscale(m.descent),
            leading: unscale(m.leading),
        }
    }
}
