// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text length measurement through a transient render pass.
//!
//! The surface is the only party that knows how a string renders under a set
//! of presentation attributes, so measuring means building a throwaway `text`
//! element, attaching it long enough to query its computed length, and
//! releasing it again.

use alloc::vec::Vec;

use tracing::warn;

use crate::options::Attributes;
use crate::surface::{ElementKind, Placement, Surface};

/// Releases the transient element when the measurement ends, on every path.
struct Probe<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    node: S::Node,
}

impl<S: Surface + ?Sized> Drop for Probe<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.surface.remove(&self.node) {
            warn!(%err, "failed to release measurement probe");
        }
    }
}

/// Returns the rendered length of `text` styled with `attributes`.
///
/// Empty and whitespace-only strings measure `0.0` without touching the
/// surface. The surface is left exactly as it was found.
pub fn measure_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    attributes: &Attributes,
) -> f64 {
    if text.chars().all(char::is_whitespace) {
        return 0.0;
    }

    let node = surface.create_element(ElementKind::Text);
    let probe = Probe { surface, node };
    for (name, value) in attributes {
        if let Err(err) = probe.surface.set_attribute(&probe.node, name, value) {
            warn!(%err, name = name.as_str(), "measurement attribute rejected");
        }
    }
    if let Err(err) = probe
        .surface
        .set_text_content(&probe.node, text)
        .and_then(|()| probe.surface.insert(&probe.node, Placement::Last))
    {
        warn!(%err, "measurement probe could not be attached");
        return 0.0;
    }
    probe.surface.computed_text_length(&probe.node).max(0.0)
}

/// Measures every line, in order.
pub fn measure_lines<S, L>(surface: &mut S, lines: &[L], attributes: &Attributes) -> Vec<f64>
where
    S: Surface + ?Sized,
    L: AsRef<str>,
{
    lines
        .iter()
        .map(|line| measure_text(surface, line.as_ref(), attributes))
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use textpath_text::HeuristicTextMeasurer;

    use super::*;
    use crate::geo::AffineProjection;
    use crate::svg::SvgSurface;

    fn attrs(font_size: &str) -> Attributes {
        let mut a = Attributes::new();
        a.insert("font-size".to_string(), font_size.to_string());
        a
    }

    #[test]
    fn measures_with_attributes_and_leaves_no_trace() {
        let mut surface = SvgSurface::new(HeuristicTextMeasurer, AffineProjection::default());
        let a = attrs("10");
        for _ in 0..3 {
            let len = measure_text(&mut surface, "abcde", &a);
            assert!((len - 30.0).abs() < 1e-9, "got {len}");
        }
        assert_eq!(surface.element_count(), 0);
        assert!(surface.root().is_empty());
    }

    #[test]
    fn blank_text_is_zero_without_creating_elements() {
        let mut surface = SvgSurface::new(HeuristicTextMeasurer, AffineProjection::default());
        let a = attrs("10");
        assert_eq!(measure_text(&mut surface, "", &a), 0.0);
        assert_eq!(measure_text(&mut surface, " \u{a0} ", &a), 0.0);
        assert_eq!(surface.element_count(), 0);
    }

    #[test]
    fn measure_lines_preserves_order() {
        let mut surface = SvgSurface::new(HeuristicTextMeasurer, AffineProjection::default());
        let lengths = measure_lines(&mut surface, &["a", "abc", ""], &attrs("10"));
        assert_eq!(lengths.len(), 3);
        assert!((lengths[0] - 6.0).abs() < 1e-9);
        assert!((lengths[1] - 18.0).abs() < 1e-9);
        assert_eq!(lengths[2], 0.0);
    }
}
