// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Left-stacking of wrapped label lines.
//!
//! Lines of a label are consecutive `tspan` runs on one `textPath`, so each
//! run starts where the previous one ended. Shifting run `i` back by the
//! length of run `i - 1` (and down by a fixed step) stacks the lines flush
//! left under each other.

use alloc::vec::Vec;

use crate::measure::measure_lines;
use crate::options::Attributes;
use crate::surface::Surface;

/// Vertical distance between consecutive lines, in pixels.
pub const LINE_STEP: f64 = 20.0;

/// Relative offsets of one line run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineOffset {
    /// Horizontal shift relative to where the previous run ended.
    pub dx: f64,
    /// Vertical shift relative to the previous run.
    pub dy: f64,
}

/// Offsets for lines whose rendered lengths are `lengths`.
///
/// A zero-length line keeps the previous non-zero length in effect, so blank
/// lines never break the stacking of the lines after them.
pub fn offsets_from_lengths(lengths: &[f64]) -> Vec<LineOffset> {
    let mut previous = 0.0;
    let mut out = Vec::with_capacity(lengths.len());
    for (i, &length) in lengths.iter().enumerate() {
        out.push(LineOffset {
            dx: if previous == 0.0 { 0.0 } else { -previous },
            dy: if i == 0 { 0.0 } else { LINE_STEP },
        });
        if length != 0.0 {
            previous = length;
        }
    }
    out
}

/// Measures `lines` and returns the offset of each.
pub fn compute_offsets<S, L>(surface: &mut S, lines: &[L], attributes: &Attributes) -> Vec<LineOffset>
where
    S: Surface + ?Sized,
    L: AsRef<str>,
{
    // The last line's length never shifts anything.
    let head = &lines[..lines.len().saturating_sub(1)];
    let mut lengths = measure_lines(surface, head, attributes);
    lengths.extend((head.len()..lines.len()).map(|_| 0.0));
    offsets_from_lengths(&lengths)
}
