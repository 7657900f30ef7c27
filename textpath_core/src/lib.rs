// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text labels laid along map polylines.
//!
//! A label is drawn as an SVG `text` element whose `textPath` follows a
//! polyline. Instead of bending text around arbitrary geometry, this crate
//! reshapes the polyline itself: it becomes a straight segment, centered on the
//! current geometry and exactly long enough for the longest line of text, in
//! one of four orientations.
//!
//! The pieces:
//! - [`Surface`] abstracts the retained element tree labels are drawn into.
//!   [`SvgSurface`] is an in-memory implementation.
//! - [`measure_text`] and [`compute_offsets`] measure lines and stack them.
//! - [`compute_endpoints`] places the reshaped path.
//! - [`TextLayoutEngine`] owns a label's state and reconciles its elements.
//! - [`TextPolyline`] composes a [`Polyline`] with an engine, and
//!   [`LayerGroup`] broadcasts labels to label-capable members.
//!
//! Label styling is resolved from [`TextOptions`] and an explicit
//! [`ThemeContext`]; nothing is read from global state.
//!
//! ```
//! use textpath_core::{
//!     AffineProjection, LatLng, LayerId, Polyline, SvgSurface, TextOptions, TextPolyline,
//!     ThemeContext,
//! };
//! use textpath_text::HeuristicTextMeasurer;
//!
//! let mut surface = SvgSurface::new(HeuristicTextMeasurer, AffineProjection::default());
//! let line = Polyline::new(
//!     LayerId(1),
//!     [LatLng::new(0.0, 0.0), LatLng::new(0.0, 100.0)],
//! );
//! let mut label = TextPolyline::new(line);
//! label.on_add(&mut surface);
//! label.set_text(
//!     &mut surface,
//!     "Main Street",
//!     TextOptions::default(),
//!     &ThemeContext::light(),
//! );
//! assert!(label.label().is_built());
//! assert!(surface.to_svg_string().contains("Main\u{a0}Street"));
//! ```

#![no_std]

extern crate alloc;

mod align;
mod engine;
#[cfg(test)]
mod engine_tests;
mod geo;
mod group;
mod measure;
mod options;
mod polyline;
mod stack;
mod surface;
mod svg;
mod text;

pub use align::{Alignment, compute_endpoints};
pub use engine::{LineNode, TextLayoutEngine};
pub use geo::{AffineProjection, LatLng, LatLngBounds, Projection};
pub use group::{Layer, LayerGroup, TextLayoutCapable};
pub use measure::{measure_lines, measure_text};
pub use options::{
    Attributes, CLICKABLE_CLASS, LABEL_CLASS, StyleOptions, TextOptions, ThemeContext,
};
pub use polyline::{LayerId, PathOptions, Polyline, TextPolyline};
pub use stack::{LINE_STEP, LineOffset, compute_offsets, offsets_from_lengths};
pub use surface::{ElementKind, LabelEvent, Placement, Surface, SurfaceError};
pub use svg::{NodeId, SvgSurface};
pub use text::LabelText;
