// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path layers that labels ride on.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Point;
use peniko::Color;
use tracing::warn;

use crate::engine::TextLayoutEngine;
use crate::geo::{LatLng, LatLngBounds};
use crate::group::{Layer, TextLayoutCapable};
use crate::options::{TextOptions, ThemeContext, svg_color};
use crate::surface::{ElementKind, Placement, Surface};
use crate::text::LabelText;

/// Stable identity of a layer, used to derive element ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Stroke styling of a path.
#[derive(Clone, Debug)]
pub struct PathOptions {
    /// Whether the path is stroked.
    pub stroke: bool,
    /// Stroke width in pixels. Also the default label offset.
    pub stroke_width: f64,
    /// Stroke color.
    pub color: Color,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            stroke: true,
            stroke_width: 5.0,
            color: Color::from_rgba8(0x00, 0x33, 0xff, 0xff),
        }
    }
}

impl PathOptions {
    /// Sets whether the path is stroked.
    pub fn with_stroke(mut self, stroke: bool) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the stroke width.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Sets the stroke color.
    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }
}

/// A polyline drawn on a surface.
#[derive(Debug)]
pub struct Polyline<N> {
    id: LayerId,
    latlngs: Vec<LatLng>,
    options: PathOptions,
    node: Option<N>,
}

impl<N: Clone + PartialEq + Debug> Polyline<N> {
    /// Creates a polyline through `latlngs`. It is not drawn until added.
    pub fn new(id: LayerId, latlngs: impl IntoIterator<Item = LatLng>) -> Self {
        Self {
            id,
            latlngs: latlngs.into_iter().collect(),
            options: PathOptions::default(),
            node: None,
        }
    }

    /// Sets the stroke styling used when the polyline is added.
    pub fn with_options(mut self, options: PathOptions) -> Self {
        self.options = options;
        self
    }

    /// The layer id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The `id` attribute labels reference this path by.
    pub fn element_id(&self) -> String {
        format!("pathdef-{}", self.id.0)
    }

    /// The current vertices.
    pub fn lat_lngs(&self) -> &[LatLng] {
        &self.latlngs
    }

    /// The stroke styling.
    pub fn options(&self) -> &PathOptions {
        &self.options
    }

    /// The path element, while added to a surface.
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    /// Bounds of the current vertices.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(&self.latlngs)
    }

    /// Creates and draws the path element. No-op if already added.
    pub fn on_add<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        if self.node.is_some() {
            return;
        }
        let node = surface.create_element(ElementKind::Path);
        if let Err(err) = surface.insert(&node, Placement::Last) {
            warn!(%err, layer = self.id.0, "could not add path");
            return;
        }
        self.node = Some(node);
        self.apply_style(surface);
        self.redraw(surface);
    }

    /// Removes the path element. No-op if not added.
    pub fn on_remove<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        let Some(node) = self.node.take() else {
            return;
        };
        if surface.is_connected(&node) {
            if let Err(err) = surface.remove(&node) {
                warn!(%err, layer = self.id.0, "could not remove path");
            }
        }
    }

    /// Replaces the vertices and redraws the geometry.
    ///
    /// Only the path is redrawn; a label riding on it is re-laid out when its
    /// owner asks for it, not on every geometry change.
    pub fn set_lat_lngs<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        latlngs: &[LatLng],
    ) {
        self.latlngs.clear();
        self.latlngs.extend_from_slice(latlngs);
        self.redraw(surface);
    }

    /// Turns the stroke on or off.
    pub fn set_stroke<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S, stroke: bool) {
        self.options.stroke = stroke;
        self.apply_style(surface);
    }

    /// Moves the path above other surface content.
    pub fn bring_to_front<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        if let Some(node) = &self.node {
            if let Err(err) = surface.bring_to_front(node) {
                warn!(%err, layer = self.id.0, "could not bring path to front");
            }
        }
    }

    fn apply_style<S: Surface<Node = N> + ?Sized>(&self, surface: &mut S) {
        let Some(node) = &self.node else {
            return;
        };
        let stroke = if self.options.stroke {
            svg_color(self.options.color)
        } else {
            String::from("none")
        };
        let width = format!("{}", self.options.stroke_width);
        let result = surface
            .set_attribute(node, "stroke", &stroke)
            .and_then(|()| surface.set_attribute(node, "stroke-width", &width))
            .and_then(|()| surface.set_attribute(node, "fill", "none"));
        if let Err(err) = result {
            warn!(%err, layer = self.id.0, "could not style path");
        }
    }

    fn redraw<S: Surface<Node = N> + ?Sized>(&self, surface: &mut S) {
        let Some(node) = &self.node else {
            return;
        };
        let points: Vec<Point> = {
            let projection = surface.projection();
            self.latlngs
                .iter()
                .map(|ll| projection.to_local(*ll))
                .collect()
        };
        if let Err(err) = surface.set_path_points(node, &points) {
            warn!(%err, layer = self.id.0, "could not redraw path");
        }
    }
}

/// A polyline carrying a text label.
///
/// While added, the polyline's own stroke is hidden: the label is what shows.
#[derive(Debug)]
pub struct TextPolyline<N> {
    line: Polyline<N>,
    label: TextLayoutEngine<N>,
}

impl<N: Clone + PartialEq + Debug> TextPolyline<N> {
    /// Wraps `line` with an empty label.
    pub fn new(line: Polyline<N>) -> Self {
        Self {
            line,
            label: TextLayoutEngine::new(),
        }
    }

    /// The carrier path.
    pub fn polyline(&self) -> &Polyline<N> {
        &self.line
    }

    /// The label engine.
    pub fn label(&self) -> &TextLayoutEngine<N> {
        &self.label
    }

    /// Draws the path and lays out any stored label.
    pub fn on_add<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        self.line.on_add(surface);
        self.line.set_stroke(surface, false);
        self.label.on_attach(surface, &mut self.line);
    }

    /// Removes the label, then the path.
    pub fn on_remove<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        self.label.on_detach(surface);
        self.line.on_remove(surface);
    }

    /// Sets or clears the label. See [`TextLayoutEngine::set_text`].
    pub fn set_text<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        text: impl Into<LabelText>,
        options: TextOptions,
        theme: &ThemeContext,
    ) -> &mut Self {
        self.label
            .set_text(surface, &mut self.line, text, options, theme);
        self
    }

    /// Turns the label a quarter turn.
    pub fn rotate_right<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        self.label.rotate_right(surface, &mut self.line);
    }

    /// Moves the path to the front and rebuilds the label above it.
    pub fn bring_to_front<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        self.line.bring_to_front(surface);
        self.label.on_bring_to_front(surface, &mut self.line);
    }

    /// Rebuilds the label after the host reordered its elements.
    pub fn redraw<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        self.label.on_structural_redraw(surface, &mut self.line);
    }
}

impl<S: Surface> Layer<S> for Polyline<S::Node> {
    fn on_add(&mut self, surface: &mut S) {
        Self::on_add(self, surface);
    }

    fn on_remove(&mut self, surface: &mut S) {
        Self::on_remove(self, surface);
    }
}

impl<S: Surface> Layer<S> for TextPolyline<S::Node> {
    fn on_add(&mut self, surface: &mut S) {
        Self::on_add(self, surface);
    }

    fn on_remove(&mut self, surface: &mut S) {
        Self::on_remove(self, surface);
    }

    fn text_layout(&mut self) -> Option<&mut dyn TextLayoutCapable<S>> {
        Some(self)
    }
}

impl<S: Surface> TextLayoutCapable<S> for TextPolyline<S::Node> {
    fn set_text(
        &mut self,
        surface: &mut S,
        text: &LabelText,
        options: &TextOptions,
        theme: &ThemeContext,
    ) {
        Self::set_text(self, surface, text.clone(), options.clone(), theme);
    }
}
