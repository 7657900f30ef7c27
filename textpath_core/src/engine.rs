// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-path label layout engine.
//!
//! A [`TextLayoutEngine`] owns the label state of one path: the requested
//! text and options, the current [`Alignment`], the last computed anchor and
//! endpoints, and handles to the label's element tree on the surface. It is
//! driven by three kinds of calls:
//! - [`TextLayoutEngine::set_text`] from callers,
//! - [`TextLayoutEngine::rotate_right`] from callers, and
//! - lifecycle hooks from the path (attach, detach, bring-to-front, redraw).
//!
//! A layout pass measures every line, stretches the path so it spans the
//! longest one, and then either builds the element tree or reconciles the
//! existing one in place.
//!
//! ```text
//! text
//! └── textPath href=#pathdef-<id>
//!     ├── tspan dx=0      dy=0
//!     ├── tspan dx=-len0  dy=20
//!     └── ...
//! ```

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Debug;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::align::{Alignment, compute_endpoints};
use crate::geo::LatLng;
use crate::measure::measure_lines;
use crate::options::{CLICKABLE_CLASS, LABEL_CLASS, StyleOptions, TextOptions, ThemeContext};
use crate::polyline::Polyline;
use crate::stack::{LineOffset, offsets_from_lengths};
use crate::surface::{ElementKind, LabelEvent, Placement, Surface, SurfaceError};
use crate::text::LabelText;

/// One rendered line of a label.
#[derive(Clone, Debug, PartialEq)]
pub struct LineNode<N> {
    node: N,
    text: String,
    offset: LineOffset,
}

impl<N> LineNode<N> {
    /// The line's `tspan` element.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// The line's normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The line's offsets.
    pub fn offset(&self) -> LineOffset {
        self.offset
    }
}

/// Handles to a built label.
#[derive(Debug)]
struct LabelTree<N> {
    text: N,
    text_path: N,
    lines: SmallVec<[LineNode<N>; 4]>,
    shift: Option<f64>,
}

/// Formats a length attribute, never producing `-0`.
fn fmt_len(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}

fn fill_line<S: Surface + ?Sized>(
    surface: &mut S,
    node: &S::Node,
    text: &str,
    offset: LineOffset,
) -> Result<(), SurfaceError> {
    surface.set_attribute(node, "dy", &fmt_len(offset.dy))?;
    surface.set_attribute(node, "dx", &fmt_len(offset.dx))?;
    surface.set_text_content(node, text)
}

impl<N: Clone + PartialEq + Debug> LabelTree<N> {
    fn build<S: Surface<Node = N> + ?Sized>(
        surface: &mut S,
        path_node: &N,
        href: &str,
        lines: &[String],
        offsets: &[LineOffset],
        style: &StyleOptions,
    ) -> Result<Self, SurfaceError> {
        let mut tree = Self {
            text: surface.create_element(ElementKind::Text),
            text_path: surface.create_element(ElementKind::TextPath),
            lines: SmallVec::new(),
            shift: None,
        };
        if let Err(err) = surface.append_child(&tree.text, &tree.text_path) {
            let _ = surface.remove(&tree.text_path);
            let _ = surface.remove(&tree.text);
            return Err(err);
        }
        match tree.populate(surface, path_node, href, lines, offsets, style) {
            Ok(()) => Ok(tree),
            Err(err) => {
                let _ = surface.remove(&tree.text);
                Err(err)
            }
        }
    }

    fn populate<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path_node: &N,
        href: &str,
        lines: &[String],
        offsets: &[LineOffset],
        style: &StyleOptions,
    ) -> Result<(), SurfaceError> {
        let dy = match style.offset {
            Some(offset) => Some(fmt_len(offset)),
            None => surface.attribute(path_node, "stroke-width"),
        };
        if let Some(dy) = dy {
            surface.set_attribute(&self.text, "dy", &dy)?;
        }
        for (name, value) in &style.attributes {
            surface.set_attribute(&self.text, name, value)?;
        }
        surface.set_attribute(&self.text_path, "href", href)?;
        surface.add_class(&self.text_path, LABEL_CLASS)?;
        for (line, offset) in lines.iter().zip(offsets) {
            self.append_line(surface, line, *offset)?;
        }

        let placement = if style.below {
            Placement::First
        } else {
            Placement::Last
        };
        surface.insert(&self.text, placement)?;

        // Extents are only known once the tree is in the container.
        if style.center {
            let text_width = surface.bbox_width(&self.text);
            let path_width = surface.bbox_width(path_node);
            let shift = 0.5 * (path_width - text_width);
            surface.set_attribute(&self.text, "dx", &fmt_len(shift))?;
            self.shift = Some(shift);
        }

        if style.clickable {
            surface.add_class(&self.text_path, CLICKABLE_CLASS)?;
            for event in LabelEvent::ALL {
                surface.on(&self.text, event, path_node)?;
            }
        }
        Ok(())
    }

    fn append_line<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        text: &str,
        offset: LineOffset,
    ) -> Result<(), SurfaceError> {
        let node = surface.create_element(ElementKind::TSpan);
        if let Err(err) = fill_line(surface, &node, text, offset)
            .and_then(|()| surface.append_child(&self.text_path, &node))
        {
            let _ = surface.remove(&node);
            return Err(err);
        }
        self.lines.push(LineNode {
            node,
            text: text.to_string(),
            offset,
        });
        Ok(())
    }

    /// Updates shared lines in place, appends new ones, and drops surplus
    /// trailing ones.
    fn reconcile<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        lines: &[String],
        offsets: &[LineOffset],
    ) -> Result<(), SurfaceError> {
        for (i, (text, offset)) in lines.iter().zip(offsets).enumerate() {
            match self.lines.get_mut(i) {
                Some(existing) => {
                    if existing.text != *text {
                        surface.set_text_content(&existing.node, text)?;
                        existing.text.clone_from(text);
                    }
                    surface.set_attribute(&existing.node, "dx", &fmt_len(offset.dx))?;
                    existing.offset = *offset;
                }
                None => self.append_line(surface, text, *offset)?,
            }
        }
        // Assumes the host has not reordered our tspans.
        while self.lines.len() > lines.len() {
            let Some(surplus) = self.lines.pop() else {
                break;
            };
            surface.remove_child(&self.text_path, &surplus.node)?;
        }
        Ok(())
    }
}

/// Lays a label along one path and keeps it in sync with the surface.
///
/// The engine does not own the path: every operation borrows the path's
/// [`Polyline`] alongside the surface. Operations never fail; unmet
/// preconditions (not attached, no vector text support, empty text) make
/// them no-ops and surface errors are logged.
#[derive(Debug)]
pub struct TextLayoutEngine<N> {
    text: LabelText,
    options: TextOptions,
    theme: ThemeContext,
    alignment: Alignment,
    attached: bool,
    anchor: Option<LatLng>,
    endpoints: Option<[LatLng; 2]>,
    tree: Option<LabelTree<N>>,
}

impl<N> Default for TextLayoutEngine<N> {
    fn default() -> Self {
        Self {
            text: LabelText::Empty,
            options: TextOptions::default(),
            theme: ThemeContext::default(),
            alignment: Alignment::Deg0,
            attached: false,
            anchor: None,
            endpoints: None,
            tree: None,
        }
    }
}

impl<N: Clone + PartialEq + Debug> TextLayoutEngine<N> {
    /// Creates a detached engine with no text.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored text request.
    pub fn text(&self) -> &LabelText {
        &self.text
    }

    /// The stored option overrides.
    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    /// The current alignment.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// The anchor used by the last layout pass.
    pub fn anchor(&self) -> Option<LatLng> {
        self.anchor
    }

    /// The endpoints applied to the path by the last layout pass.
    pub fn endpoints(&self) -> Option<[LatLng; 2]> {
        self.endpoints
    }

    /// Whether the engine is attached to a surface.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a label tree currently exists.
    pub fn is_built(&self) -> bool {
        self.tree.is_some()
    }

    /// The label's `text` element, if built.
    pub fn text_node(&self) -> Option<&N> {
        self.tree.as_ref().map(|t| &t.text)
    }

    /// The rendered lines, index-aligned with the current text's lines.
    pub fn line_nodes(&self) -> &[LineNode<N>] {
        self.tree.as_ref().map_or(&[][..], |t| t.lines.as_slice())
    }

    /// The horizontal centering shift applied when the tree was built.
    pub fn center_shift(&self) -> Option<f64> {
        self.tree.as_ref().and_then(|t| t.shift)
    }

    /// Sets (or, with empty text, clears) the label.
    ///
    /// The request is stored even when it cannot be applied yet, and is
    /// replayed when the engine is attached.
    pub fn set_text<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &mut Polyline<N>,
        text: impl Into<LabelText>,
        options: TextOptions,
        theme: &ThemeContext,
    ) -> &mut Self {
        self.text = text.into();
        self.options = options;
        self.theme = theme.clone();
        self.layout(surface, path);
        self
    }

    /// Turns the label a quarter turn and re-stretches the path.
    ///
    /// Text content and line nodes are unchanged. No-op unless a label is built.
    pub fn rotate_right<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &mut Polyline<N>,
    ) {
        if self.tree.is_none() || !self.attached || !surface.supports_vector_text() {
            trace!("rotate ignored: no label");
            return;
        }
        self.alignment = self.alignment.rotated_right();
        let lines = self.text.lines();
        let style = StyleOptions::resolve(&self.options, &self.theme);
        let lengths = measure_lines(surface, &lines, &style.attributes);
        self.fit_path(surface, path, max_length(&lengths));
        debug!(
            layer = path.id().0,
            alignment = self.alignment.degrees(),
            "label rotated"
        );
    }

    /// The path was added to `surface`: replay the stored request.
    ///
    /// Alignment restarts at 0°.
    pub fn on_attach<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &mut Polyline<N>,
    ) {
        self.attached = true;
        self.alignment = Alignment::Deg0;
        self.text_redraw(surface, path);
    }

    /// The path is leaving `surface`: drop the label tree. Idempotent.
    pub fn on_detach<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        self.remove_tree(surface);
        self.attached = false;
    }

    /// The path was moved to the front; rebuild so the label paints above it.
    pub fn on_bring_to_front<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &mut Polyline<N>,
    ) {
        self.text_redraw(surface, path);
    }

    /// The host rebuilt its element ordering; rebuild the label from scratch.
    pub fn on_structural_redraw<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &mut Polyline<N>,
    ) {
        self.text_redraw(surface, path);
    }

    fn text_redraw<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S, path: &mut Polyline<N>) {
        if self.text.is_empty() {
            return;
        }
        self.remove_tree(surface);
        self.layout(surface, path);
    }

    fn layout<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S, path: &mut Polyline<N>) {
        if !self.attached {
            debug!(layer = path.id().0, "label deferred until attach");
            return;
        }
        if !surface.supports_vector_text() {
            trace!("surface has no vector text support");
            return;
        }
        let lines = self.text.lines();
        if lines.is_empty() {
            self.remove_tree(surface);
            return;
        }
        let Some(path_node) = path.node().cloned() else {
            debug!(layer = path.id().0, "path has no element; label skipped");
            return;
        };

        let style = StyleOptions::resolve(&self.options, &self.theme);
        let element_id = path.element_id();
        if let Err(err) = surface.set_attribute(&path_node, "id", &element_id) {
            warn!(%err, "could not tag path element");
        }

        let lengths = measure_lines(surface, &lines, &style.attributes);
        self.fit_path(surface, path, max_length(&lengths));
        let offsets = offsets_from_lengths(&lengths);

        if let Some(tree) = self.tree.as_mut() {
            match tree.reconcile(surface, &lines, &offsets) {
                Ok(()) => {
                    debug!(layer = path.id().0, lines = lines.len(), "label reconciled");
                    return;
                }
                Err(err) => {
                    warn!(%err, "label reconcile failed; rebuilding");
                    self.remove_tree(surface);
                }
            }
        }

        let href = format!("#{element_id}");
        match LabelTree::build(surface, &path_node, &href, &lines, &offsets, &style) {
            Ok(tree) => {
                debug!(layer = path.id().0, lines = lines.len(), "label built");
                self.tree = Some(tree);
            }
            Err(err) => warn!(%err, "label build failed"),
        }
    }

    /// Stretches `path` to span `required_length` around its current center.
    fn fit_path<S: Surface<Node = N> + ?Sized>(
        &mut self,
        surface: &mut S,
        path: &mut Polyline<N>,
        required_length: f64,
    ) {
        let Some(anchor) = path.bounds().map(|b| b.center()) else {
            debug!(layer = path.id().0, "path has no points; not stretched");
            return;
        };
        let endpoints =
            compute_endpoints(surface.projection(), anchor, required_length, self.alignment);
        path.set_lat_lngs(surface, &endpoints);
        self.anchor = Some(anchor);
        self.endpoints = Some(endpoints);
    }

    fn remove_tree<S: Surface<Node = N> + ?Sized>(&mut self, surface: &mut S) {
        let Some(tree) = self.tree.take() else {
            return;
        };
        if surface.is_connected(&tree.text) {
            if let Err(err) = surface.remove(&tree.text) {
                warn!(%err, "could not remove label");
            }
        }
        debug!(lines = tree.lines.len(), "label removed");
    }
}

fn max_length(lengths: &[f64]) -> f64 {
    lengths.iter().copied().fold(0.0, f64::max)
}
