// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering surface labels are drawn on.
//!
//! A [`Surface`] is a retained vector element tree (an SVG overlay pane in a
//! map, or [`crate::SvgSurface`] in headless use). Label layout only needs a
//! narrow slice of it:
//! - a container that element trees are inserted into and removed from,
//! - an element factory plus attribute/text/child mutation,
//! - rendered-extent queries (text length, bounding width),
//! - the coordinate transform pair, and
//! - event forwarding from label elements to their path.

use alloc::string::String;
use core::fmt;

use kurbo::Point;

use crate::geo::Projection;

/// The element kinds a label tree is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// The path a label rides on.
    Path,
    /// A `text` element.
    Text,
    /// A `textPath` element referencing a path by id.
    TextPath,
    /// A `tspan` run inside a text element.
    TSpan,
}

impl ElementKind {
    /// The SVG tag name.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Text => "text",
            Self::TextPath => "textPath",
            Self::TSpan => "tspan",
        }
    }
}

/// Where a new top-level element goes in the surface container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Before all existing content (painted underneath).
    First,
    /// After all existing content (painted on top).
    Last,
}

/// Pointer interactions forwarded from a label to its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelEvent {
    /// A click.
    Click,
    /// A double click.
    DoubleClick,
    /// A pointer button press.
    Press,
    /// The pointer entered the element.
    HoverEnter,
    /// The pointer moved over the element.
    HoverMove,
    /// The pointer left the element.
    HoverLeave,
    /// A context-menu request.
    ContextMenu,
}

impl LabelEvent {
    /// Every forwarded event, in registration order.
    pub const ALL: [Self; 7] = [
        Self::Click,
        Self::DoubleClick,
        Self::Press,
        Self::HoverEnter,
        Self::HoverMove,
        Self::HoverLeave,
        Self::ContextMenu,
    ];

    /// The DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::Press => "mousedown",
            Self::HoverEnter => "mouseover",
            Self::HoverMove => "mousemove",
            Self::HoverLeave => "mouseout",
            Self::ContextMenu => "contextmenu",
        }
    }
}

/// Errors returned by fallible [`Surface`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// The node handle does not refer to a live element.
    UnknownNode,
    /// The node is not in the surface container.
    NotConnected,
    /// The node is not a child of the given parent.
    NotAChild,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownNode => "node is not a live element",
            Self::NotConnected => "node is not in the surface container",
            Self::NotAChild => "node is not a child of the given parent",
        })
    }
}

impl core::error::Error for SurfaceError {}

/// A retained vector surface that label trees are built on.
///
/// Node handles are cheap clones (ids or reference-counted pointers). Removing
/// an element from the container or from its parent releases it and its
/// descendants; handles to released elements become invalid.
pub trait Surface {
    /// Handle to an element on this surface.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Whether this surface can render vector text (`text`/`textPath`).
    ///
    /// Label operations are no-ops on surfaces that cannot.
    fn supports_vector_text(&self) -> bool;

    /// The coordinate transform between geographic and local space.
    fn projection(&self) -> &dyn Projection;

    /// Creates a detached element.
    fn create_element(&mut self, kind: ElementKind) -> Self::Node;

    /// Sets an attribute. Setting `class` replaces the class list.
    fn set_attribute(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &str,
    ) -> Result<(), SurfaceError>;

    /// Reads an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Adds a class to the element's class list (no-op if present).
    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), SurfaceError>;

    /// Replaces the element's text content.
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<(), SurfaceError>;

    /// Appends `child` to `parent`, moving it if it already has a parent.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), SurfaceError>;

    /// Removes and releases `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), SurfaceError>;

    /// Inserts a top-level element into the container.
    fn insert(&mut self, node: &Self::Node, placement: Placement) -> Result<(), SurfaceError>;

    /// Removes and releases a top-level element from the container.
    fn remove(&mut self, node: &Self::Node) -> Result<(), SurfaceError>;

    /// Whether the element is live and reachable from the container.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Moves a top-level element to the end of the container.
    fn bring_to_front(&mut self, node: &Self::Node) -> Result<(), SurfaceError>;

    /// Replaces a path element's geometry with a polyline through `points`
    /// (local coordinates).
    fn set_path_points(&mut self, node: &Self::Node, points: &[Point])
    -> Result<(), SurfaceError>;

    /// The rendered length of the element's text along the text direction.
    ///
    /// Only meaningful for connected elements; returns `0.0` otherwise.
    fn computed_text_length(&self, node: &Self::Node) -> f64;

    /// The width of the element's rendered bounding box in local pixels.
    fn bbox_width(&self, node: &Self::Node) -> f64;

    /// Forwards `event` fired on `node` (or its descendants) to `target`.
    fn on(
        &mut self,
        node: &Self::Node,
        event: LabelEvent,
        target: &Self::Node,
    ) -> Result<(), SurfaceError>;
}
