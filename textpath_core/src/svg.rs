// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory retained SVG surface.
//!
//! [`SvgSurface`] keeps an element tree the way a browser's SVG overlay pane
//! would, measures text with a [`TextMeasurer`], and serializes the result.
//! It is what headless renderers, tests, and the demo draw labels on.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;
use textpath_text::{TextMeasurer, TextStyle};

use crate::geo::{AffineProjection, Projection};
use crate::surface::{ElementKind, LabelEvent, Placement, Surface, SurfaceError};

/// Handle to an element of an [`SvgSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
struct Element {
    kind: ElementKind,
    attributes: BTreeMap<String, String>,
    classes: SmallVec<[String; 2]>,
    text: String,
    points: Vec<Point>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            classes: SmallVec::new(),
            text: String::new(),
            points: Vec::new(),
            parent: None,
            children: SmallVec::new(),
        }
    }

    fn number(&self, name: &str) -> f64 {
        self.attributes
            .get(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

/// A retained SVG element tree implementing [`Surface`].
#[derive(Debug)]
pub struct SvgSurface<M> {
    measurer: M,
    projection: AffineProjection,
    vector_text: bool,
    elements: HashMap<NodeId, Element>,
    root: Vec<NodeId>,
    listeners: HashMap<NodeId, SmallVec<[(LabelEvent, NodeId); 8]>>,
    next_id: u32,
}

impl<M: TextMeasurer> SvgSurface<M> {
    /// Creates an empty surface.
    pub fn new(measurer: M, projection: AffineProjection) -> Self {
        Self {
            measurer,
            projection,
            vector_text: true,
            elements: HashMap::new(),
            root: Vec::new(),
            listeners: HashMap::new(),
            next_id: 0,
        }
    }

    /// Sets whether the surface reports vector-text support.
    pub fn with_vector_text(mut self, vector_text: bool) -> Self {
        self.vector_text = vector_text;
        self
    }

    /// The text measurer.
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Number of live elements, attached or not.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Top-level elements in paint order.
    pub fn root(&self) -> &[NodeId] {
        &self.root
    }

    /// The element's kind, if live.
    pub fn kind(&self, node: NodeId) -> Option<ElementKind> {
        self.elements.get(&node).map(|e| e.kind)
    }

    /// The element's children, in order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.elements.get(&node).map_or(&[][..], |e| e.children.as_slice())
    }

    /// The element's own text content.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.elements.get(&node).map(|e| e.text.as_str())
    }

    /// The element's class list.
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.elements.get(&node).map_or(&[][..], |e| e.classes.as_slice())
    }

    /// A path element's points, in local coordinates.
    pub fn path_points(&self, node: NodeId) -> &[Point] {
        self.elements.get(&node).map_or(&[][..], |e| e.points.as_slice())
    }

    /// Resolves `event` fired on `node`: returns every forwarding target
    /// registered on the node or its ancestors, innermost first.
    pub fn dispatch(&self, node: NodeId, event: LabelEvent) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            if let Some(listeners) = self.listeners.get(&id) {
                out.extend(
                    listeners
                        .iter()
                        .filter(|(e, _)| *e == event)
                        .map(|(_, target)| *target),
                );
            }
            cur = self.elements.get(&id).and_then(|e| e.parent);
        }
        out
    }

    fn element(&self, node: NodeId) -> Result<&Element, SurfaceError> {
        self.elements.get(&node).ok_or(SurfaceError::UnknownNode)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, SurfaceError> {
        self.elements
            .get_mut(&node)
            .ok_or(SurfaceError::UnknownNode)
    }

    /// Unlinks `node` from its parent or from the container.
    fn detach(&mut self, node: NodeId) {
        let parent = self.elements.get_mut(&node).and_then(|e| e.parent.take());
        match parent {
            Some(parent) => {
                if let Some(p) = self.elements.get_mut(&parent) {
                    p.children.retain(|c| *c != node);
                }
            }
            None => self.root.retain(|r| *r != node),
        }
    }

    /// Drops `node` and its descendants.
    fn release(&mut self, node: NodeId) {
        self.listeners.remove(&node);
        if let Some(element) = self.elements.remove(&node) {
            for child in element.children {
                self.release(child);
            }
        }
    }

    /// Text style of `node`, with attributes inherited from its ancestors.
    fn style_for(&self, node: NodeId) -> TextStyle {
        let mut chain: SmallVec<[&Element; 4]> = SmallVec::new();
        let mut cur = self.elements.get(&node);
        while let Some(e) = cur {
            chain.push(e);
            cur = e.parent.and_then(|p| self.elements.get(&p));
        }
        let mut style = TextStyle::default();
        for e in chain.iter().rev() {
            for (name, value) in &e.attributes {
                style.apply_attribute(name, value);
            }
        }
        style
    }

    fn run_length(&self, node: NodeId, text: &str) -> f64 {
        self.measurer
            .measure(text, &self.style_for(node))
            .advance_width
    }

    /// Lays out the runs under `node` along a straight baseline, tracking the
    /// horizontal extent covered.
    fn lay_out_runs(&self, node: NodeId, cursor: &mut f64, extent: &mut Option<(f64, f64)>) {
        let Some(e) = self.elements.get(&node) else {
            return;
        };
        *cursor += e.number("dx");
        if !e.text.is_empty() {
            let start = *cursor;
            let end = start + self.run_length(node, &e.text);
            *extent = Some(match *extent {
                None => (start.min(end), start.max(end)),
                Some((lo, hi)) => (lo.min(start).min(end), hi.max(start).max(end)),
            });
            *cursor = end;
        }
        for child in &e.children {
            self.lay_out_runs(*child, cursor, extent);
        }
    }

    fn sum_run_lengths(&self, node: NodeId) -> f64 {
        let Some(e) = self.elements.get(&node) else {
            return 0.0;
        };
        let own = if e.text.is_empty() {
            0.0
        } else {
            self.run_length(node, &e.text)
        };
        own + e
            .children
            .iter()
            .map(|c| self.sum_run_lengths(*c))
            .sum::<f64>()
    }

    fn points_bounds(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        for e in self.elements.values() {
            for p in &e.points {
                rect = Some(match rect {
                    None => Rect::from_points(*p, *p),
                    Some(r) => r.union_pt(*p),
                });
            }
        }
        rect
    }

    /// Serializes the container as an SVG document.
    pub fn to_svg_string(&self) -> String {
        let view_box = self
            .points_bounds()
            .map(|r| r.inflate(40.0, 40.0))
            .unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');
        for id in &self.root {
            self.write_element(&mut out, *id);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_element(&self, out: &mut String, node: NodeId) {
        let Some(e) = self.elements.get(&node) else {
            return;
        };
        let tag = e.kind.tag();
        out.push('<');
        out.push_str(tag);
        if e.kind == ElementKind::Path {
            let mut d = String::new();
            for (i, p) in e.points.iter().enumerate() {
                d.push_str(&format!("{}{} {}", if i == 0 { "M" } else { " L" }, p.x, p.y));
            }
            out.push_str(&format!(r#" d="{d}""#));
        }
        if !e.classes.is_empty() {
            out.push_str(&format!(r#" class="{}""#, escape_xml(&e.classes.join(" "))));
        }
        for (name, value) in &e.attributes {
            out.push_str(&format!(r#" {name}="{}""#, escape_xml(value)));
        }
        if e.text.is_empty() && e.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&escape_xml(&e.text));
        for child in &e.children {
            self.write_element(out, *child);
        }
        out.push_str(&format!("</{tag}>"));
    }
}

impl<M: TextMeasurer> Surface for SvgSurface<M> {
    type Node = NodeId;

    fn supports_vector_text(&self) -> bool {
        self.vector_text
    }

    fn projection(&self) -> &dyn Projection {
        &self.projection
    }

    fn create_element(&mut self, kind: ElementKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::new(kind));
        id
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), SurfaceError> {
        let e = self.element_mut(*node)?;
        if name == "class" {
            e.classes = value.split_whitespace().map(ToString::to_string).collect();
        } else {
            e.attributes.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let e = self.elements.get(node)?;
        if name == "class" {
            return (!e.classes.is_empty()).then(|| e.classes.join(" "));
        }
        e.attributes.get(name).cloned()
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), SurfaceError> {
        let e = self.element_mut(*node)?;
        if !e.classes.iter().any(|c| c == class) {
            e.classes.push(class.to_string());
        }
        Ok(())
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), SurfaceError> {
        let children = {
            let e = self.element_mut(*node)?;
            e.text = text.to_string();
            core::mem::take(&mut e.children)
        };
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SurfaceError> {
        self.element(*parent)?;
        self.element(*child)?;
        if parent == child {
            return Err(SurfaceError::NotAChild);
        }
        self.detach(*child);
        self.element_mut(*child)?.parent = Some(*parent);
        self.element_mut(*parent)?.children.push(*child);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SurfaceError> {
        if self.element(*child)?.parent != Some(*parent) {
            return Err(SurfaceError::NotAChild);
        }
        self.detach(*child);
        self.release(*child);
        Ok(())
    }

    fn insert(&mut self, node: &NodeId, placement: Placement) -> Result<(), SurfaceError> {
        self.element(*node)?;
        self.detach(*node);
        match placement {
            Placement::First => self.root.insert(0, *node),
            Placement::Last => self.root.push(*node),
        }
        Ok(())
    }

    fn remove(&mut self, node: &NodeId) -> Result<(), SurfaceError> {
        if self.element(*node)?.parent.is_some() {
            return Err(SurfaceError::NotAChild);
        }
        self.detach(*node);
        self.release(*node);
        Ok(())
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut cur = *node;
        loop {
            match self.elements.get(&cur) {
                None => return false,
                Some(e) => match e.parent {
                    Some(parent) => cur = parent,
                    None => return self.root.contains(&cur),
                },
            }
        }
    }

    fn bring_to_front(&mut self, node: &NodeId) -> Result<(), SurfaceError> {
        let pos = self
            .root
            .iter()
            .position(|r| r == node)
            .ok_or(SurfaceError::NotConnected)?;
        let id = self.root.remove(pos);
        self.root.push(id);
        Ok(())
    }

    fn set_path_points(&mut self, node: &NodeId, points: &[Point]) -> Result<(), SurfaceError> {
        self.element_mut(*node)?.points = points.to_vec();
        Ok(())
    }

    fn computed_text_length(&self, node: &NodeId) -> f64 {
        if !self.is_connected(node) {
            return 0.0;
        }
        self.sum_run_lengths(*node)
    }

    fn bbox_width(&self, node: &NodeId) -> f64 {
        if !self.is_connected(node) {
            return 0.0;
        }
        let Some(e) = self.elements.get(node) else {
            return 0.0;
        };
        if e.kind == ElementKind::Path {
            let mut xs = e.points.iter().map(|p| p.x);
            let Some(first) = xs.next() else {
                return 0.0;
            };
            let (lo, hi) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
            return hi - lo;
        }
        let mut cursor = 0.0;
        let mut extent = None;
        self.lay_out_runs(*node, &mut cursor, &mut extent);
        extent.map_or(0.0, |(lo, hi)| hi - lo)
    }

    fn on(&mut self, node: &NodeId, event: LabelEvent, target: &NodeId) -> Result<(), SurfaceError> {
        self.element(*node)?;
        self.element(*target)?;
        let listeners = self.listeners.entry(*node).or_default();
        if !listeners.contains(&(event, *target)) {
            listeners.push((event, *target));
        }
        Ok(())
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
