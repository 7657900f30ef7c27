// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers and layer groups.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tracing::debug;

use crate::options::{TextOptions, ThemeContext};
use crate::surface::Surface;
use crate::text::LabelText;

/// Something that can be added to and removed from a surface.
pub trait Layer<S: Surface> {
    /// Adds the layer's elements to `surface`.
    fn on_add(&mut self, surface: &mut S);

    /// Removes the layer's elements from `surface`.
    fn on_remove(&mut self, surface: &mut S);

    /// The layer's label capability, if it carries labels.
    fn text_layout(&mut self) -> Option<&mut dyn TextLayoutCapable<S>> {
        None
    }
}

/// A layer that can carry a text label.
pub trait TextLayoutCapable<S: Surface> {
    /// Sets (or, with empty text, clears) the label.
    fn set_text(
        &mut self,
        surface: &mut S,
        text: &LabelText,
        options: &TextOptions,
        theme: &ThemeContext,
    );
}

/// An ordered collection of layers added and removed together.
pub struct LayerGroup<S: Surface> {
    layers: Vec<Box<dyn Layer<S>>>,
}

impl<S: Surface> fmt::Debug for LayerGroup<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerGroup")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl<S: Surface> Default for LayerGroup<S> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<S: Surface> LayerGroup<S> {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer. It is not added to any surface by this call.
    pub fn add_layer(&mut self, layer: impl Layer<S> + 'static) -> &mut Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the group has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sets the same label on every label-capable member.
    ///
    /// Members without the capability are skipped.
    pub fn set_text(
        &mut self,
        surface: &mut S,
        text: impl Into<LabelText>,
        options: TextOptions,
        theme: &ThemeContext,
    ) -> &mut Self {
        let text = text.into();
        let (updated, skipped) = self.broadcast(surface, &text, &options, theme);
        debug!(updated, skipped, "group label set");
        self
    }

    fn broadcast(
        &mut self,
        surface: &mut S,
        text: &LabelText,
        options: &TextOptions,
        theme: &ThemeContext,
    ) -> (usize, usize) {
        let mut updated = 0;
        let mut skipped = 0;
        for layer in &mut self.layers {
            match layer.text_layout() {
                Some(capable) => {
                    capable.set_text(surface, text, options, theme);
                    updated += 1;
                }
                None => skipped += 1,
            }
        }
        (updated, skipped)
    }
}

impl<S: Surface> Layer<S> for LayerGroup<S> {
    fn on_add(&mut self, surface: &mut S) {
        for layer in &mut self.layers {
            layer.on_add(surface);
        }
    }

    fn on_remove(&mut self, surface: &mut S) {
        for layer in &mut self.layers {
            layer.on_remove(surface);
        }
    }

    fn text_layout(&mut self) -> Option<&mut dyn TextLayoutCapable<S>> {
        Some(self)
    }
}

impl<S: Surface> TextLayoutCapable<S> for LayerGroup<S> {
    fn set_text(
        &mut self,
        surface: &mut S,
        text: &LabelText,
        options: &TextOptions,
        theme: &ThemeContext,
    ) {
        self.broadcast(surface, text, options, theme);
    }
}
