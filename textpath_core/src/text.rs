// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label text and its normalization into renderable lines.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Text attached to a path: nothing, one string, or explicit lines.
///
/// Strings may contain `\n`; every entry is split into lines. An empty value
/// means "no label".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LabelText {
    /// No label.
    #[default]
    Empty,
    /// A single string, split on line breaks.
    Text(String),
    /// An ordered list of lines.
    Lines(Vec<String>),
}

impl LabelText {
    /// Whether this clears the label.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Lines(lines) => lines.is_empty(),
        }
    }

    /// Returns the renderable lines.
    ///
    /// Ordinary spaces become non-breaking spaces so the surface cannot collapse
    /// them, and empty lines become a single space so no run is ever empty.
    /// An empty label yields no lines.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        match self {
            Self::Empty => {}
            Self::Text(text) => push_lines(&mut out, text),
            Self::Lines(lines) => {
                for line in lines {
                    push_lines(&mut out, line);
                }
            }
        }
        out
    }
}

fn push_lines(out: &mut Vec<String>, text: &str) {
    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if raw.is_empty() {
            out.push(" ".to_string());
        } else {
            out.push(raw.replace(' ', "\u{a0}"));
        }
    }
}

impl From<&str> for LabelText {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for LabelText {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for LabelText {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<&[&str]> for LabelText {
    fn from(lines: &[&str]) -> Self {
        Self::Lines(lines.iter().map(|l| (*l).to_string()).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for LabelText {
    fn from(text: Option<T>) -> Self {
        text.map_or(Self::Empty, Into::into)
    }
}
