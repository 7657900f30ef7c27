// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path endpoint placement for a given text length and orientation.

use kurbo::Vec2;

use crate::geo::{LatLng, Projection};

/// Cardinal orientation of a label, in degrees counter-clockwise from east.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Reads left to right.
    #[default]
    Deg0,
    /// Reads bottom to top.
    Deg90,
    /// Reads right to left (upside down).
    Deg180,
    /// Reads top to bottom.
    Deg270,
}

impl Alignment {
    /// The angle in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// The alignment for `degrees`, if it is one of `0`, `90`, `180`, `270`.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// The next alignment, 90° further.
    #[must_use]
    pub fn rotated_right(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Unit vector, in local space (y down), from the first endpoint to the second.
    fn direction(self) -> Vec2 {
        match self {
            Self::Deg0 => Vec2::new(1.0, 0.0),
            Self::Deg90 => Vec2::new(0.0, -1.0),
            Self::Deg180 => Vec2::new(-1.0, 0.0),
            Self::Deg270 => Vec2::new(0.0, 1.0),
        }
    }
}

/// Returns the two endpoints a path must span to carry `required_length`
/// pixels of text centered on `anchor`.
///
/// The offset is applied in local space so `required_length` is in pixels
/// regardless of the projection. A zero length collapses both endpoints onto
/// `anchor`.
pub fn compute_endpoints(
    projection: &dyn Projection,
    anchor: LatLng,
    required_length: f64,
    alignment: Alignment,
) -> [LatLng; 2] {
    let center = projection.to_local(anchor);
    let half = alignment.direction() * (0.5 * required_length.max(0.0));
    [
        projection.to_geo(center - half),
        projection.to_geo(center + half),
    ]
}
