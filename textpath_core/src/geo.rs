// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic coordinates and the surface's coordinate transform pair.

use kurbo::{Affine, Point};

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// An axis-aligned lat/lng rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Returns the bounds of `points`, or `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for p in points {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    /// Grows the bounds to include `p`.
    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// The bounding-box center.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            0.5 * (self.south_west.lat + self.north_east.lat),
            0.5 * (self.south_west.lng + self.north_east.lng),
        )
    }
}

/// Maps between geographic coordinates and the surface's local pixel space.
///
/// Implementations must be inverses of each other up to rounding.
pub trait Projection {
    /// Projects a geographic coordinate into local (pixel) space.
    fn to_local(&self, geo: LatLng) -> Point;
    /// Unprojects a local point back into geographic coordinates.
    fn to_geo(&self, point: Point) -> LatLng;
}

/// A fixed affine mapping from `(lng, lat)` to local pixels.
///
/// This is a stand-in for whatever projection the host map uses: at a fixed
/// zoom over a small area, a map projection is locally affine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineProjection {
    forward: Affine,
    inverse: Affine,
}

impl AffineProjection {
    /// Creates a projection from the `(lng, lat) -> pixel` transform.
    ///
    /// `forward` must be invertible.
    pub fn new(forward: Affine) -> Self {
        Self {
            forward,
            inverse: forward.inverse(),
        }
    }

    /// A projection where `origin` lands on the local origin, one degree spans
    /// `pixels_per_degree` pixels, and north points up (local y grows southwards).
    pub fn equirectangular(origin: LatLng, pixels_per_degree: f64) -> Self {
        Self::new(
            Affine::scale_non_uniform(pixels_per_degree, -pixels_per_degree)
                * Affine::translate((-origin.lng, -origin.lat)),
        )
    }

    /// The `(lng, lat) -> pixel` transform.
    pub fn forward(&self) -> Affine {
        self.forward
    }
}

impl Default for AffineProjection {
    fn default() -> Self {
        Self::new(Affine::IDENTITY)
    }
}

impl Projection for AffineProjection {
    fn to_local(&self, geo: LatLng) -> Point {
        self.forward * Point::new(geo.lng, geo.lat)
    }

    fn to_geo(&self, point: Point) -> LatLng {
        let p = self.inverse * point;
        LatLng::new(p.y, p.x)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn bounds_center_is_midpoint_of_extremes() {
        let pts = [
            LatLng::new(0.0, 0.0),
            LatLng::new(40.0, 2.0),
            LatLng::new(10.0, 18.0),
        ];
        let b = LatLngBounds::from_points(&pts).unwrap();
        assert_eq!(b.center(), LatLng::new(20.0, 9.0));
        assert!(LatLngBounds::from_points(&[] as &[LatLng]).is_none());
    }

    #[test]
    fn equirectangular_round_trips_and_flips_north_up() {
        let proj = AffineProjection::equirectangular(LatLng::new(48.0, 2.0), 100.0);
        let p = proj.to_local(LatLng::new(48.5, 2.25));
        assert!((p.x - 25.0).abs() < 1e-9);
        assert!((p.y + 50.0).abs() < 1e-9);
        let back = proj.to_geo(p);
        assert!((back.lat - 48.5).abs() < 1e-9);
        assert!((back.lng - 2.25).abs() < 1e-9);
    }
}
