//! Circular arcs and the bulge encoding used by chain vertices.
//!
//! Bulge convention: `bulge = tan(sweep / 4)`.
//! - `bulge = 0`: straight segment
//! - `bulge > 0`: counter-clockwise arc
//! - `bulge < 0`: clockwise arc
//! - `|bulge| = 1`: semicircle

use serde::{Deserialize, Serialize};

use super::core::{Point2, Tolerance, Vec2, normalize_angle};

/// Number of straight pieces used when an arc is flattened into chain vertices.
pub const DEFAULT_ARC_SUBDIVISIONS: usize = 4;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ArcError {
    #[error("arc radius must be finite and positive: {radius}")]
    InvalidRadius { radius: f64 },

    #[error("arc endpoints coincide")]
    CoincidentEndpoints,

    #[error("radius {radius} is smaller than half the chord length {half_chord}")]
    RadiusTooSmall { radius: f64, half_chord: f64 },
}

/// A circular arc in the chain plane.
///
/// Angles are radians in `[0, 2π)`. The arc starts at `start_angle` and sweeps
/// to `end_angle`, counter-clockwise when `ccw` is set and clockwise otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc2 {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub ccw: bool,
}

impl Arc2 {
    /// Counter-clockwise arc; angles are normalized into `[0, 2π)`.
    #[must_use]
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle: normalize_angle(start_angle),
            end_angle: normalize_angle(end_angle),
            ccw: true,
        }
    }

    /// Same as [`Arc2::new`] but sweeping clockwise from `start_angle` to `end_angle`.
    #[must_use]
    pub fn new_cw(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            ccw: false,
            ..Self::new(center, radius, start_angle, end_angle)
        }
    }

    /// Rebuild the arc spanned by a bulge-encoded segment from `start` to `end`.
    ///
    /// Returns `None` for a straight segment (zero bulge) or a zero-length chord.
    #[must_use]
    pub fn from_bulge(start: Point2, end: Point2, bulge: f64, tol: Tolerance) -> Option<Self> {
        if !bulge.is_finite() || tol.approx_zero_f64(bulge) {
            return None;
        }
        let chord = end.sub_point(start);
        let chord_len = chord.length();
        if !chord_len.is_finite() || tol.is_zero_length(chord_len) {
            return None;
        }

        let half_chord = chord_len * 0.5;
        let radius = half_chord * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
        // Signed distance from the chord midpoint to the center, positive on the left.
        let offset = half_chord * (1.0 - bulge * bulge) / (2.0 * bulge);
        let left = chord.perp().mul_scalar(1.0 / chord_len);
        let center = start.lerp(end, 0.5).add_vec(left.mul_scalar(offset));

        Some(Self {
            center,
            radius,
            start_angle: normalize_angle(start.sub_point(center).angle()),
            end_angle: normalize_angle(end.sub_point(center).angle()),
            ccw: bulge > 0.0,
        })
    }

    /// Minor counter-clockwise arc through `start` and `end` with the given radius.
    ///
    /// The center sits left of the chord at `sqrt(r² - (L/2)²)` from its midpoint.
    pub fn from_endpoints_radius(
        start: Point2,
        end: Point2,
        radius: f64,
        tol: Tolerance,
    ) -> Result<Self, ArcError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ArcError::InvalidRadius { radius });
        }
        let chord = end.sub_point(start);
        let chord_len = chord.length();
        if tol.is_zero_length(chord_len) {
            return Err(ArcError::CoincidentEndpoints);
        }
        let half_chord = chord_len * 0.5;
        if radius + tol.eps < half_chord {
            return Err(ArcError::RadiusTooSmall { radius, half_chord });
        }

        let height = (radius * radius - half_chord * half_chord).max(0.0).sqrt();
        let left = chord.perp().mul_scalar(1.0 / chord_len);
        let center = start.lerp(end, 0.5).add_vec(left.mul_scalar(height));

        Ok(Self::new(
            center,
            radius,
            start.sub_point(center).angle(),
            end.sub_point(center).angle(),
        ))
    }

    /// Signed sweep in radians: positive CCW, negative CW, magnitude in `[0, 2π)`.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        if self.ccw {
            normalize_angle(self.end_angle - self.start_angle)
        } else {
            -normalize_angle(self.start_angle - self.end_angle)
        }
    }

    #[must_use]
    pub fn bulge(&self) -> f64 {
        (self.sweep() * 0.25).tan()
    }

    #[must_use]
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        self.center.add_vec(Vec2::from_angle(angle).mul_scalar(self.radius))
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }
}

/// Bulge of a counter-clockwise arc running from `start_angle` to `end_angle`.
#[must_use]
pub fn arc_bulge(start_angle: f64, end_angle: f64) -> f64 {
    let sweep = normalize_angle(end_angle - start_angle);
    (sweep * 0.25).tan()
}

/// Sample `segments + 1` points evenly spaced in angle along the arc.
///
/// The first and last samples are the arc's exact endpoints.
#[must_use]
pub fn tessellate_arc(arc: &Arc2, segments: usize) -> Vec<Point2> {
    let segments = segments.max(1);
    let sweep = arc.sweep();
    let mut out = Vec::with_capacity(segments + 1);
    for i in 0..segments {
        let t = i as f64 / segments as f64;
        out.push(arc.point_at_angle(arc.start_angle + sweep * t));
    }
    out.push(arc.end_point());
    out
}
