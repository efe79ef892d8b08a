//! Corner fillets on bulge-encoded chains.
//!
//! A fillet at vertex `i` replaces the sharp corner between the segment ending
//! at `i` ("prev") and the segment starting at `i` ("next") with a connecting
//! arc. The arc is stored the usual way: a new vertex at the prev-side tangent
//! point carries the arc's bulge, and the corner vertex itself moves to the
//! next-side tangent point.
//!
//! # Corner cases handled
//! - **Line–Line**: classic cutback `r · tan((π − θ) / 2)` along both lines.
//! - **Arc–Line / Line–Arc**: the arc-side point is projected from the corner
//!   toward the arc center; the line-side point is measured back from the
//!   line's far endpoint. Line–Arc reuses the Arc–Line path with roles swapped.
//! - **Arc–Arc**: both points are projected toward their own arc centers.
//!
//! Every rejection happens before the chain is touched, so a failed call never
//! leaves a partially edited chain behind.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::arc::Arc2;
use super::chain::{Chain, Vertex};
use super::core::{Point2, Tolerance, orientation};
use super::segment::{Segment, SegmentKind};

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum FilletError {
    #[error("fillet radius must be finite and positive: {radius}")]
    InvalidRadius { radius: f64 },

    #[error("vertex {index} is not a fillet corner (vertex count {count}, closed {closed})")]
    InvalidVertex {
        index: usize,
        count: usize,
        closed: bool,
    },

    /// Reserved for segment types the engine has no fillet construction for.
    #[error("cannot fillet between {prev:?} and {next:?} segments")]
    UnsupportedSegmentPair { prev: SegmentKind, next: SegmentKind },

    #[error("radius {radius} does not fit at vertex {index}: {reason}")]
    InfeasibleFillet {
        index: usize,
        radius: f64,
        reason: Infeasibility,
    },

    #[error("degenerate geometry at vertex {index}: {detail}")]
    DegenerateGeometry { index: usize, detail: &'static str },
}

/// Why a requested radius cannot be placed at a corner.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum Infeasibility {
    #[error("cutback distance is zero")]
    ZeroCutback,

    #[error("cutback {cutback} exceeds segment length {available}")]
    CutbackTooLong { cutback: f64, available: f64 },

    #[error("arc lies {reach} from the corner, beyond the fillet radius")]
    ArcOutOfReach { reach: f64 },

    #[error("fillet geometry is not finite")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilletKind {
    LineLine,
    ArcLine,
    LineArc,
    ArcArc,
}

/// What a successful fillet did to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilletReport {
    pub kind: FilletKind,
    /// The corner that was rounded, as indexed before the call.
    pub vertex_index: usize,
    /// Position of the new arc vertex. Every original index `>=` this value
    /// moved up by one.
    pub inserted_index: usize,
    /// Tangent point on the segment ending at the corner.
    pub prev_tangent: Point2,
    /// Tangent point on the segment starting at the corner.
    pub next_tangent: Point2,
    /// Bulge of the connecting arc, positive for a CCW sweep.
    pub bulge: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilletOutcome {
    pub chain: Chain,
    pub report: FilletReport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilletChainDiagnostics {
    pub input_vertex_count: usize,
    pub output_vertex_count: usize,
    pub corner_count: usize,
    pub filleted_corner_count: usize,
    pub skipped_corner_count: usize,
    pub warnings: Vec<String>,
}

/// Fillet one corner with [`Tolerance::default_geom`].
pub fn apply_fillet(
    chain: &Chain,
    vertex_index: usize,
    radius: f64,
) -> Result<FilletOutcome, FilletError> {
    apply_fillet_with_tolerance(chain, vertex_index, radius, Tolerance::default_geom())
}

/// Fillet one corner, returning a new chain and leaving `chain` untouched.
pub fn apply_fillet_with_tolerance(
    chain: &Chain,
    vertex_index: usize,
    radius: f64,
    tol: Tolerance,
) -> Result<FilletOutcome, FilletError> {
    let report = plan_fillet(chain, vertex_index, radius, tol)?;
    let mut filleted = chain.clone();
    commit(&mut filleted, &report);
    Ok(FilletOutcome {
        chain: filleted,
        report,
    })
}

impl Chain {
    /// In-place form of [`apply_fillet_with_tolerance`]; the chain only changes on success.
    pub fn fillet_vertex(
        &mut self,
        vertex_index: usize,
        radius: f64,
        tol: Tolerance,
    ) -> Result<FilletReport, FilletError> {
        let report = plan_fillet(self, vertex_index, radius, tol)?;
        commit(self, &report);
        Ok(report)
    }
}

/// Fillet every corner of the chain with the same radius.
///
/// Corners that cannot take the radius are skipped and reported in the
/// diagnostics; only an invalid radius fails the whole call. Corners are
/// visited in order, so each fillet sees the segments already shortened by the
/// previous one.
pub fn fillet_chain(
    chain: &Chain,
    radius: f64,
    tol: Tolerance,
) -> Result<(Chain, FilletChainDiagnostics), FilletError> {
    validate_radius(radius)?;

    let mut diagnostics = FilletChainDiagnostics {
        input_vertex_count: chain.len(),
        ..Default::default()
    };

    let n = chain.len();
    let corners = if chain.is_closed() {
        0..n
    } else {
        1..n.saturating_sub(1)
    };

    let mut out = chain.clone();
    let mut shift = 0usize;
    for original in corners {
        diagnostics.corner_count += 1;
        match out.fillet_vertex(original + shift, radius, tol) {
            Ok(_) => {
                diagnostics.filleted_corner_count += 1;
                shift += 1;
            }
            Err(err) => {
                log::debug!("fillet_chain: skipping vertex {original}: {err}");
                diagnostics.skipped_corner_count += 1;
                diagnostics.warnings.push(format!("vertex {original}: {err}"));
            }
        }
    }

    diagnostics.output_vertex_count = out.len();
    Ok((out, diagnostics))
}

fn validate_radius(radius: f64) -> Result<(), FilletError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(FilletError::InvalidRadius { radius })
    }
}

fn commit(chain: &mut Chain, report: &FilletReport) {
    chain.insert_vertex(
        report.inserted_index,
        Vertex::new(report.prev_tangent, report.bulge),
    );
    chain.set_point(report.inserted_index + 1, report.next_tangent);
}

/// The three vertices around the corner plus the request.
struct Corner {
    index: usize,
    prev_start: Point2,
    vertex: Point2,
    next_end: Point2,
    radius: f64,
    tol: Tolerance,
}

impl Corner {
    fn infeasible(&self, reason: Infeasibility) -> FilletError {
        FilletError::InfeasibleFillet {
            index: self.index,
            radius: self.radius,
            reason,
        }
    }

    fn degenerate(&self, detail: &'static str) -> FilletError {
        FilletError::DegenerateGeometry {
            index: self.index,
            detail,
        }
    }
}

/// Tangent points on the prev and next segments plus the unsigned bulge.
type Tangents = (Point2, Point2, f64);

fn plan_fillet(
    chain: &Chain,
    index: usize,
    radius: f64,
    tol: Tolerance,
) -> Result<FilletReport, FilletError> {
    validate_radius(radius)?;

    let invalid = || FilletError::InvalidVertex {
        index,
        count: chain.len(),
        closed: chain.is_closed(),
    };
    let prev_index = chain.prev_index(index).ok_or_else(invalid)?;
    let next_index = chain.next_index(index).ok_or_else(invalid)?;

    let prev_kind = chain.segment_kind_at(prev_index, tol).ok_or_else(invalid)?;
    let next_kind = chain.segment_kind_at(index, tol).ok_or_else(invalid)?;
    let degenerate = |detail: &'static str| FilletError::DegenerateGeometry { index, detail };
    if prev_kind == SegmentKind::Coincident || next_kind == SegmentKind::Coincident {
        return Err(degenerate("zero-length segment"));
    }
    let (Some(prev), Some(next)) = (chain.segment_at(prev_index, tol), chain.segment_at(index, tol))
    else {
        return Err(degenerate("arc segment cannot be rebuilt from its bulge"));
    };

    let vertices = chain.vertices();
    let corner = Corner {
        index,
        prev_start: vertices[prev_index].point,
        vertex: vertices[index].point,
        next_end: vertices[next_index].point,
        radius,
        tol,
    };

    let (kind, (prev_tangent, next_tangent, magnitude)) = match (prev, next) {
        (Segment::Line { .. }, Segment::Line { .. }) => (FilletKind::LineLine, line_line(&corner)?),
        (Segment::Arc(arc), Segment::Line { .. }) => (
            FilletKind::ArcLine,
            arc_line(&corner, &arc, corner.next_end)?,
        ),
        (Segment::Line { .. }, Segment::Arc(arc)) => {
            let (on_arc, on_line, magnitude) = arc_line(&corner, &arc, corner.prev_start)?;
            (FilletKind::LineArc, (on_line, on_arc, magnitude))
        }
        (Segment::Arc(arc1), Segment::Arc(arc2)) => {
            (FilletKind::ArcArc, arc_arc(&corner, &arc1, &arc2)?)
        }
    };

    if !prev_tangent.x.is_finite()
        || !prev_tangent.y.is_finite()
        || !next_tangent.x.is_finite()
        || !next_tangent.y.is_finite()
        || !magnitude.is_finite()
    {
        return Err(corner.infeasible(Infeasibility::NonFinite));
    }

    let bulge = if is_clockwise(corner.prev_start, corner.vertex, corner.next_end) {
        -magnitude
    } else {
        magnitude
    };

    log::debug!(
        "fillet vertex {index}: {kind:?} r={radius} tangents ({}, {}) -> ({}, {}) bulge {bulge}",
        prev_tangent.x,
        prev_tangent.y,
        next_tangent.x,
        next_tangent.y,
    );

    Ok(FilletReport {
        kind,
        vertex_index: index,
        inserted_index: index,
        prev_tangent,
        next_tangent,
        bulge,
    })
}

/// Strictly clockwise turn; collinear corners count as CCW.
fn is_clockwise(a: Point2, b: Point2, c: Point2) -> bool {
    orientation(a, b, c) < 0.0
}

fn line_line(corner: &Corner) -> Result<Tangents, FilletError> {
    let vec1 = corner.prev_start.sub_point(corner.vertex);
    let vec2 = corner.next_end.sub_point(corner.vertex);
    let len1 = vec1.length();
    let len2 = vec2.length();

    let angle = (PI - vec1.angle_to(vec2)) * 0.5;
    let dist = corner.radius * angle.tan();

    if !dist.is_finite() {
        return Err(corner.infeasible(Infeasibility::NonFinite));
    }
    // Zero relative to the shorter leg.
    if dist <= f64::EPSILON * len1.min(len2) {
        return Err(corner.infeasible(Infeasibility::ZeroCutback));
    }
    for available in [len1, len2] {
        if dist > available {
            return Err(corner.infeasible(Infeasibility::CutbackTooLong {
                cutback: dist,
                available,
            }));
        }
    }

    let dir1 = vec1
        .normalized()
        .ok_or_else(|| corner.degenerate("incoming line has no direction"))?;
    let dir2 = vec2
        .normalized()
        .ok_or_else(|| corner.degenerate("outgoing line has no direction"))?;

    Ok((
        corner.vertex.add_vec(dir1.mul_scalar(dist)),
        corner.vertex.add_vec(dir2.mul_scalar(dist)),
        (angle * 0.5).tan(),
    ))
}

/// Returns `(on_arc, on_line, magnitude)`.
///
/// `line_far` is the line endpoint away from the corner; the corner vertex is
/// the line's reference point for the arc projection.
fn arc_line(corner: &Corner, arc: &Arc2, line_far: Point2) -> Result<Tangents, FilletError> {
    let on_arc = arc_tangent_point(corner, arc, corner.vertex)?;
    let on_line = line_tangent_point(corner, corner.vertex, line_far)?;

    let to_arc = arc.center.sub_point(on_arc);
    let to_line = arc.center.sub_point(on_line);
    if corner.tol.is_zero_vec2(to_arc) || corner.tol.is_zero_vec2(to_line) {
        return Err(corner.degenerate("tangent point coincides with arc center"));
    }
    let angle = to_arc.angle_to(to_line);

    Ok((on_arc, on_line, (angle * 0.25).tan()))
}

fn arc_arc(corner: &Corner, arc1: &Arc2, arc2: &Arc2) -> Result<Tangents, FilletError> {
    let on_first = arc_tangent_point(corner, arc1, corner.vertex)?;
    let on_second = arc_tangent_point(corner, arc2, corner.vertex)?;

    let to_first = arc1.center.sub_point(on_first);
    let to_second = arc2.center.sub_point(on_second);
    if corner.tol.is_zero_vec2(to_first) || corner.tol.is_zero_vec2(to_second) {
        return Err(corner.degenerate("tangent point coincides with arc center"));
    }
    let angle = to_first.angle_to(to_second);

    Ok((on_first, on_second, (angle * 0.25).tan()))
}

/// Project from `reference` toward the arc center by the fillet radius.
fn arc_tangent_point(corner: &Corner, arc: &Arc2, reference: Point2) -> Result<Point2, FilletError> {
    let dir = arc.center.sub_point(reference);
    let reach = dir.length() - arc.radius;
    if !reach.is_finite() {
        return Err(corner.infeasible(Infeasibility::NonFinite));
    }
    if reach > corner.radius {
        return Err(corner.infeasible(Infeasibility::ArcOutOfReach { reach }));
    }
    let unit = dir
        .normalized()
        .ok_or_else(|| corner.degenerate("corner coincides with arc center"))?;
    Ok(reference.add_vec(unit.mul_scalar(corner.radius)))
}

/// Walk from the line's far endpoint toward `near` by the fillet radius.
fn line_tangent_point(corner: &Corner, near: Point2, far: Point2) -> Result<Point2, FilletError> {
    let dir = near.sub_point(far);
    let available = dir.length();
    if corner.radius > available {
        return Err(corner.infeasible(Infeasibility::CutbackTooLong {
            cutback: corner.radius,
            available,
        }));
    }
    let unit = dir
        .normalized()
        .ok_or_else(|| corner.degenerate("line has no direction"))?;
    Ok(far.add_vec(unit.mul_scalar(corner.radius)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_8;

    fn right_angle() -> Chain {
        Chain::from_points(
            &[
                Point2::new(-10.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 10.0),
            ],
            false,
        )
    }

    #[test]
    fn strict_clockwise_test_treats_collinear_as_ccw() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(!is_clockwise(a, b, Point2::new(2.0, 0.0)));
        assert!(!is_clockwise(a, b, Point2::new(2.0, 1e-12)));
        assert!(is_clockwise(a, b, Point2::new(2.0, -1e-12)));
    }

    #[test]
    fn invalid_radius_is_rejected_before_indexing() {
        let chain = right_angle();
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = apply_fillet(&chain, 99, radius).unwrap_err();
            assert!(matches!(err, FilletError::InvalidRadius { .. }));
        }
    }

    #[test]
    fn in_place_fillet_matches_pure_fillet() {
        let tol = Tolerance::default_geom();
        let chain = right_angle();
        let outcome = apply_fillet(&chain, 1, 2.0).unwrap();

        let mut edited = chain.clone();
        let report = edited.fillet_vertex(1, 2.0, tol).unwrap();
        assert_eq!(report, outcome.report);
        assert_eq!(edited, outcome.chain);
        assert!((report.bulge - FRAC_PI_8.tan()).abs() < 1e-12);
    }

    #[test]
    fn straight_through_corner_has_zero_cutback() {
        let chain = Chain::from_points(
            &[Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(10.0, 0.0)],
            false,
        );
        let err = apply_fillet(&chain, 1, 1.0).unwrap_err();
        assert!(matches!(
            err,
            FilletError::InfeasibleFillet {
                reason: Infeasibility::ZeroCutback,
                ..
            }
        ));
    }

    #[test]
    fn u_turn_corner_never_fits() {
        let chain = Chain::from_points(
            &[Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(0.0, 0.0)],
            false,
        );
        let err = apply_fillet(&chain, 1, 1.0).unwrap_err();
        assert!(matches!(err, FilletError::InfeasibleFillet { .. }));
    }
}
