use std::f64::consts::{FRAC_PI_2, FRAC_PI_8};

use crate::geom::{
    Arc2, Chain, ChainError, DEFAULT_ARC_SUBDIVISIONS, Point2, Segment, SegmentKind, Tolerance,
    Vertex, apply_fillet,
};

#[test]
fn from_segments_stores_arc_bulge_on_start_vertex() {
    let tol = Tolerance::default_geom();
    let chain = Chain::from_segments(
        &[
            Segment::line(Point2::new(-5.0, 0.0), Point2::new(5.0, 0.0)),
            Segment::Arc(Arc2::new(Point2::ORIGIN, 5.0, 0.0, FRAC_PI_2)),
        ],
        false,
        tol,
    )
    .unwrap();

    assert_eq!(chain.len(), 3);
    assert_eq!(chain.segment_count(), 2);
    assert_eq!(chain.vertices()[0].bulge, 0.0);
    assert!((chain.vertices()[1].bulge - FRAC_PI_8.tan()).abs() < 1e-12);
    assert_eq!(chain.segment_kind_at(1, tol), Some(SegmentKind::Arc));

    let arc = chain.segment_at(1, tol).and_then(|s| s.as_arc().copied()).unwrap();
    assert!(arc.center.distance_to(Point2::ORIGIN) < 1e-9);
    assert!((arc.radius - 5.0).abs() < 1e-9);
}

#[test]
fn from_segments_closed_does_not_repeat_first_vertex() {
    let tol = Tolerance::default_geom();
    let a = Point2::new(0.0, 0.0);
    let b = Point2::new(4.0, 0.0);
    let c = Point2::new(0.0, 3.0);
    let chain = Chain::from_segments(
        &[Segment::line(a, b), Segment::line(b, c), Segment::line(c, a)],
        true,
        tol,
    )
    .unwrap();

    assert!(chain.is_closed());
    assert_eq!(chain.points(), vec![a, b, c]);
    let total: f64 = chain.segments(tol).iter().map(Segment::length).sum();
    assert!((total - 12.0).abs() < 1e-12);
}

#[test]
fn from_segments_reports_gaps_and_bad_arcs() {
    let tol = Tolerance::default_geom();
    assert_eq!(Chain::from_segments(&[], false, tol), Err(ChainError::Empty));

    let err = Chain::from_segments(
        &[
            Segment::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            Segment::line(Point2::new(1.5, 0.0), Point2::new(2.0, 0.0)),
        ],
        false,
        tol,
    )
    .unwrap_err();
    assert!(matches!(err, ChainError::Discontinuous { index: 0, gap } if (gap - 0.5).abs() < 1e-12));

    let err = Chain::from_segments(
        &[
            Segment::line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            Segment::line(Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)),
        ],
        true,
        tol,
    )
    .unwrap_err();
    assert!(matches!(err, ChainError::Discontinuous { index: 1, .. }));

    let err = Chain::from_segments(
        &[Segment::Arc(Arc2::new(Point2::ORIGIN, 0.0, 0.0, FRAC_PI_2))],
        false,
        tol,
    )
    .unwrap_err();
    assert_eq!(err, ChainError::DegenerateArc { index: 0 });
}

#[test]
fn widths_survive_a_fillet() {
    let chain = Chain::new(
        vec![
            Vertex::new(Point2::new(-10.0, 0.0), 0.0).with_widths(1.0, 2.0),
            Vertex::new(Point2::new(0.0, 0.0), 0.0).with_widths(2.0, 3.0),
            Vertex::new(Point2::new(0.0, 10.0), 0.0),
        ],
        false,
    );
    let outcome = apply_fillet(&chain, 1, 1.0).unwrap();
    let vertices = outcome.chain.vertices();

    assert_eq!(vertices[0].start_width, 1.0);
    assert_eq!(vertices[1].start_width, 0.0);
    assert_eq!(vertices[1].end_width, 0.0);
    // The moved corner keeps its own widths.
    assert_eq!(vertices[2].start_width, 2.0);
    assert_eq!(vertices[2].end_width, 3.0);
}

#[test]
fn flattened_fillet_arc_stays_on_the_circle() {
    let tol = Tolerance::default_geom();
    let chain = Chain::from_points(
        &[
            Point2::new(-10.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
        ],
        false,
    );
    let filleted = apply_fillet(&chain, 1, 2.0).unwrap().chain;
    let arc = filleted.segment_at(1, tol).and_then(|s| s.as_arc().copied()).unwrap();

    let mut flat = Chain::from_points(&[Point2::new(-10.0, 0.0)], false);
    flat.push_arc_points(&arc, DEFAULT_ARC_SUBDIVISIONS, tol);
    assert_eq!(flat.len(), DEFAULT_ARC_SUBDIVISIONS + 2);
    for v in &flat.vertices()[1..] {
        assert!((v.point.distance_to(arc.center) - 2.0).abs() < 1e-9);
    }
}
