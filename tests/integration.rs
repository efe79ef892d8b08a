use fillet_engine::geom::{
    Chain, FilletError, FilletKind, Point2, Segment, Tolerance, Vertex, apply_fillet,
    apply_fillet_with_tolerance, arc_bulge,
};
use fillet_engine::snapshot::{chain_snapshot, write_fillet_report};
use fillet_engine::{EngineError, FilletEngine};

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
fn engine_initializes() {
    let engine = FilletEngine::new();
    assert!(engine.is_initialized());
    assert_eq!(engine.vertex_count(), 0);
    assert!(engine.chain().is_none());
}

#[test]
fn engine_requires_a_chain_before_filleting() {
    let mut engine = FilletEngine::new();
    assert_eq!(engine.fillet_corner(1, 2.0), Err(EngineError::NoChain));
    assert_eq!(engine.fillet_corners(2.0), Err(EngineError::NoChain));
}

#[test]
fn engine_edits_loaded_chain_in_place() {
    let mut engine = FilletEngine::new();
    engine.set_chain(right_angle());
    assert_eq!(engine.vertex_count(), 3);

    let report = engine.fillet_corner(1, 2.0).expect("fillet fits");
    assert_eq!(report.kind, FilletKind::LineLine);
    assert_eq!(engine.vertex_count(), 4);

    // The corner vertex moved to (0, 2), so a huge radius no longer fits there.
    let err = engine.fillet_corner(2, 50.0).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Fillet(FilletError::InfeasibleFillet { .. })
    ));
    assert_eq!(engine.vertex_count(), 4);
}

#[test]
fn engine_tolerance_must_be_positive() {
    let mut engine = FilletEngine::new();
    assert!(engine.apply_tolerance(0.0).is_err());
    assert!(engine.apply_tolerance(f64::NAN).is_err());
    engine.apply_tolerance(1e-6).expect("valid tolerance");
    assert_eq!(engine.tolerance(), Tolerance::LOOSE);
}

#[test]
fn engine_fillet_all_replaces_chain() {
    let mut engine = FilletEngine::new();
    engine.set_chain(Chain::from_points(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ],
        true,
    ));

    let diag = engine.fillet_corners(1.0).expect("valid radius");
    assert_eq!(diag.filleted_corner_count, 4);
    assert_eq!(engine.vertex_count(), 8);
    assert_eq!(
        engine.fillet_corners(-1.0),
        Err(EngineError::Fillet(FilletError::InvalidRadius { radius: -1.0 }))
    );
}

#[test]
fn filleted_arc_has_requested_radius() {
    let tol = Tolerance::default_geom();
    for radius in [0.5, 1.0, 3.0, 7.5] {
        let outcome = apply_fillet(&right_angle(), 1, radius).expect("fillet fits");
        let arc = outcome
            .chain
            .segment_at(1, tol)
            .and_then(|segment| segment.as_arc().copied())
            .expect("arc segment");
        assert!((arc.radius - radius).abs() < 1e-9, "radius {radius}");
    }
}

#[test]
fn acute_corner_cutback_matches_formula() {
    // 60° corner: cutback = r · tan((π − π/3) / 2) = r · √3.
    let corner = Point2::ORIGIN;
    let chain = Chain::from_points(
        &[
            Point2::new(10.0, 0.0),
            corner,
            Point2::new(10.0 * 0.5, 10.0 * 3f64.sqrt() * 0.5),
        ],
        false,
    );
    let report = apply_fillet(&chain, 1, 1.0).expect("fillet fits").report;

    assert!((report.prev_tangent.distance_to(corner) - 3f64.sqrt()).abs() < 1e-9);
    assert!((report.next_tangent.distance_to(corner) - 3f64.sqrt()).abs() < 1e-9);
    // Sweep of the fillet arc is π − 60° = 2π/3, so bulge is tan(π/6).
    assert!((report.bulge.abs() - (std::f64::consts::PI / 6.0).tan()).abs() < 1e-9);
}

#[test]
fn loose_tolerance_still_fillets_imported_geometry() {
    let tol = Tolerance::LOOSE;
    // Endpoint noise below 1e-6 is accepted by the looser tolerance.
    let chain = Chain::from_segments(
        &[
            Segment::line(Point2::new(-10.0, 0.0), Point2::new(0.0, 0.0)),
            Segment::line(Point2::new(0.0, 1e-7), Point2::new(0.0, 10.0)),
        ],
        false,
        tol,
    )
    .expect("gap within tolerance");
    let outcome = apply_fillet_with_tolerance(&chain, 1, 2.0, tol).expect("fillet fits");
    assert_eq!(outcome.chain.len(), 4);
}

#[test]
fn semicircle_bulge_round_trips_through_arc() {
    let chain = Chain::new(
        vec![
            Vertex::new(Point2::new(0.0, 0.0), arc_bulge(0.0, std::f64::consts::PI)),
            Vertex::new(Point2::new(2.0, 0.0), 0.0),
        ],
        false,
    );
    let arc = chain
        .segment_at(0, Tolerance::default_geom())
        .and_then(|segment| segment.as_arc().copied())
        .expect("arc segment");
    assert!((arc.radius - 1.0).abs() < 1e-9);
    assert!(arc.center.distance_to(Point2::new(1.0, 0.0)) < 1e-9);

    let rebuilt = Chain::from_segments(&[Segment::Arc(arc)], false, Tolerance::default_geom())
        .expect("single arc");
    assert!((rebuilt.vertices()[0].bulge - 1.0).abs() < 1e-9);
}

#[test]
fn snapshot_of_right_angle_fillet_is_stable() {
    let outcome = apply_fillet(&right_angle(), 1, 2.0).expect("fillet fits");
    let snap = chain_snapshot("line_line_right_angle", &outcome.chain, |out| {
        write_fillet_report(out, &outcome.report);
    });

    let expected = "\
# fillet-engine snapshot v1
op line_line_right_angle
quantize 1.0e-6
fillet.kind LineLine
fillet.vertex_index 1
fillet.inserted_index 1
fillet.prev_tangent -2.000000 0.000000
fillet.next_tangent 0.000000 2.000000
fillet.bulge 0.414214
chain.closed false
chain.vertex_count 4
chain.v.0 -10.000000 0.000000 0.000000
chain.v.1 -2.000000 0.000000 0.414214
chain.v.2 0.000000 2.000000 0.000000
chain.v.3 0.000000 10.000000 0.000000
";
    assert_eq!(snap, expected);
}
