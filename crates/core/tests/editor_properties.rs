//! Editor behavior over long and randomized point sequences
//!
//! Covers the snapping, undo walk-back and drain rules on inputs that unit
//! tests don't reach: many polylines, random coordinates, and sequences
//! driven to exhaustion.

use grid_setup_core::core_types::within_tolerance;
use grid_setup_core::{BoundaryEditor, GridDims, PointOutcome, Segment, Vec2, SNAP_TOLERANCE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn editor(width: usize, height: usize) -> BoundaryEditor {
    BoundaryEditor::new(GridDims::new(width, height).unwrap())
}

/// Random point that cannot snap onto the current polyline's ends
fn non_snapping_point(rng: &mut StdRng, editor: &BoundaryEditor) -> Vec2 {
    loop {
        let candidate = Vec2::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
        let current = editor.current();
        let snaps = [current.first(), current.last()]
            .into_iter()
            .flatten()
            .any(|end| within_tolerance(end, &candidate, SNAP_TOLERANCE));
        if !snaps {
            return candidate;
        }
    }
}

#[test]
fn test_non_snapping_calls_all_append() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let mut editor = editor(160, 160);
        let calls = rng.random_range(1..200);
        for _ in 0..calls {
            let point = non_snapping_point(&mut rng, &editor);
            assert_eq!(editor.add_point(point.x, point.y), PointOutcome::Appended);
        }
        assert_eq!(editor.current().len(), calls);
        assert_eq!(editor.polyline_count(), 1);
    }
}

#[test]
fn test_point_accounting_and_full_undo() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut editor = editor(64, 32);
    let mut expected_points = 0;

    for _ in 0..2_000 {
        // Coarse lattice makes closes and ends frequent
        let x = f64::from(rng.random_range(0..8_u8)) / 8.0;
        let y = f64::from(rng.random_range(0..8_u8)) / 8.0;
        match editor.add_point(x, y) {
            PointOutcome::Appended | PointOutcome::Closed => expected_points += 1,
            PointOutcome::Ended => {}
        }
        assert_eq!(editor.point_count(), expected_points);
    }

    // Every finished polyline has at least two points
    let finished = editor.polyline_count() - 1;
    assert!(editor.polylines().take(finished).all(|p| p.len() >= 2));

    let mut undone = 0;
    while editor.undo_point().is_some() {
        undone += 1;
    }
    assert_eq!(undone, expected_points);
    assert!(editor.is_empty());
    assert_eq!(editor.polyline_count(), 1);
}

#[test]
fn test_commit_segment_count_matches_polyline_shape() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut editor = editor(160, 160);
    for _ in 0..500 {
        let x = f64::from(rng.random_range(0..6_u8)) / 6.0;
        let y = f64::from(rng.random_range(0..6_u8)) / 6.0;
        editor.add_point(x, y);
    }

    let expected: usize = editor
        .polylines()
        .map(|polyline| polyline.len().saturating_sub(1))
        .sum();
    let preview = editor.segments();
    let segments = editor.commit_and_clear();

    assert_eq!(segments.len(), expected);
    assert_eq!(segments, preview);
    assert!(editor.commit_and_clear().is_empty());
}

#[test]
fn test_closed_square_rasterizes_to_loop() {
    let mut editor = editor(20, 10);
    editor.add_point(0.25, 0.2);
    editor.add_point(0.75, 0.2);
    editor.add_point(0.75, 0.8);
    editor.add_point(0.25, 0.8);
    assert_eq!(editor.add_point(0.251, 0.199), PointOutcome::Closed);

    let segments = editor.commit_and_clear();
    assert_eq!(
        segments,
        vec![
            Segment::new(5, 2, 15, 2),
            Segment::new(15, 2, 15, 8),
            Segment::new(15, 8, 5, 8),
            Segment::new(5, 8, 5, 2),
        ]
    );
    // Loop: each segment starts where the previous one ended
    for pair in segments.windows(2) {
        assert_eq!((pair[0].x1, pair[0].y1), (pair[1].x0, pair[1].y0));
    }
}

#[test]
fn test_undo_after_close_then_reclose() {
    let mut editor = editor(10, 10);
    editor.add_point(0.1, 0.1);
    editor.add_point(0.9, 0.1);
    editor.add_point(0.9, 0.9);
    editor.add_point(0.1, 0.1);

    // Walk back past the closing point and the third vertex
    editor.undo_point();
    editor.undo_point();
    assert_eq!(editor.polyline_count(), 1);
    assert_eq!(editor.current().len(), 2);

    editor.add_point(0.5, 0.9);
    assert_eq!(editor.add_point(0.1, 0.1), PointOutcome::Closed);
    assert_eq!(
        editor.commit_and_clear(),
        vec![
            Segment::new(1, 1, 9, 1),
            Segment::new(9, 1, 5, 9),
            Segment::new(5, 9, 1, 1),
        ]
    );
}
