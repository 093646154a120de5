use super::*;
use nalgebra::vector;

fn square(s: f64) -> Polygon {
    Polygon::closed(vec![
        vector![0.0, 0.0],
        vector![s, 0.0],
        vector![s, s],
        vector![0.0, s],
    ])
}

#[test]
fn segment_crossing_and_touching() {
    let a = Segment::new(vector![0.0, 0.0], vector![10.0, 10.0]);
    let b = Segment::new(vector![0.0, 10.0], vector![10.0, 0.0]);
    assert!(a.intersects(&b));
    assert!(a.conflicts(&b));

    // T-junction: endpoint of c lies in the interior of a.
    let c = Segment::new(vector![5.0, 5.0], vector![10.0, 0.0]);
    assert!(a.intersects(&c));
    assert!(a.conflicts(&c));

    let far = Segment::new(vector![20.0, 0.0], vector![30.0, 5.0]);
    assert!(!a.intersects(&far));
}

#[test]
fn shared_endpoint_is_not_a_conflict_unless_folded() {
    let a = Segment::new(vector![0.0, 0.0], vector![10.0, 0.0]);
    let corner = Segment::new(vector![10.0, 0.0], vector![10.0, 10.0]);
    assert!(a.intersects(&corner));
    assert!(!a.conflicts(&corner));

    let straight_on = Segment::new(vector![10.0, 0.0], vector![20.0, 0.0]);
    assert!(!a.conflicts(&straight_on));

    let fold_back = Segment::new(vector![10.0, 0.0], vector![4.0, 0.0]);
    assert!(a.conflicts(&fold_back));

    let reversed = Segment::new(vector![10.0, 0.0], vector![0.0, 0.0]);
    assert!(a.conflicts(&reversed));
}

#[test]
fn collinear_overlap_without_shared_endpoint() {
    let a = Segment::new(vector![0.0, 0.0], vector![10.0, 0.0]);
    let b = Segment::new(vector![5.0, 0.0], vector![15.0, 0.0]);
    assert!(a.conflicts(&b));
    let gap = Segment::new(vector![11.0, 0.0], vector![15.0, 0.0]);
    assert!(!a.intersects(&gap));
}

#[test]
fn distance_to_segment() {
    let s = Segment::new(vector![0.0, 0.0], vector![10.0, 0.0]);
    assert!((s.distance_to(vector![5.0, 3.0]) - 3.0).abs() < 1e-12);
    assert!((s.distance_to(vector![-4.0, 3.0]) - 5.0).abs() < 1e-12);
    let dot = Segment::new(vector![1.0, 1.0], vector![1.0, 1.0]);
    assert!((dot.distance_to(vector![4.0, 5.0]) - 5.0).abs() < 1e-12);
}

#[test]
fn simplicity() {
    assert!(square(10.0).is_simple());
    let bow_tie = Polygon::closed(vec![
        vector![0.0, 0.0],
        vector![10.0, 10.0],
        vector![10.0, 0.0],
        vector![0.0, 10.0],
    ]);
    assert!(!bow_tie.is_simple());
    let flat = Polygon::closed(vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![2.0, 0.0]]);
    assert!(!flat.is_simple());
    let two = Polygon::closed(vec![vector![0.0, 0.0], vector![1.0, 0.0]]);
    assert!(!two.is_simple());

    let zigzag = Polygon::open(vec![vector![0.0, 0.0], vector![10.0, 0.0], vector![10.0, 10.0]]);
    assert!(zigzag.is_simple());
    let crossing = Polygon::open(vec![
        vector![0.0, 0.0],
        vector![10.0, 10.0],
        vector![10.0, 0.0],
        vector![0.0, 10.0],
    ]);
    assert!(!crossing.is_simple());
    assert!(Polygon::point(vector![1.0, 1.0]).is_simple());
}

#[test]
fn containment_excludes_boundary() {
    let sq = square(10.0);
    assert!(sq.contains(vector![5.0, 5.0]));
    assert!(!sq.contains(vector![10.0, 5.0]));
    assert!(sq.contains_or_on(vector![10.0, 5.0], EPS));
    assert!(!sq.contains(vector![15.0, 5.0]));
    assert!(!Polygon::open(sq.pts.clone()).contains(vector![5.0, 5.0]));
}

#[test]
fn length_area_and_bbox() {
    let sq = square(10.0);
    assert!((sq.length() - 40.0).abs() < 1e-12);
    assert!((sq.signed_area() - 100.0).abs() < 1e-12);
    assert!((sq.reversed().signed_area() + 100.0).abs() < 1e-12);
    let open = Polygon::open(sq.pts.clone());
    assert!((open.length() - 30.0).abs() < 1e-12);
    let r = sq.translated(vector![1.0, 2.0]).bbox().unwrap();
    assert_eq!(r.min, vector![1.0, 2.0]);
    assert_eq!(r.center(), vector![6.0, 7.0]);
}

#[test]
fn extension_respects_own_edges() {
    let hook = Polygon::open(vec![
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 10.0],
    ]);
    assert!(hook.accepts_extension(vector![0.0, 10.0]));
    assert!(!hook.accepts_extension(vector![5.0, -5.0]));
    // Straight back along the last edge folds.
    assert!(!hook.accepts_extension(vector![10.0, 2.0]));
    assert!(Polygon::default().accepts_extension(vector![3.0, 3.0]));
}

#[test]
fn turn_angles() {
    let straight = turn_angle(vector![0.0, 0.0], vector![1.0, 0.0], vector![2.0, 0.0]);
    assert!(straight.abs() < 1e-12);
    let right = turn_angle(vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 1.0]);
    assert!((right - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    let back = turn_angle(vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 0.0]);
    assert!((back - std::f64::consts::PI).abs() < 1e-12);
}
