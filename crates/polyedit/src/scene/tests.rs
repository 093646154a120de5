use super::*;
use nalgebra::vector;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::closed(vec![
        vector![x0, y0],
        vector![x1, y0],
        vector![x1, y1],
        vector![x0, y1],
    ])
}

#[test]
fn handles_stay_dead_after_remove() {
    let mut s = Scene::new();
    let a = s.insert(rect(0.0, 0.0, 1.0, 1.0));
    let b = s.insert(rect(2.0, 0.0, 3.0, 1.0));
    let rev = s.revision();
    assert!(s.remove(a).is_some());
    assert!(s.revision() > rev);
    assert!(s.get(a).is_none());
    let c = s.insert(rect(5.0, 0.0, 6.0, 1.0));
    assert_ne!(a, c);
    assert!(s.get(a).is_none());
    assert_eq!(s.len(), 2);
    assert_eq!(s.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![b, c]);
}

#[test]
fn crossing_polygons_rejected() {
    let mut s = Scene::new();
    let a = s.insert(rect(0.0, 0.0, 10.0, 10.0));
    assert_eq!(
        s.admits(&rect(5.0, 5.0, 15.0, 15.0), Role::Interior, &[]),
        Err(Violation::Crossing(a))
    );
    // Nested without touching is fine.
    assert!(s.admits(&rect(2.0, 2.0, 8.0, 8.0), Role::Interior, &[]).is_ok());
    // Replacing the obstacle lifts the conflict.
    assert!(s.admits(&rect(5.0, 5.0, 15.0, 15.0), Role::Interior, &[a]).is_ok());
}

#[test]
fn shared_vertex_between_polygons_is_allowed() {
    let mut s = Scene::new();
    s.insert(rect(0.0, 0.0, 10.0, 10.0));
    let tri = Polygon::closed(vec![vector![10.0, 10.0], vector![20.0, 10.0], vector![20.0, 20.0]]);
    assert!(s.admits(&tri, Role::Interior, &[]).is_ok());
}

#[test]
fn bounding_containment() {
    let mut s = Scene::new();
    let b = s.set_bounding_polygon(rect(0.0, 0.0, 100.0, 100.0));
    assert_eq!(s.role(b), Role::Bounding);
    assert!(s.admits(&rect(10.0, 10.0, 20.0, 20.0), Role::Interior, &[]).is_ok());
    assert_eq!(
        s.admits(&Polygon::point(vector![150.0, 5.0]), Role::Interior, &[]),
        Err(Violation::OutsideBounding)
    );
    assert_eq!(
        s.admits(&rect(-10.0, -10.0, 200.0, 200.0), Role::Bounding, &[]),
        Err(Violation::DuplicateBounding)
    );
    let inner = s.insert(rect(10.0, 10.0, 20.0, 20.0));
    assert_eq!(
        s.admits(&rect(15.0, 0.0, 100.0, 100.0), Role::Bounding, &[b]),
        Err(Violation::Uncontained(inner))
    );
    assert_eq!(
        s.admits(&Polygon::open(vec![vector![0.0, 0.0], vector![1.0, 1.0]]), Role::Bounding, &[b]),
        Err(Violation::OpenBounding)
    );
    assert!(s.validate().is_ok());
}

#[test]
fn non_finite_coordinates_rejected() {
    let mut s = Scene::new();
    s.insert(rect(0.0, 0.0, 10.0, 10.0));
    assert_eq!(
        s.admits(&Polygon::point(vector![f64::NAN, f64::NAN]), Role::Interior, &[]),
        Err(Violation::NonFinite)
    );
    let far = Polygon::open(vec![vector![20.0, 0.0], vector![f64::INFINITY, 5.0]]);
    assert_eq!(s.admits(&far, Role::Interior, &[]), Err(Violation::NonFinite));
}

#[test]
fn validate_reports_offender() {
    let mut s = Scene::new();
    let a = s.insert(rect(0.0, 0.0, 10.0, 10.0));
    s.insert(rect(5.0, 5.0, 15.0, 15.0));
    let err = s.validate().unwrap_err();
    assert_eq!(err.poly, a);
    assert!(matches!(err.violation, Violation::Crossing(_)));
    assert!(err.to_string().contains("crosses"));
}

#[test]
fn free_segments_and_endpoints() {
    let mut s = Scene::new();
    s.set_bounding_polygon(rect(0.0, 0.0, 100.0, 100.0));
    let line = s.insert(Polygon::open(vec![vector![10.0, 10.0], vector![30.0, 10.0]]));
    assert!(s.segment_is_free(Segment::new(vector![10.0, 20.0], vector![30.0, 20.0]), &[]));
    assert!(!s.segment_is_free(Segment::new(vector![20.0, 1.0], vector![20.0, 20.0]), &[]));
    assert!(s.segment_is_free(Segment::new(vector![20.0, 1.0], vector![20.0, 20.0]), &[line]));
    // Touching the bounding boundary away from its corners is a conflict.
    assert!(!s.segment_is_free(Segment::new(vector![20.0, 0.0], vector![20.0, 5.0]), &[line]));
    assert!(!s.segment_is_free(Segment::new(vector![50.0, 50.0], vector![150.0, 50.0]), &[]));
    assert!(s.point_is_allowed(vector![50.0, 50.0]));
    assert!(!s.point_is_allowed(vector![-1.0, 50.0]));

    assert_eq!(s.open_endpoint_near(vector![31.0, 11.0], 2.0, &[]), Some((line, End::Last)));
    assert_eq!(s.open_endpoint_near(vector![9.0, 10.0], 2.0, &[]), Some((line, End::First)));
    assert_eq!(s.open_endpoint_near(vector![9.0, 10.0], 2.0, &[line]), None);
    assert_eq!(s.open_endpoint_near(vector![20.0, 10.0], 2.0, &[]), None);
}

#[test]
fn doc_round_trip_through_json() {
    let mut s = Scene::new();
    s.set_bounding_polygon(rect(0.0, 0.0, 100.0, 100.0));
    s.insert(rect(10.0, 10.0, 20.0, 20.0));
    s.insert(Polygon::open(vec![vector![30.0, 30.0], vector![40.0, 35.0]]));
    let doc = SceneDoc::from(&s);
    let text = serde_json::to_string(&doc).unwrap();
    let back: SceneDoc = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);
    let scene = back.to_scene().unwrap();
    assert_eq!(scene.len(), 3);
    assert!(scene.bounding_polygon().is_some());

    let broken = SceneDoc {
        bounding: None,
        polygons: vec![PolygonDoc::from(&rect(0.0, 0.0, 10.0, 10.0)), PolygonDoc::from(&rect(5.0, 5.0, 15.0, 15.0))],
    };
    assert!(broken.to_scene().is_err());
    assert_eq!(broken.to_scene_unchecked().len(), 2);
}
