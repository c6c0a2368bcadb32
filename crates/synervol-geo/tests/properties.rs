use synervol_geo::geodesy::{bearing_deg, distance_m};
use synervol_geo::{compute_boundary, GeoPoint, ShapeKind, ShapeParameters};

const DISTANCE_TOLERANCE_M: f64 = 1.0;
const BEARING_TOLERANCE_DEG: f64 = 0.01;

fn centers() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(48.8566, 2.3522).unwrap(),
        GeoPoint::new(0.0, 0.0).unwrap(),
        GeoPoint::new(-33.8688, 151.2093).unwrap(),
        GeoPoint::new(69.6492, 18.9553).unwrap(),
        GeoPoint::new(10.0, 179.9995).unwrap(),
    ]
}

fn bearing_diff(a: f64, b: f64) -> f64 {
    ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
}

#[test]
fn circle_vertices_sit_on_the_geodesic_radius() {
    for center in centers() {
        for radius in [1.0, 50.0, 480.0, 2_500.0] {
            let ring =
                compute_boundary(center, ShapeKind::Circle, &ShapeParameters::circle(radius))
                    .unwrap();
            assert!(ring.is_closed());
            assert_eq!(ring.points().first(), ring.points().last());
            for vertex in ring.points() {
                let distance = distance_m(center, *vertex);
                assert!(
                    (distance - radius).abs() < DISTANCE_TOLERANCE_M,
                    "center {center:?} radius {radius} got {distance}"
                );
            }
        }
    }
}

#[test]
fn unrotated_square_corners_sit_on_the_diagonals() {
    for center in centers() {
        for side in [10.0, 100.0, 1_000.0] {
            let ring =
                compute_boundary(center, ShapeKind::Square, &ShapeParameters::square(side, 0.0))
                    .unwrap();
            let corners = &ring.points()[..4];
            let expected_bearings = [225.0, 135.0, 45.0, 315.0];
            for (corner, expected) in corners.iter().zip(expected_bearings) {
                let distance = distance_m(center, *corner);
                assert!((distance - side / 2f64.sqrt()).abs() < DISTANCE_TOLERANCE_M);
                let bearing = bearing_deg(center, *corner);
                assert!(
                    bearing_diff(bearing, expected) < BEARING_TOLERANCE_DEG,
                    "expected {expected}, got {bearing}"
                );
            }
        }
    }
}

#[test]
fn rotation_shifts_every_corner_bearing_clockwise() {
    let center = GeoPoint::new(45.0, 7.0).unwrap();
    let side = 300.0;
    let base = compute_boundary(center, ShapeKind::Square, &ShapeParameters::square(side, 0.0))
        .unwrap();
    for theta in [15.0, 45.0, 90.0, -30.0, 200.0] {
        let rotated =
            compute_boundary(center, ShapeKind::Square, &ShapeParameters::square(side, theta))
                .unwrap();
        for (before, after) in base.points()[..4].iter().zip(&rotated.points()[..4]) {
            let shift = bearing_deg(center, *after) - bearing_deg(center, *before);
            assert!(bearing_diff(shift, theta) < BEARING_TOLERANCE_DEG);
            let d0 = distance_m(center, *before);
            let d1 = distance_m(center, *after);
            assert!((d0 - d1).abs() < DISTANCE_TOLERANCE_M);
        }
    }
}

#[test]
fn boundary_is_deterministic() {
    let center = GeoPoint::new(48.8566, 2.3522).unwrap();
    let params = ShapeParameters {
        radius_m: 75.0,
        side_m: 120.0,
        rotation_deg: 12.5,
    };
    for kind in [ShapeKind::Circle, ShapeKind::Square] {
        let first = compute_boundary(center, kind, &params).unwrap();
        let second = compute_boundary(center, kind, &params).unwrap();
        assert_eq!(first, second);
    }
}
