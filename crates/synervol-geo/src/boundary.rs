use crate::geodesy::destination;
use crate::point::GeoPoint;
use crate::shape::{ShapeKind, ShapeParameters};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use synervol_core::SvResult;

pub const CIRCLE_STEPS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryRing {
    points: Vec<GeoPoint>,
}

impl BoundaryRing {
    fn closed(mut points: Vec<GeoPoint>) -> Self {
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    pub fn lat_lng_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(GeoPoint::lat_lng).collect()
    }

    pub fn to_geojson(&self) -> Value {
        let ring: Vec<[f64; 2]> = self.points.iter().map(GeoPoint::lng_lat).collect();
        json!({
            "type": "Polygon",
            "coordinates": [ring],
        })
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bounds = BoundingBox {
            north: first.lat,
            south: first.lat,
            east: first.lng,
            west: first.lng,
        };
        for point in &self.points[1..] {
            bounds.north = bounds.north.max(point.lat);
            bounds.south = bounds.south.min(point.lat);
            bounds.east = bounds.east.max(point.lng);
            bounds.west = bounds.west.min(point.lng);
        }
        Some(bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lng <= self.east
            && point.lng >= self.west
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoFence {
    Circle { center: GeoPoint, radius_m: f64 },
    Polygon { ring: BoundaryRing },
}

impl GeoFence {
    pub fn preview(center: GeoPoint, kind: ShapeKind, params: &ShapeParameters) -> SvResult<Self> {
        match kind {
            ShapeKind::Circle => {
                center.validate()?;
                params.validate_for(kind)?;
                Ok(Self::Circle {
                    center,
                    radius_m: params.radius_m,
                })
            }
            ShapeKind::Square => Ok(Self::Polygon {
                ring: compute_boundary(center, kind, params)?,
            }),
        }
    }
}

/// Boundary ring of the geofence centered on `center`.
///
/// Fails with `InvalidParameter` when the center is off the globe or when
/// the radius/side used by `kind` is not strictly positive.
pub fn compute_boundary(
    center: GeoPoint,
    kind: ShapeKind,
    params: &ShapeParameters,
) -> SvResult<BoundaryRing> {
    center.validate()?;
    params.validate_for(kind)?;
    let ring = match kind {
        ShapeKind::Circle => circle_ring(center, params.radius_m),
        ShapeKind::Square => square_ring(center, params.side_m, params.rotation_deg),
    };
    Ok(ring)
}

fn circle_ring(center: GeoPoint, radius_m: f64) -> BoundaryRing {
    let radius_km = radius_m / 1000.0;
    let points = (0..CIRCLE_STEPS)
        .map(|step| {
            let bearing = -(step as f64) * 360.0 / CIRCLE_STEPS as f64;
            destination(center, radius_km, bearing)
        })
        .collect();
    BoundaryRing::closed(points)
}

fn square_ring(center: GeoPoint, side_m: f64, rotation_deg: f64) -> BoundaryRing {
    let half = side_m / 2.0;
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    // Local frame: x east, y north, meters. SW, SE, NE, NW.
    let corners = [(-half, -half), (half, -half), (half, half), (-half, half)];
    let points = corners
        .iter()
        .map(|&(x, y)| {
            let rx = x * cos + y * sin;
            let ry = -x * sin + y * cos;
            let distance_km = rx.hypot(ry) / 1000.0;
            let bearing = rx.atan2(ry).to_degrees();
            destination(center, distance_km, bearing)
        })
        .collect();
    BoundaryRing::closed(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synervol_core::ErrorCode;

    fn center() -> GeoPoint {
        GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        }
    }

    #[test]
    fn circle_ring_has_closing_vertex() {
        let ring = compute_boundary(center(), ShapeKind::Circle, &ShapeParameters::circle(50.0))
            .unwrap();
        assert_eq!(ring.len(), CIRCLE_STEPS + 1);
        assert!(ring.is_closed());
    }

    #[test]
    fn square_ring_has_four_corners_and_closes() {
        let ring =
            compute_boundary(center(), ShapeKind::Square, &ShapeParameters::square(100.0, 0.0))
                .unwrap();
        assert_eq!(ring.len(), 5);
        assert!(ring.is_closed());
        let sw = ring.points()[0];
        let ne = ring.points()[2];
        assert!(sw.lat < center().lat && sw.lng < center().lng);
        assert!(ne.lat > center().lat && ne.lng > center().lng);
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let err = compute_boundary(center(), ShapeKind::Circle, &ShapeParameters::circle(0.0))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
        let err =
            compute_boundary(center(), ShapeKind::Square, &ShapeParameters::square(-5.0, 0.0))
                .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn rejects_center_off_the_globe() {
        let bad = GeoPoint {
            lat: 91.0,
            lng: 0.0,
        };
        assert!(compute_boundary(bad, ShapeKind::Circle, &ShapeParameters::default()).is_err());
    }

    #[test]
    fn pairs_swap_to_lat_lng_and_geojson_keeps_lng_lat() {
        let ring =
            compute_boundary(center(), ShapeKind::Square, &ShapeParameters::square(100.0, 0.0))
                .unwrap();
        let first = ring.points()[0];
        assert_eq!(ring.lat_lng_pairs()[0], [first.lat, first.lng]);

        let geojson = ring.to_geojson();
        assert_eq!(geojson["type"], "Polygon");
        assert_eq!(geojson["coordinates"][0][0][0].as_f64(), Some(first.lng));
        assert_eq!(geojson["coordinates"][0][0][1].as_f64(), Some(first.lat));
    }

    #[test]
    fn bounding_box_contains_center() {
        let ring = compute_boundary(center(), ShapeKind::Circle, &ShapeParameters::circle(250.0))
            .unwrap();
        let bounds = ring.bounding_box().unwrap();
        assert!(bounds.contains(center()));
        assert!(bounds.north > bounds.south);
    }

    #[test]
    fn circle_preview_is_a_native_primitive() {
        let fence =
            GeoFence::preview(center(), ShapeKind::Circle, &ShapeParameters::circle(80.0)).unwrap();
        assert_eq!(
            fence,
            GeoFence::Circle {
                center: center(),
                radius_m: 80.0
            }
        );
        let fence =
            GeoFence::preview(center(), ShapeKind::Square, &ShapeParameters::default()).unwrap();
        assert!(matches!(fence, GeoFence::Polygon { ref ring } if ring.len() == 5));
    }
}
