use synervol_core::{ScanType, SvError, SvResult};
use synervol_geo::{compute_boundary, BoundaryRing, GeoFence, GeoPoint, ShapeKind, ShapeParameters};
use synervol_mission::Selection;

#[derive(Debug, Clone, Default)]
pub struct PlannerSession {
    center: Option<GeoPoint>,
    shape_kind: ShapeKind,
    scan_type: ScanType,
    params: ShapeParameters,
    fence: Option<GeoFence>,
    boundary: Option<BoundaryRing>,
}

impl PlannerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_map_click(&mut self, point: GeoPoint) -> SvResult<()> {
        point.validate()?;
        self.center = Some(point);
        self.recompute();
        Ok(())
    }

    pub fn set_shape_kind(&mut self, kind: ShapeKind) {
        self.shape_kind = kind;
        self.recompute();
    }

    pub fn set_scan_type(&mut self, scan_type: ScanType) {
        self.scan_type = scan_type;
    }

    pub fn set_radius_input(&mut self, input: &str) -> SvResult<()> {
        self.params.radius_m = parse_dimension("radius", input)?;
        self.recompute();
        Ok(())
    }

    pub fn set_side_input(&mut self, input: &str) -> SvResult<()> {
        self.params.side_m = parse_dimension("side", input)?;
        self.recompute();
        Ok(())
    }

    pub fn set_rotation_input(&mut self, input: &str) -> SvResult<()> {
        self.params.rotation_deg = parse_number("rotation", input)?;
        self.recompute();
        Ok(())
    }

    pub fn selection(&self) -> Selection {
        Selection {
            center: self.center,
            scan_type: self.scan_type,
            shape_kind: self.shape_kind,
            shape_parameters: self.params,
        }
    }

    pub fn marker(&self) -> Option<GeoPoint> {
        self.center
    }

    pub fn fence(&self) -> Option<&GeoFence> {
        self.fence.as_ref()
    }

    pub fn boundary(&self) -> Option<&BoundaryRing> {
        self.boundary.as_ref()
    }

    fn recompute(&mut self) {
        let Some(center) = self.center else {
            self.fence = None;
            self.boundary = None;
            return;
        };
        let fence = GeoFence::preview(center, self.shape_kind, &self.params);
        let boundary = compute_boundary(center, self.shape_kind, &self.params);
        match (fence, boundary) {
            (Ok(fence), Ok(boundary)) => {
                tracing::debug!(
                    shape = %self.shape_kind,
                    vertices = boundary.len(),
                    "preview recomputed"
                );
                self.fence = Some(fence);
                self.boundary = Some(boundary);
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(error = %err, "preview cleared");
                self.fence = None;
                self.boundary = None;
            }
        }
    }
}

fn parse_number(name: &str, input: &str) -> SvResult<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| {
        SvError::invalid_parameter(format!("{name} `{trimmed}` is not a number"))
    })?;
    if !value.is_finite() {
        return Err(SvError::invalid_parameter(format!("{name} must be finite")));
    }
    Ok(value)
}

fn parse_dimension(name: &str, input: &str) -> SvResult<f64> {
    let value = parse_number(name, input)?;
    if value <= 0.0 {
        return Err(SvError::invalid_parameter(format!(
            "{name} must be > 0, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synervol_core::ErrorCode;
    use synervol_geo::CIRCLE_STEPS;

    fn paris() -> GeoPoint {
        GeoPoint::new(48.8566, 2.3522).unwrap()
    }

    #[test]
    fn no_preview_until_a_point_is_clicked() {
        let mut session = PlannerSession::new();
        assert!(session.fence().is_none());
        assert!(session.boundary().is_none());
        session.set_radius_input("75").unwrap();
        assert!(session.fence().is_none());

        session.on_map_click(paris()).unwrap();
        assert_eq!(
            session.fence(),
            Some(&GeoFence::Circle {
                center: paris(),
                radius_m: 75.0
            })
        );
        assert_eq!(session.boundary().unwrap().len(), CIRCLE_STEPS + 1);
    }

    #[test]
    fn every_input_change_recomputes() {
        let mut session = PlannerSession::new();
        session.on_map_click(paris()).unwrap();
        session.set_shape_kind(ShapeKind::Square);
        let first = session.boundary().cloned().unwrap();
        assert_eq!(first.len(), 5);

        session.set_rotation_input("30").unwrap();
        let rotated = session.boundary().cloned().unwrap();
        assert_ne!(first, rotated);

        session.set_side_input("250").unwrap();
        assert_ne!(session.boundary().unwrap(), &rotated);

        let moved = GeoPoint::new(10.0, 10.0).unwrap();
        session.on_map_click(moved).unwrap();
        assert_eq!(session.marker(), Some(moved));
        assert!(matches!(session.fence(), Some(GeoFence::Polygon { .. })));
    }

    #[test]
    fn rejected_input_keeps_previous_value() {
        let mut session = PlannerSession::new();
        session.on_map_click(paris()).unwrap();
        let before = session.boundary().cloned();

        let err = session.set_radius_input("-3").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
        let err = session.set_radius_input("abc").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
        assert!(session.set_side_input("0").is_err());
        assert!(session.set_rotation_input("NaN").is_err());

        assert_eq!(session.selection().shape_parameters, ShapeParameters::default());
        assert_eq!(session.boundary().cloned(), before);
    }

    #[test]
    fn selection_snapshot_is_decoupled_from_later_edits() {
        let mut session = PlannerSession::new();
        session.on_map_click(paris()).unwrap();
        session.set_scan_type(ScanType::Square);
        let snapshot = session.selection();

        session.set_radius_input("500").unwrap();
        session.set_shape_kind(ShapeKind::Square);

        assert_eq!(snapshot.scan_type, ScanType::Square);
        assert_eq!(snapshot.shape_kind, ShapeKind::Circle);
        assert_eq!(snapshot.shape_parameters.radius_m, 50.0);
        assert_eq!(snapshot.center, Some(paris()));
    }
}
