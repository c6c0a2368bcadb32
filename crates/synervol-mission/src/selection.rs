use serde::{Deserialize, Serialize};
use synervol_core::{ScanType, SvError, SvResult};
use synervol_geo::{compute_boundary, BoundaryRing, GeoPoint, ShapeKind, ShapeParameters};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub center: Option<GeoPoint>,
    pub scan_type: ScanType,
    pub shape_kind: ShapeKind,
    pub shape_parameters: ShapeParameters,
}

impl Selection {
    pub fn boundary(&self) -> SvResult<BoundaryRing> {
        let center = self
            .center
            .ok_or_else(|| SvError::invalid_parameter("no selection center"))?;
        compute_boundary(center, self.shape_kind, &self.shape_parameters)
    }
}
