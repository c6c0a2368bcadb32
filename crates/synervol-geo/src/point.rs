use serde::{Deserialize, Serialize};
use synervol_core::{SvError, SvResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> SvResult<Self> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> SvResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(SvError::invalid_parameter(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(SvError::invalid_parameter(format!(
                "longitude {} outside [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    pub fn lat_lng(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }

    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}
