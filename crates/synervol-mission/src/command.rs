use crate::selection::Selection;
use serde::{Deserialize, Serialize, Serializer};
use synervol_core::{ScanType, SvError, SvResult};
use synervol_geo::{GeoPoint, ShapeKind};

pub const API_VERSION: &str = "1.0";

// Largest integer a double represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
const PLAIN_DIGITS_LIMIT: f64 = 1e21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Mission,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(serialize_with = "serialize_number")]
    pub lat: f64,
    #[serde(serialize_with = "serialize_number")]
    pub lng: f64,
}

impl From<GeoPoint> for Coordinates {
    fn from(point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
        }
    }
}

impl From<Coordinates> for GeoPoint {
    fn from(value: Coordinates) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimensions {
    Radius {
        #[serde(serialize_with = "serialize_number")]
        radius: f64,
    },
    Side {
        #[serde(serialize_with = "serialize_number")]
        side: f64,
    },
}

impl Dimensions {
    pub fn value(&self) -> f64 {
        match *self {
            Self::Radius { radius } => radius,
            Self::Side { side } => side,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionCommand {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub api_version: String,
    pub coordinates: Option<Coordinates>,
    pub scan_type: ScanType,
    pub dimensions: Dimensions,
}

impl MissionCommand {
    pub fn from_selection(selection: &Selection) -> Self {
        let params = &selection.shape_parameters;
        let dimensions = match selection.shape_kind {
            ShapeKind::Circle => Dimensions::Radius {
                radius: params.radius_m,
            },
            ShapeKind::Square => Dimensions::Side {
                side: params.side_m,
            },
        };
        Self {
            message_type: MessageType::Mission,
            api_version: API_VERSION.to_string(),
            coordinates: selection.center.map(Coordinates::from),
            scan_type: selection.scan_type,
            dimensions,
        }
    }

    pub fn encode(&self) -> SvResult<String> {
        serde_json::to_string(self)
            .map_err(|err| SvError::new(synervol_core::ErrorCode::Internal, err.to_string()))
    }

    pub fn decode(text: &str) -> SvResult<Self> {
        serde_json::from_str(text)
            .map_err(|err| SvError::invalid_input(format!("malformed mission: {err}")))
    }

    pub fn validate(&self) -> SvResult<()> {
        if self.api_version != API_VERSION {
            return Err(SvError::invalid_input(format!(
                "unsupported api_version `{}`",
                self.api_version
            )));
        }
        let coordinates = self
            .coordinates
            .ok_or_else(|| SvError::incomplete_selection("mission has no coordinates"))?;
        GeoPoint::from(coordinates).validate()?;
        let value = self.dimensions.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(SvError::invalid_parameter(format!(
                "mission dimension must be > 0, got {value}"
            )));
        }
        Ok(())
    }
}

fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match whole_number(*value) {
        Some(whole) => serializer.serialize_i128(whole),
        None => serializer.serialize_f64(*value),
    }
}

// Whole values below 1e21 print as plain digits: the shortest round-trip
// digits, zero-padded to the decimal exponent.
fn whole_number(value: f64) -> Option<i128> {
    if value.fract() != 0.0 || value.abs() >= PLAIN_DIGITS_LIMIT {
        return None;
    }
    if value.abs() <= MAX_SAFE_INTEGER {
        return Some(value as i128);
    }
    let text = format!("{:e}", value.abs());
    let (mantissa, exponent) = text.split_once('e')?;
    let exponent: usize = exponent.parse().ok()?;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let magnitude: i128 = format!("{digits:0<width$}", width = exponent + 1)
        .parse()
        .ok()?;
    Some(if value < 0.0 { -magnitude } else { magnitude })
}
