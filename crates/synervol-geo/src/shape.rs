use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use synervol_core::{SvError, SvResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = SvError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            other => Err(SvError::invalid_input(format!("unknown shape `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    pub radius_m: f64,
    pub side_m: f64,
    pub rotation_deg: f64,
}

impl ShapeParameters {
    pub const DEFAULT_RADIUS_M: f64 = 50.0;
    pub const DEFAULT_SIDE_M: f64 = 100.0;

    pub fn circle(radius_m: f64) -> Self {
        Self {
            radius_m,
            ..Self::default()
        }
    }

    pub fn square(side_m: f64, rotation_deg: f64) -> Self {
        Self {
            side_m,
            rotation_deg,
            ..Self::default()
        }
    }

    pub fn validate_for(&self, kind: ShapeKind) -> SvResult<()> {
        match kind {
            ShapeKind::Circle => positive("radius", self.radius_m),
            ShapeKind::Square => {
                positive("side", self.side_m)?;
                if !self.rotation_deg.is_finite() {
                    return Err(SvError::invalid_parameter("rotation must be finite"));
                }
                Ok(())
            }
        }
    }
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            radius_m: Self::DEFAULT_RADIUS_M,
            side_m: Self::DEFAULT_SIDE_M,
            rotation_deg: 0.0,
        }
    }
}

fn positive(name: &str, value: f64) -> SvResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SvError::invalid_parameter(format!(
            "{name} must be a finite value > 0, got {value}"
        )))
    }
}
