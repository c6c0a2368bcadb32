use serde::{Deserialize, Serialize};
use std::{env, fmt};

pub const DEFAULT_MISSION_ENDPOINT: &str = "ws://localhost:8080";
const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Local,
    Dev,
    Test,
    Field,
}

impl Environment {
    pub fn from_env(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "dev" | "development" => Self::Dev,
            "test" | "testing" => Self::Test,
            "field" | "prod" | "production" => Self::Field,
            _ => Self::Local,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Field => "field",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: Environment,
    pub bind_addr: String,
    pub metrics_addr: Option<String>,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    fn from_lookup(default_service_name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service_name: lookup("SV_SERVICE_NAME")
                .unwrap_or_else(|| default_service_name.to_string()),
            environment: Environment::from_env(
                &lookup("SV_ENV").unwrap_or_else(|| "local".to_string()),
            ),
            bind_addr: lookup("SV_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            metrics_addr: lookup("SV_METRICS_ADDR").filter(|value| !value.trim().is_empty()),
            log_level: lookup("SV_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub endpoint: String,
    pub connect_timeout_ms: u64,
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("SV_MISSION_ENDPOINT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MISSION_ENDPOINT.to_string());
        let connect_timeout_ms = lookup("SV_DISPATCH_TIMEOUT_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_DISPATCH_TIMEOUT_MS);
        Self {
            endpoint,
            connect_timeout_ms,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MISSION_ENDPOINT.to_string(),
            connect_timeout_ms: DEFAULT_DISPATCH_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Log,
    Dbus,
}

impl SinkKind {
    pub fn from_env(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dbus" | "d-bus" => Self::Dbus,
            _ => Self::Log,
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => f.write_str("log"),
            Self::Dbus => f.write_str("dbus"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub sink: SinkKind,
}

impl ListenerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sink: SinkKind::from_env(&lookup("SV_MISSION_SINK").unwrap_or_default()),
        }
    }
}
