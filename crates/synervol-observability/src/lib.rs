use metrics::{describe_counter, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use synervol_config::ServiceConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
    pub metrics_addr: Option<String>,
}

impl From<&ServiceConfig> for ObservabilityConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            environment: config.environment.to_string(),
            log_level: config.log_level.clone(),
            metrics_addr: config.metrics_addr.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObservabilityHandle {
    pub service_name: String,
    pub metrics_enabled: bool,
}

pub fn init(config: &ObservabilityConfig) -> ObservabilityHandle {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    let metrics_enabled = init_metrics(config);

    ObservabilityHandle {
        service_name: config.service_name.clone(),
        metrics_enabled,
    }
}

pub fn log_startup(handle: &ObservabilityHandle, environment: &str) {
    tracing::info!(
        service = %handle.service_name,
        environment = %environment,
        version = env!("CARGO_PKG_VERSION"),
        metrics_enabled = handle.metrics_enabled,
        "SynerVol service starting"
    );
}

fn init_metrics(config: &ObservabilityConfig) -> bool {
    let Some(addr) = config.metrics_addr.as_ref() else {
        return false;
    };
    let addr: SocketAddr = match addr.parse() {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                error = %err,
                "Invalid SV_METRICS_ADDR value"
            );
            return false;
        }
    };

    let builder = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", config.service_name.clone())
        .add_global_label("environment", config.environment.clone());

    match builder.install() {
        Ok(()) => {
            describe_metrics();
            true
        }
        Err(err) => {
            tracing::warn!(
                service = %config.service_name,
                error = %err,
                "Failed to initialize Prometheus exporter"
            );
            false
        }
    }
}

fn describe_metrics() {
    describe_counter!(
        "synervol_dispatch_total",
        Unit::Count,
        "Mission dispatch attempts by terminal outcome"
    );
    describe_counter!(
        "synervol_missions_received_total",
        Unit::Count,
        "Mission messages received by the listener, by verdict"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use synervol_config::Environment;

    #[test]
    fn config_is_derived_from_service_config() {
        let service = ServiceConfig {
            service_name: "synervol-planner".to_string(),
            environment: Environment::Test,
            bind_addr: "0.0.0.0:8080".to_string(),
            metrics_addr: None,
            log_level: "warn".to_string(),
        };
        let config = ObservabilityConfig::from(&service);
        assert_eq!(config.environment, "test");
        assert_eq!(config.log_level, "warn");

        let handle = init(&config);
        assert!(!handle.metrics_enabled);
        assert_eq!(handle.service_name, "synervol-planner");
    }

    #[test]
    fn bad_metrics_addr_disables_exporter() {
        let config = ObservabilityConfig {
            service_name: "synervol-listener".to_string(),
            environment: "test".to_string(),
            log_level: "info".to_string(),
            metrics_addr: Some("not-an-address".to_string()),
        };
        assert!(!init_metrics(&config));
    }
}
