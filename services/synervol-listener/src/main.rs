mod mission;
mod routes;
mod sink;
mod state;

use actix_web::{web, App, HttpServer};
use sink::{DbusSink, LogSink, MissionSink};
use state::AppState;
use std::io;
use std::sync::Arc;
use synervol_config::{ListenerConfig, ServiceConfig, SinkKind};
use synervol_observability::{init, log_startup, ObservabilityConfig};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ServiceConfig::from_env("synervol-listener");
    let obs_config = ObservabilityConfig::from(&config);
    let handle = init(&obs_config);
    log_startup(&handle, &obs_config.environment);

    let listener_config = ListenerConfig::from_env();
    let sink: Arc<dyn MissionSink> = match listener_config.sink {
        SinkKind::Log => Arc::new(LogSink),
        SinkKind::Dbus => Arc::new(DbusSink::connect().await.map_err(io::Error::other)?),
    };

    let bind_addr = config.bind_addr.clone();
    tracing::info!(
        bind_addr = %bind_addr,
        sink = %listener_config.sink,
        "mission listener accepting websocket connections"
    );
    let state = web::Data::new(AppState::new(config, sink));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
