use async_trait::async_trait;
use synervol_mission::{Dimensions, MissionCommand};
use thiserror::Error;
use zbus::{Connection, Proxy};

const LOGIC_SERVICE: &str = "com.drone.Logic";
const LOGIC_PATH: &str = "/com/drone/Logic";
const LOGIC_INTERFACE: &str = "com.drone.Logic.Commands";
const START_MISSION: &str = "StartMission";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("d-bus error: {0}")]
    Dbus(#[from] zbus::Error),
    #[error("mission has no coordinates")]
    MissingCoordinates,
}

#[async_trait]
pub trait MissionSink: Send + Sync {
    async fn forward(&self, command: &MissionCommand) -> Result<(), SinkError>;

    fn name(&self) -> &'static str;
}

pub struct LogSink;

#[async_trait]
impl MissionSink for LogSink {
    async fn forward(&self, command: &MissionCommand) -> Result<(), SinkError> {
        let (lat, lng, scan_type, dimension, value) = start_mission_args(command)?;
        tracing::info!(lat, lng, scan_type, dimension, value, "mission forwarded to log sink");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// Calls `StartMission(lat, lng, scan_type, dimension, value)` on the drone
// logic service over the system bus.
pub struct DbusSink {
    proxy: Proxy<'static>,
}

impl DbusSink {
    pub async fn connect() -> Result<Self, SinkError> {
        let connection = Connection::system().await?;
        Self::with_connection(&connection).await
    }

    pub async fn with_connection(connection: &Connection) -> Result<Self, SinkError> {
        let proxy = Proxy::new(connection, LOGIC_SERVICE, LOGIC_PATH, LOGIC_INTERFACE).await?;
        Ok(Self { proxy })
    }
}

#[async_trait]
impl MissionSink for DbusSink {
    async fn forward(&self, command: &MissionCommand) -> Result<(), SinkError> {
        let args = start_mission_args(command)?;
        self.proxy.call_method(START_MISSION, &args).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dbus"
    }
}

pub fn start_mission_args(
    command: &MissionCommand,
) -> Result<(f64, f64, &'static str, &'static str, f64), SinkError> {
    let coordinates = command.coordinates.ok_or(SinkError::MissingCoordinates)?;
    let (dimension, value) = match command.dimensions {
        Dimensions::Radius { radius } => ("radius", radius),
        Dimensions::Side { side } => ("side", side),
    };
    Ok((
        coordinates.lat,
        coordinates.lng,
        command.scan_type.as_str(),
        dimension,
        value,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(text: &str) -> MissionCommand {
        MissionCommand::decode(text).unwrap()
    }

    #[test]
    fn start_mission_args_carry_the_active_dimension() {
        let circle = command(
            r#"{"type":"mission","api_version":"1.0","coordinates":{"lat":48.8566,"lng":2.3522},"scan_type":"circle","dimensions":{"radius":50}}"#,
        );
        assert_eq!(
            start_mission_args(&circle).unwrap(),
            (48.8566, 2.3522, "circle", "radius", 50.0)
        );

        let square = command(
            r#"{"type":"mission","api_version":"1.0","coordinates":{"lat":-1.5,"lng":30},"scan_type":"square","dimensions":{"side":120.5}}"#,
        );
        assert_eq!(
            start_mission_args(&square).unwrap(),
            (-1.5, 30.0, "square", "side", 120.5)
        );
    }

    #[test]
    fn start_mission_args_need_coordinates() {
        let incomplete = command(
            r#"{"type":"mission","api_version":"1.0","coordinates":null,"scan_type":"circle","dimensions":{"radius":50}}"#,
        );
        assert!(matches!(
            start_mission_args(&incomplete),
            Err(SinkError::MissingCoordinates)
        ));
    }

    #[actix_web::test]
    async fn log_sink_accepts_complete_missions() {
        let circle = command(
            r#"{"type":"mission","api_version":"1.0","coordinates":{"lat":1,"lng":2},"scan_type":"circle","dimensions":{"radius":5}}"#,
        );
        assert!(LogSink.forward(&circle).await.is_ok());
        assert_eq!(LogSink.name(), "log");
    }
}
