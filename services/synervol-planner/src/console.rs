use crate::render;
use crate::session::PlannerSession;
use anyhow::Result;
use std::time::Duration;
use synervol_core::{ScanType, SvError, SvResult};
use synervol_geo::{GeoPoint, ShapeKind};
use synervol_mission::{DispatchHandle, MissionDispatcher};
use tokio::io::{AsyncBufReadExt, BufReader};

// How long to let in-flight dispatches finish once input ends.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub const HELP: &str = "\
commands:
  click <lat> <lng>        select the geofence center
  shape circle|square      geofence shape
  scan circle|square       sweep pattern inside the geofence
  radius <meters>          circle radius
  side <meters>            square side
  rotation <degrees>       square rotation, clockwise
  preview                  what the map would draw
  geojson                  boundary ring as GeoJSON
  status                   current selection
  send                     dispatch the mission
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click(GeoPoint),
    Shape(ShapeKind),
    Scan(ScanType),
    Radius(String),
    Side(String),
    Rotation(String),
    Preview,
    GeoJson,
    Status,
    Send,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> SvResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("click" | "center", [lat, lng]) => {
                let lat = parse_coordinate("latitude", lat)?;
                let lng = parse_coordinate("longitude", lng)?;
                Self::Click(GeoPoint::new(lat, lng)?)
            }
            ("shape", [kind]) => Self::Shape(kind.parse()?),
            ("scan", [scan]) => Self::Scan(scan.parse()?),
            ("radius", [value]) => Self::Radius(value.to_string()),
            ("side", [value]) => Self::Side(value.to_string()),
            ("rotation" | "angle", [value]) => Self::Rotation(value.to_string()),
            ("preview", []) => Self::Preview,
            ("geojson", []) => Self::GeoJson,
            ("status", []) => Self::Status,
            ("send", []) => Self::Send,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (verb, _) => {
                return Err(SvError::invalid_input(format!(
                    "cannot parse `{line}` (verb `{verb}`); type `help`"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn parse_coordinate(name: &str, value: &str) -> SvResult<f64> {
    value
        .parse()
        .map_err(|_| SvError::invalid_parameter(format!("{name} `{value}` is not a number")))
}

pub struct Console {
    session: PlannerSession,
    dispatcher: MissionDispatcher,
    in_flight: Vec<DispatchHandle>,
}

impl Console {
    pub fn new(session: PlannerSession, dispatcher: MissionDispatcher) -> Self {
        Self {
            session,
            dispatcher,
            in_flight: Vec::new(),
        }
    }

    pub fn apply(&mut self, command: Command) -> SvResult<Option<String>> {
        let output = match command {
            Command::Click(point) => {
                self.session.on_map_click(point)?;
                format!("center {}", render::point(point))
            }
            Command::Shape(kind) => {
                self.session.set_shape_kind(kind);
                format!("shape {kind}")
            }
            Command::Scan(scan_type) => {
                self.session.set_scan_type(scan_type);
                format!("scan {scan_type}")
            }
            Command::Radius(input) => {
                self.session.set_radius_input(&input)?;
                format!("radius {} m", self.session.selection().shape_parameters.radius_m)
            }
            Command::Side(input) => {
                self.session.set_side_input(&input)?;
                format!("side {} m", self.session.selection().shape_parameters.side_m)
            }
            Command::Rotation(input) => {
                self.session.set_rotation_input(&input)?;
                format!(
                    "rotation {} deg",
                    self.session.selection().shape_parameters.rotation_deg
                )
            }
            Command::Preview => render::preview(&self.session),
            Command::GeoJson => match self.session.boundary() {
                Some(ring) => ring.to_geojson().to_string(),
                None => "no boundary: click on the map first".to_string(),
            },
            Command::Status => render::status(&self.session.selection()),
            Command::Send => self.send(),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }

    fn send(&mut self) -> String {
        self.in_flight.retain(|handle| !handle.is_finished());
        let handle = self.dispatcher.dispatch(self.session.selection());
        let line = format!(
            "mission {} dispatched to {}",
            handle.id(),
            self.dispatcher.endpoint()
        );
        self.in_flight.push(handle);
        line
    }

    pub async fn drain(&mut self) {
        let pending = std::mem::take(&mut self.in_flight);
        if pending.is_empty() {
            return;
        }
        let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
        for handle in pending {
            let id = handle.id();
            if tokio::time::timeout_at(deadline, handle.outcome()).await.is_err() {
                tracing::warn!(dispatch_id = %id, "dispatch still pending at exit");
            }
        }
    }
}

pub async fn run(mut console: Console) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("SynerVol planner. Type `help` for commands.");

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("error: {err}");
                continue;
            }
        };
        match console.apply(command) {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => break,
            Err(err) => println!("error: {err}"),
        }
    }

    console.drain().await;
    Ok(())
}
