use crate::session::PlannerSession;
use std::fmt::Write;
use synervol_geo::{GeoFence, GeoPoint};
use synervol_mission::{Dimensions, MissionCommand, Selection};

pub fn point(point: GeoPoint) -> String {
    format!("{:.5}, {:.5}", point.lat, point.lng)
}

pub fn preview(session: &PlannerSession) -> String {
    let Some(marker) = session.marker() else {
        return "no selection: click on the map".to_string();
    };
    let mut out = format!("marker {}", point(marker));
    match session.fence() {
        Some(GeoFence::Circle { center, radius_m }) => {
            let _ = write!(out, "\ncircle center {} radius {radius_m} m", point(*center));
        }
        Some(GeoFence::Polygon { ring }) => {
            let _ = write!(out, "\npolygon ({} vertices)", ring.len());
            for [lat, lng] in ring.lat_lng_pairs() {
                let _ = write!(out, "\n  {lat:.7}, {lng:.7}");
            }
        }
        None => out.push_str("\nno geofence"),
    }
    if let Some(bounds) = session.boundary().and_then(|ring| ring.bounding_box()) {
        let _ = write!(
            out,
            "\nbounds N {:.7} S {:.7} E {:.7} W {:.7}",
            bounds.north, bounds.south, bounds.east, bounds.west
        );
    }
    out
}

pub fn status(selection: &Selection) -> String {
    let center = selection
        .center
        .map(point)
        .unwrap_or_else(|| "none (click on the map)".to_string());
    let dimension = match MissionCommand::from_selection(selection).dimensions {
        Dimensions::Radius { radius } => format!("radius {radius} m"),
        Dimensions::Side { side } => format!(
            "side {side} m, rotation {} deg",
            selection.shape_parameters.rotation_deg
        ),
    };
    format!(
        "center {center}\nshape {}, {dimension}\nscan {}",
        selection.shape_kind, selection.scan_type
    )
}
