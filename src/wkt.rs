use crate::track_vector::TrackVector;
use itertools::Itertools;

/// Formats a track as WKT, e.g. `LINESTRING(8.54 47.37, 8.55 47.38)`.
/// An empty track produces an empty string, never `LINESTRING()`.
pub fn linestring(track: &TrackVector) -> String {
    if track.is_empty() {
        return String::new();
    }
    let coords = track
        .track_points
        .iter()
        .map(|point| format!("{} {}", point.longitude, point.latitude))
        .join(", ");
    format!("LINESTRING({coords})")
}
