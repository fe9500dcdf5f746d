use crate::track_vector::{TrackPoint, TrackVector};
use anyhow::Result;
use gpx::read;
use std::{fs::File, io::BufReader, path::Path};

/* Tracks and segments are flattened in file order. The distinction between
segments does not matter here: the remote geometry is a single line. */
pub fn load_gpx(file_path: &Path) -> Result<TrackVector> {
    let gpx_data = read(BufReader::new(File::open(file_path)?))?;
    let track_points = gpx_data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(|point| TrackPoint {
            latitude: point.point().y(),
            longitude: point.point().x(),
        })
        .collect();
    // A file without points is not an error, callers treat it as a skip.
    Ok(TrackVector { track_points })
}
