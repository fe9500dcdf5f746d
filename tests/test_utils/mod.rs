use geo_types::Point;
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

/// Writes a single-track, single-segment GPX file with the given
/// (longitude, latitude) points.
pub fn write_gpx(path: &Path, points: &[(f64, f64)]) {
    let segment = TrackSegment {
        points: points
            .iter()
            .map(|(longitude, latitude)| Waypoint::new(Point::new(*longitude, *latitude)))
            .collect(),
    };
    let track = Track {
        name: Some("Track 1".to_string()),
        comment: None,
        description: None,
        source: None,
        links: vec![],
        type_: None,
        number: None,
        segments: vec![segment],
    };
    let gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("fieldsync-tests".to_string()),
        metadata: None,
        waypoints: vec![],
        tracks: vec![track],
        routes: vec![],
    };
    gpx::write(&gpx, File::create(path).unwrap()).unwrap();
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal in-process stand-in for the remote record API. Answers every
/// GET with `fetch_response` and everything else with `update_response`,
/// recording each request as it arrives.
pub struct FakeRecordServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeRecordServer {
    pub fn start(fetch_response: (u16, &str), update_response: (u16, &str)) -> FakeRecordServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind fixture server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let fetch_response = (fetch_response.0, fetch_response.1.to_string());
        let update_response = (update_response.0, update_response.1.to_string());
        let recorded = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { return };
                if let Some(request) = read_request(&mut stream) {
                    let (status, body) = if request.method == "GET" {
                        &fetch_response
                    } else {
                        &update_response
                    };
                    // Record before responding so the request is visible as
                    // soon as the client sees the response.
                    recorded.lock().unwrap().push(request);
                    let response = format!(
                        "HTTP/1.1 {status} Fixture\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len(),
                    );
                    let _ = stream.write_all(response.as_bytes());
                }
            }
        });

        FakeRecordServer { base_url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let (name, value) = (name.trim().to_string(), value.trim().to_string());
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name, value));
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;
    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
