use crate::track_vector::TrackVector;
use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

pub const API_TOKEN_HEADER: &str = "X-ApiToken";

/* The remote API has no partial-field PATCH: an update replaces the whole
record document. Every geometry update is therefore a fetch followed by a
write-back of the untouched form values, otherwise the update would wipe
every non-geometry field on the record. */
pub struct RecordClient {
    client: Client,
    api_base: String,
    api_token: String,
}

#[derive(Debug)]
pub struct RemoteRecord {
    pub form_values: Value,
}

#[derive(Serialize)]
struct RecordEnvelope {
    record: RecordPayload,
}

#[derive(Serialize)]
struct RecordPayload {
    form_values: Value,
    geometry: Geometry,
}

#[derive(Serialize)]
struct Geometry {
    #[serde(rename = "type")]
    geometry_type: &'static str,
    coordinates: Vec<[f64; 2]>,
}

fn update_payload(track: &TrackVector, form_values: Value) -> RecordEnvelope {
    RecordEnvelope {
        record: RecordPayload {
            form_values,
            geometry: Geometry {
                geometry_type: "LineString",
                coordinates: track
                    .track_points
                    .iter()
                    .map(|point| [point.longitude, point.latitude])
                    .collect(),
            },
        },
    }
}

impl RecordClient {
    pub fn new(api_base: &str, api_token: &str) -> Result<RecordClient> {
        Ok(RecordClient {
            client: Client::builder().build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/records/{}.json", self.api_base, record_id)
    }

    pub fn fetch(&self, record_id: &str) -> Result<RemoteRecord> {
        let response = self
            .client
            .get(self.record_url(record_id))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(API_TOKEN_HEADER, &self.api_token)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            bail!("failed to fetch record {record_id}: {status}: {body}");
        }
        let document: Value = serde_json::from_str(&body)?;
        let record = document
            .get("record")
            .ok_or_else(|| anyhow!("malformed response for record {record_id}: no 'record' key"))?;
        let form_values = record
            .get("form_values")
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        Ok(RemoteRecord { form_values })
    }

    pub fn update(&self, record_id: &str, track: &TrackVector, form_values: Value) -> Result<()> {
        let response = self
            .client
            .patch(self.record_url(record_id))
            .header(ACCEPT, "application/json")
            .header(API_TOKEN_HEADER, &self.api_token)
            .json(&update_payload(track, form_values))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            bail!("failed to update record {record_id}: {status}: {body}");
        }
        Ok(())
    }
}
