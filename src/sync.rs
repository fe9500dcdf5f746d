use crate::config::Config;
use crate::credentials;
use crate::import_data;
use crate::record_client::RecordClient;
use crate::record_table::RecordTable;
use crate::wkt;
use anyhow::Result;
use itertools::Itertools;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, PartialEq)]
pub enum FileOutcome {
    Updated { points: usize },
    NoMatch,
    MissingRecordId,
    EmptyTrack,
    Failed { detail: String },
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<(String, FileOutcome)>,
}

impl SyncReport {
    fn record(&mut self, file_name: String, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Updated { .. } => self.updated += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
            _ => self.skipped += 1,
        }
        self.outcomes.push((file_name, outcome));
    }
}

/// Runs one full synchronization pass. Only fatal preconditions (missing
/// token, missing directory, unreadable table, missing geometry column)
/// return `Err`; everything else is isolated to the offending file and
/// recorded in the report.
pub fn run(config: &Config, interrupted: &AtomicBool) -> Result<SyncReport> {
    // The token is checked first: without credentials no remote operation
    // can succeed, so nothing else should be touched.
    let api_token = credentials::load_api_token(&config.token_path)?;

    if !config.gpx_dir.is_dir() {
        bail!("track directory not found: {}", config.gpx_dir.display());
    }
    let mut table = RecordTable::load(&config.table_path)?;
    let lookup = table.day_lookup();
    let preview = lookup.keys().sorted().take(5).join(", ");
    info!(
        "found {} day entries in {}: {}{}",
        lookup.len(),
        config.table_path.display(),
        preview,
        if lookup.len() > 5 { ", ..." } else { "" }
    );

    let client = RecordClient::new(&config.api_base, &api_token)?;
    let gpx_files = discover_gpx_files(&config.gpx_dir)?;
    if gpx_files.is_empty() {
        info!("no GPX files found in {}", config.gpx_dir.display());
    }

    let mut report = SyncReport::default();
    for path in &gpx_files {
        if interrupted.load(Ordering::SeqCst) {
            warn!("interrupted, skipping remaining files");
            break;
        }
        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or_default()
            .to_string();
        let outcome = process_file(path, &lookup, &client, &mut table);
        report.record(file_name, outcome);
    }

    if report.updated > 0 {
        if interrupted.load(Ordering::SeqCst) {
            warn!("interrupted, table not persisted");
        } else if let Err(err) = table.save(&config.table_path) {
            // The run itself succeeded; losing the local rewrite is logged
            // but does not fail the process.
            error!(
                "failed to save table '{}': {:#}",
                config.table_path.display(),
                err
            );
        } else {
            info!(
                "updated {} records in {}",
                report.updated,
                config.table_path.display()
            );
        }
    } else {
        info!("no updates were made");
    }
    Ok(report)
}

/// Non-recursive scan for `.gpx` files (case-insensitive), sorted by file
/// name so runs are reproducible.
fn discover_gpx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(OsStr::to_str) {
            Some(extension) if extension.eq_ignore_ascii_case("gpx") => files.push(path),
            _ => (),
        }
    }
    files.sort();
    Ok(files)
}

fn process_file(
    path: &Path,
    lookup: &HashMap<String, (usize, String)>,
    client: &RecordClient,
    table: &mut RecordTable,
) -> FileOutcome {
    let day_key = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or_default()
        .to_string();
    info!("processing {} (day {})", path.display(), day_key);

    let (row_idx, record_id) = match lookup.get(&day_key) {
        Some(entry) => entry,
        None => {
            warn!("no matching day '{}' in table", day_key);
            return FileOutcome::NoMatch;
        }
    };
    if record_id.is_empty() {
        warn!("no record id for day '{}'", day_key);
        return FileOutcome::MissingRecordId;
    }

    let track = match import_data::load_gpx(path) {
        Ok(track) => track,
        Err(err) => {
            error!("failed to parse {}: {:#}", path.display(), err);
            return FileOutcome::Failed {
                detail: format!("{err:#}"),
            };
        }
    };
    if track.is_empty() {
        warn!("no coordinates found in {}", path.display());
        return FileOutcome::EmptyTrack;
    }
    info!("extracted {} points", track.len());

    let record = match client.fetch(record_id) {
        Ok(record) => record,
        Err(err) => {
            error!("{:#}", err);
            return FileOutcome::Failed {
                detail: format!("{err:#}"),
            };
        }
    };
    if let Err(err) = client.update(record_id, &track, record.form_values) {
        error!("{:#}", err);
        return FileOutcome::Failed {
            detail: format!("{err:#}"),
        };
    }
    info!("updated record {}", record_id);

    table.set_geometry(*row_idx, &wkt::linestring(&track));
    FileOutcome::Updated {
        points: track.len(),
    }
}
