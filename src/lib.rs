#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod config;
pub mod credentials;
pub mod import_data;
pub mod record_client;
pub mod record_table;
pub mod sync;
pub mod track_vector;
pub mod wkt;
