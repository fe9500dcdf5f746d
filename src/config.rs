use std::path::PathBuf;

/// Runtime configuration. Defaults match the expected working-directory
/// layout; each field can be overridden by a positional CLI argument in
/// declaration order.
#[derive(Debug, Clone)]
pub struct Config {
    pub gpx_dir: PathBuf,
    pub table_path: PathBuf,
    pub token_path: PathBuf,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gpx_dir: PathBuf::from("garmin-GPX-files"),
            table_path: PathBuf::from("data.csv"),
            token_path: PathBuf::from(".fulcrum_api_token"),
            api_base: "https://api.fulcrumapp.com/api/v2".to_string(),
        }
    }
}

impl Config {
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Config {
        let mut config = Config::default();
        if let Some(gpx_dir) = args.next() {
            config.gpx_dir = PathBuf::from(gpx_dir);
        }
        if let Some(table_path) = args.next() {
            config.table_path = PathBuf::from(table_path);
        }
        if let Some(token_path) = args.next() {
            config.token_path = PathBuf::from(token_path);
        }
        if let Some(api_base) = args.next() {
            config.api_base = api_base;
        }
        config
    }
}
