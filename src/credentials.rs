use anyhow::Result;
use std::{fs, path::Path};

/// Loads the API token. A missing file or an empty (after trimming) token
/// is a fatal precondition: nothing else can succeed without credentials.
pub fn load_api_token(path: &Path) -> Result<String> {
    if !path.is_file() {
        bail!("API token file '{}' not found", path.display());
    }
    let token = fs::read_to_string(path)?.trim().to_string();
    if token.is_empty() {
        bail!("API token file '{}' is empty", path.display());
    }
    Ok(token)
}
