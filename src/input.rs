use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;
use crate::error::{Error, Result};
use crate::types::RawData;

/// Reads one JSON dataset. Missing or `null` collections load as empty.
pub fn load_dataset(path: &Path) -> Result<RawData> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut data: RawData = serde_json::from_reader(BufReader::new(file))
        .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;

    if data.repository.is_none() {
        data.repository = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    }
    debug!(
        "Loaded '{}': {} commits, {} pull requests",
        path.display(), data.commits.len(), data.pull_requests.len()
    );
    Ok(data)
}
