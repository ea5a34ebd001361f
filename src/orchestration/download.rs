//! Download cache for files placed into containers
//!
//! Files are fetched once per URL into a host directory and reused by later
//! runs. The file name is keyed by a hash of the URL, so pinning a different
//! release URL always fetches fresh bytes.

use crate::error::{DaggersError, DaggersResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Upper bound on a single download
const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// Name of the cached copy of `url`: `<sha256(url)[..16]>-<basename>`
pub(crate) fn cached_file_name(url: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let base = path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download");
    format!("{}-{}", &digest[..16], base)
}

/// Return a host path holding the contents of `url`, downloading it into `dir` if needed
pub async fn fetch(url: &str, dir: &Path) -> DaggersResult<PathBuf> {
    let name = cached_file_name(url);
    let target = dir.join(&name);

    if fs::try_exists(&target).await.unwrap_or(false) {
        debug!("Using cached download {}", target.display());
        return Ok(target);
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| DaggersError::io(format!("creating directory {}", dir.display()), e))?;

    info!("Downloading {}", url);
    let owned = url.to_string();
    let bytes = tokio::task::spawn_blocking(move || fetch_bytes(&owned))
        .await
        .map_err(|e| DaggersError::Internal(format!("download task failed: {}", e)))??;

    // Write then rename so an interrupted download never looks complete
    let partial = dir.join(format!("{}.part", name));
    fs::write(&partial, &bytes)
        .await
        .map_err(|e| DaggersError::io(format!("writing {}", partial.display()), e))?;
    fs::rename(&partial, &target)
        .await
        .map_err(|e| DaggersError::io(format!("moving download to {}", target.display()), e))?;

    debug!("Downloaded {} bytes to {}", bytes.len(), target.display());
    Ok(target)
}

fn fetch_bytes(url: &str) -> DaggersResult<Vec<u8>> {
    let download_err = |reason: String| DaggersError::Download {
        url: url.to_string(),
        reason,
    };

    let mut response = ureq::get(url).call().map_err(|e| download_err(e.to_string()))?;
    response
        .body_mut()
        .with_config()
        .limit(MAX_DOWNLOAD_BYTES)
        .read_to_vec()
        .map_err(|e| download_err(e.to_string()))
}
