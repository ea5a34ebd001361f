//! Stock container customizers
//!
//! Ready-made [`Customizer`] steps that tools and callers can pass to a
//! tool's `with_container_customizers` option.

use crate::error::DaggersError;
use crate::orchestration::{ContainerSpec, Customizer};
use std::path::PathBuf;

/// Place the file at `url` at the absolute container path `destination`
pub fn download_file(url: impl Into<String>, destination: impl Into<String>) -> Customizer {
    let url = url.into();
    let destination = destination.into();
    let step = format!("download {}", url);

    Customizer::new(step.clone(), move |spec: ContainerSpec| {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(DaggersError::customize(&step, "only http(s) URLs can be downloaded"));
        }
        if !destination.starts_with('/') {
            return Err(DaggersError::customize(
                &step,
                format!("destination {} must be an absolute path", destination),
            ));
        }
        Ok(spec.with_file_download(url.clone(), destination.clone()))
    })
}

/// Set an environment variable in the container
pub fn env_variable(key: impl Into<String>, value: impl Into<String>) -> Customizer {
    let key = key.into();
    let value = value.into();

    Customizer::new(format!("env {}", key), move |spec: ContainerSpec| {
        Ok(spec.with_env_variable(key.clone(), value.clone()))
    })
}

/// Mount an existing host directory at `path`
pub fn mounted_directory(host: impl Into<PathBuf>, path: impl Into<String>) -> Customizer {
    let host = host.into();
    let path = path.into();
    let step = format!("mount {}", host.display());

    Customizer::new(step.clone(), move |spec: ContainerSpec| {
        if !host.is_dir() {
            return Err(DaggersError::customize(
                &step,
                format!("{} is not a directory", host.display()),
            ));
        }
        Ok(spec.with_mounted_directory(path.clone(), &host))
    })
}
