//! Container job specification
//!
//! An immutable description of the environment a tool runs in. Each
//! `with_*` call consumes the spec and returns the extended one, so a spec
//! handed to a runtime is always complete.

use crate::cache::{CacheMount, CacheVolume};
use crate::error::DaggersResult;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A host directory mounted read/write into the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryMount {
    /// Directory on the host
    pub host_path: PathBuf,
    /// Mount path inside container
    pub container_path: String,
}

impl DirectoryMount {
    /// Generate the volume mount string for the engine's `-v` flag
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.host_path.display(), self.container_path)
    }
}

/// A remote file placed at a fixed path inside the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDownload {
    /// Source URL (http or https)
    pub url: String,
    /// Absolute destination path inside container
    pub destination: String,
}

/// Description of a container job, minus the command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    image: String,
    workdir: Option<String>,
    directories: Vec<DirectoryMount>,
    caches: Vec<CacheMount>,
    files: Vec<FileDownload>,
    env: BTreeMap<String, String>,
}

impl ContainerSpec {
    /// Start a spec from an image reference
    pub fn from(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            workdir: None,
            directories: Vec::new(),
            caches: Vec::new(),
            files: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// Mount a host directory at `path`
    pub fn with_mounted_directory(mut self, path: impl Into<String>, host: &Path) -> Self {
        self.directories.push(DirectoryMount {
            host_path: host.to_path_buf(),
            container_path: path.into(),
        });
        self
    }

    /// Mount a cache volume at `path`
    pub fn with_mounted_cache(mut self, path: impl Into<String>, volume: &CacheVolume) -> Self {
        self.caches.push(CacheMount::new(path, volume));
        self
    }

    /// Place the file at `url` at `destination`
    pub fn with_file_download(
        mut self,
        url: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        self.files.push(FileDownload {
            url: url.into(),
            destination: destination.into(),
        });
        self
    }

    /// Set an environment variable (last write wins)
    pub fn with_env_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory for execution
    pub fn with_workdir(mut self, path: impl Into<String>) -> Self {
        self.workdir = Some(path.into());
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn workdir(&self) -> Option<&str> {
        self.workdir.as_deref()
    }

    pub fn directories(&self) -> &[DirectoryMount] {
        &self.directories
    }

    pub fn caches(&self) -> &[CacheMount] {
        &self.caches
    }

    pub fn files(&self) -> &[FileDownload] {
        &self.files
    }

    /// Environment variables, ordered by name
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

type CustomizeFn = dyn Fn(ContainerSpec) -> DaggersResult<ContainerSpec> + Send + Sync;

/// A named, pluggable step that customizes a [`ContainerSpec`]
///
/// Two customizers are equal when they share a name and the same step
/// function, which keeps configurations holding them comparable.
#[derive(Clone)]
pub struct Customizer {
    name: String,
    step: Arc<CustomizeFn>,
}

impl Customizer {
    pub fn new<F>(name: impl Into<String>, step: F) -> Self
    where
        F: Fn(ContainerSpec) -> DaggersResult<ContainerSpec> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            step: Arc::new(step),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the step against `spec`
    pub fn apply(&self, spec: ContainerSpec) -> DaggersResult<ContainerSpec> {
        (self.step)(spec)
    }
}

impl PartialEq for Customizer {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.step, &other.step)
    }
}

impl Eq for Customizer {}

impl fmt::Debug for Customizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customizer").field("name", &self.name).finish()
    }
}

/// Apply `customizers` in order, stopping at the first failure
pub fn apply_customizers(
    spec: ContainerSpec,
    customizers: &[Customizer],
) -> DaggersResult<ContainerSpec> {
    customizers.iter().try_fold(spec, |spec, c| c.apply(spec))
}
