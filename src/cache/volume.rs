//! Cache volume bindings
//!
//! Names a content-keyed volume and binds it to a path inside a container.

use crate::cache::key::CacheKey;

/// A named cache volume owned by the container engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheVolume {
    /// Volume name (the cache key)
    pub name: String,
}

impl CacheVolume {
    /// Create a volume record for a derived key
    pub fn new(key: CacheKey) -> Self {
        Self { name: key.into() }
    }
}

/// Cache mount specification for container creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheMount {
    /// Volume name
    pub volume_name: String,
    /// Mount path inside container
    pub container_path: String,
}

impl CacheMount {
    /// Bind `volume` at `container_path`
    pub fn new(container_path: impl Into<String>, volume: &CacheVolume) -> Self {
        Self {
            volume_name: volume.name.clone(),
            container_path: container_path.into(),
        }
    }

    /// Generate the volume mount string for the engine's `-v` flag
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.volume_name, self.container_path)
    }
}
