use std::fs;
use std::path::Path;
use std::thread;

use lumen_world::ChunkDims;
use serde::Deserialize;

use crate::ServiceError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_chunk_size_xz")]
    pub chunk_size_x: usize,
    #[serde(default = "default_chunk_size_y")]
    pub chunk_size_y: usize,
    #[serde(default = "default_chunk_size_xz")]
    pub chunk_size_z: usize,
    // Floor applied to normalized light, 0.0..=1.0
    #[serde(default)]
    pub min_ambient: f32,
    // Resubmissions after a worker fault before the chunk is given up on
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}
fn default_chunk_size_xz() -> usize {
    ChunkDims::REFERENCE.sx
}
fn default_chunk_size_y() -> usize {
    ChunkDims::REFERENCE.sy
}
fn default_max_retries() -> u32 {
    2
}
fn default_thread_name_prefix() -> String {
    "lumen-light".into()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            chunk_size_x: default_chunk_size_xz(),
            chunk_size_y: default_chunk_size_y(),
            chunk_size_z: default_chunk_size_xz(),
            min_ambient: 0.0,
            max_retries: default_max_retries(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl RuntimeConfig {
    #[inline]
    pub fn dims(&self) -> ChunkDims {
        ChunkDims::new(self.chunk_size_x, self.chunk_size_y, self.chunk_size_z)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ServiceError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
