//! Content factory for loading a session's data files.

use std::path::{Path, PathBuf};

use crate::loaders::{CatalogLoader, LoadResult, ResourceCatalog, SeedsLoader, SessionSeeds};

/// Content factory that loads resource content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── resources.ron
/// └── seeds.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the resource catalog from `resources.ron`.
    pub fn load_catalog(&self) -> LoadResult<ResourceCatalog> {
        CatalogLoader::load(&self.data_dir.join("resources.ron"))
    }

    /// Load session seeds from `seeds.toml`.
    ///
    /// A missing file yields empty seeds, so every owner starts at its
    /// clamped defaults.
    pub fn load_seeds(&self) -> LoadResult<SessionSeeds> {
        let path = self.data_dir.join("seeds.toml");
        if !path.exists() {
            return Ok(SessionSeeds::default());
        }
        SeedsLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
