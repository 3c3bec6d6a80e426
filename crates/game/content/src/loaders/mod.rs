//! Content loaders for reading resource data from files.
//!
//! Catalogs are RON, seeds are TOML. Both deserialize straight into
//! `resource-core` types through its `serde` feature.

pub mod catalog;
pub mod factory;
pub mod seeds;

pub use catalog::{CatalogLoader, ResourceCatalog};
pub use factory::ContentFactory;
pub use seeds::{SeedsLoader, SessionSeeds};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
