//! Data-driven resource content and loaders.
//!
//! This crate is the metadata source of the resource core:
//! - Resource and group catalogs (data-driven via RON)
//! - Tier enter/exit effect tables (data-driven via RON)
//! - Per-owner session seeds (data-driven via TOML)
//!
//! Content is consumed once when a session starts and never appears in
//! owner state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ContentFactory, ResourceCatalog, SeedsLoader, SessionSeeds};
