//! Resource catalog loader.

use std::path::Path;
use std::sync::Arc;

use resource_core::{Blueprint, GroupDefinition, ResourceDefinition, TierEffectTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Resource catalog structure for RON files.
///
/// `tier_effects` maps the effect ids named by tier steps to the effect
/// lists they run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    pub resources: Vec<ResourceDefinition>,
    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
    #[serde(default)]
    pub tier_effects: TierEffectTable,
}

impl ResourceCatalog {
    /// Validates the catalog and builds the shared blueprint.
    pub fn blueprint(&self) -> LoadResult<Arc<Blueprint>> {
        Blueprint::build(self.resources.clone(), self.groups.clone())
            .map_err(|e| anyhow::anyhow!("Invalid resource catalog: {}", e))
    }

    /// Tier effect ids referenced by a step but missing from `tier_effects`.
    pub fn unresolved_tier_effects(&self) -> Vec<String> {
        let tracks = self
            .resources
            .iter()
            .filter_map(|resource| resource.tier.as_ref())
            .chain(self.groups.iter().filter_map(|group| group.parent.tier.as_ref()));

        let mut missing: Vec<String> = tracks
            .flat_map(|track| &track.steps)
            .flat_map(|step| step.enter.iter().chain(&step.exit))
            .filter(|id| !self.tier_effects.contains(id))
            .cloned()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

/// Loader for resource catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a resource catalog from a RON file.
    ///
    /// The catalog is parsed but not validated; call
    /// [`ResourceCatalog::blueprint`] to validate it.
    pub fn load(path: &Path) -> LoadResult<ResourceCatalog> {
        let content = read_file(path)?;
        let catalog: ResourceCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse resource catalog RON: {}", e))?;

        debug!(
            path = %path.display(),
            resources = catalog.resources.len(),
            groups = catalog.groups.len(),
            tier_effects = catalog.tier_effects.len(),
            "loaded resource catalog"
        );
        Ok(catalog)
    }
}
