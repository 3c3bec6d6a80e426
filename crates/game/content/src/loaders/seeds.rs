//! Session seed loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Initial values for every owner in a session, keyed by owner name.
///
/// ```toml
/// [owners.player]
/// gold = 10.0
/// fire = 3.0
///
/// [owners.rival]
/// gold = 4.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSeeds {
    #[serde(default)]
    pub owners: BTreeMap<String, BTreeMap<String, f64>>,
}

impl SessionSeeds {
    /// Seeds for `owner`, or an empty table if the owner has none.
    pub fn owner(&self, owner: &str) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.owners
            .get(owner)
            .into_iter()
            .flatten()
            .map(|(id, value)| (id.as_str(), *value))
    }

    pub fn owner_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.owners.keys().map(String::as_str)
    }
}

/// Loader for session seeds from TOML files.
pub struct SeedsLoader;

impl SeedsLoader {
    pub fn load(path: &Path) -> LoadResult<SessionSeeds> {
        let content = read_file(path)?;
        let seeds: SessionSeeds = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse session seeds TOML: {}", e))?;

        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn loads_owner_tables() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[owners.player]\ngold = 10.0\nfire = 3.5\n\n[owners.rival]\ngold = 4.0"
        )
        .unwrap();

        let seeds = SeedsLoader::load(file.path()).unwrap();
        assert_eq!(seeds.owner_names().collect::<Vec<_>>(), ["player", "rival"]);
        assert_eq!(
            seeds.owner("player").collect::<Vec<_>>(),
            [("fire", 3.5), ("gold", 10.0)]
        );
        assert_eq!(seeds.owner("nobody").count(), 0);
    }

    #[test]
    fn malformed_seeds_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[owners.player]\ngold = \"lots\"").unwrap();

        let err = SeedsLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse session seeds TOML"));
    }
}
