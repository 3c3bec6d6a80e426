//! Simulation configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Where the simulator finds its content and how it prints results.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub data_dir: PathBuf,
    pub catalog: Option<PathBuf>,
    pub seeds: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub pretty: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crates/game/content/data"),
            catalog: None,
            seeds: None,
            script: None,
            pretty: true,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RESOURCE_DATA_DIR` - Directory holding the default data files
    /// - `RESOURCE_CATALOG` - RON catalog path (default: `<data_dir>/resources.ron`)
    /// - `RESOURCE_SEEDS` - TOML seeds path (default: `<data_dir>/seeds.toml`)
    /// - `RESOURCE_SCRIPT` - RON script path (default: `<data_dir>/script.ron`)
    /// - `RESOURCE_PRETTY` - Pretty-print the JSON report (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RESOURCE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.catalog = env::var("RESOURCE_CATALOG").ok().map(PathBuf::from);
        config.seeds = env::var("RESOURCE_SEEDS").ok().map(PathBuf::from);
        config.script = env::var("RESOURCE_SCRIPT").ok().map(PathBuf::from);

        if let Some(pretty) = read_env::<bool>("RESOURCE_PRETTY") {
            config.pretty = pretty;
        }

        config
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| self.data_dir.join("resources.ron"))
    }

    pub fn seeds_path(&self) -> PathBuf {
        self.seeds
            .clone()
            .unwrap_or_else(|| self.data_dir.join("seeds.toml"))
    }

    pub fn script_path(&self) -> PathBuf {
        self.script
            .clone()
            .unwrap_or_else(|| self.data_dir.join("script.ron"))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
