//! Resource simulator binary.
//!
//! Loads a resource catalog, seeds every owner, applies a scripted list of
//! effects and prints the final snapshots as JSON on stdout. Logs go to
//! stderr.
//!
//! # Examples
//!
//! ```bash
//! # Bundled sample data
//! cargo run -p resource-client
//!
//! # Custom script with effect-level logging
//! RESOURCE_SCRIPT=turn.ron RUST_LOG=resource_core=debug cargo run -p resource-client
//! ```

use anyhow::{Context, Result};
use resource_client::{Session, SimConfig, load_script};
use resource_content::SessionSeeds;
use resource_content::loaders::{CatalogLoader, SeedsLoader};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    tracing::info!(catalog = %config.catalog_path().display(), "Starting resource simulator");

    let catalog = CatalogLoader::load(&config.catalog_path())?;
    let seeds_path = config.seeds_path();
    let seeds = if seeds_path.exists() {
        SeedsLoader::load(&seeds_path)?
    } else {
        tracing::warn!(path = %seeds_path.display(), "No seeds file, owners start at defaults");
        SessionSeeds::default()
    };
    let script = load_script(&config.script_path())?;

    let mut session = Session::new(&catalog, &seeds)?;
    for (index, step) in script.iter().enumerate() {
        session.ensure_owner(&step.actor)?;
        session
            .apply(step)
            .with_context(|| format!("Script step {index} failed"))?;
    }
    tracing::info!(steps = script.len(), "Script complete");

    let report = session.report();
    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
