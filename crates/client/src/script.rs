//! Effect scripts driven through a session.

use std::path::Path;

use anyhow::Context;
use resource_core::ResourceEffect;
use serde::{Deserialize, Serialize};

/// One scripted effect application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Owner the effect is applied for.
    pub actor: String,
    /// Second owner, addressed by opponent-side transfer endpoints.
    #[serde(default)]
    pub opponent: Option<String>,
    pub effect: ResourceEffect,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Charge the blueprint's primary action cost before the effect.
    #[serde(default)]
    pub global_action: bool,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Parses a RON list of script steps.
pub fn parse_script(content: &str) -> anyhow::Result<Vec<ScriptStep>> {
    ron::from_str(content).context("Failed to parse effect script RON")
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&content)
}
