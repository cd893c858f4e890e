use std::path::Path;

use anyhow::Context;
use velo_optimizer::json::types::JsonRebalanceProblem;

pub fn read_problem(path: &Path) -> Result<JsonRebalanceProblem, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Invalid problem in {}", path.display()))
}
