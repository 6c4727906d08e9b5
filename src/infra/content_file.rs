//! Content overrides stored as a JSON document on disk.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::domain::content::ContentConfig;

use super::error::InfraError;

/// Start from the built-in content and overlay the areas found in `path`.
pub async fn load_content(path: Option<&Path>) -> Result<ContentConfig, InfraError> {
    let mut config = ContentConfig::with_defaults();
    let Some(path) = path else {
        return Ok(config);
    };

    let text = tokio::fs::read_to_string(path).await?;
    let value: Value = serde_json::from_str(&text).map_err(|err| {
        InfraError::configuration(format!("invalid content file {}: {err}", path.display()))
    })?;
    let Value::Object(areas) = value else {
        return Err(InfraError::configuration(format!(
            "content file {} must contain a JSON object",
            path.display()
        )));
    };

    info!(
        target = "infra::content_file::load_content",
        path = %path.display(),
        areas = areas.len(),
        "content overrides loaded"
    );
    config.merge_areas(areas);
    Ok(config)
}

pub async fn save_content(path: &Path, config: &ContentConfig) -> Result<(), InfraError> {
    let text = serde_json::to_string_pretty(config.root()).map_err(|err| {
        InfraError::configuration(format!("failed to encode content: {err}"))
    })?;
    tokio::fs::write(path, text).await?;
    Ok(())
}
