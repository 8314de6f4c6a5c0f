use std::fs;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

use crate::api::AppState;
use crate::core::AppConfig;
use crate::lessons::{NewLesson, upsert_lesson};

/// Parses the `--metadata` argument, which must be a JSON object.
pub fn parse_metadata(raw: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw).context("Metadata is not valid JSON")? {
        Value::Object(map) => Ok(Some(map)),
        other => Err(anyhow!("Metadata must be a JSON object, got {}", other)),
    }
}

pub async fn run(
    file: &str,
    id: Option<String>,
    metadata: Option<&str>,
    config: AppConfig,
) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read lesson file {}", file))?;
    let lesson = NewLesson::from_parts(
        id.map(Value::String),
        Some(Value::String(content)),
        parse_metadata(metadata)?,
    )?;

    let state = AppState::new(config);
    let id = upsert_lesson(
        state.embedder.as_ref(),
        state.store.as_ref(),
        &state.config.namespace,
        lesson,
    )
    .await?;

    println!("Upserted lesson {}", id);
    Ok(())
}
