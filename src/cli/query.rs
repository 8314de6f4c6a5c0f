use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use crate::ai::tools::LessonRetrieval;
use crate::api::AppState;
use crate::core::AppConfig;
use crate::lessons::LessonFilter;

pub async fn run(term: &str, lesson_ids: &[String], limit: usize, config: AppConfig) -> Result<()> {
    let state = AppState::new(config);
    let filter = LessonFilter::from_lesson_ids(lesson_ids);
    let retrieval = LessonRetrieval {
        embedder: Arc::clone(&state.embedder),
        store: Arc::clone(&state.store),
        namespace: state.config.namespace.clone(),
        top_k: limit,
        filter: filter.clone(),
    };
    let results = retrieval.search(term).await?;
    println!(
        "{}",
        json!({
            "query": term,
            "filter": filter,
            "results": results,
        })
    );
    Ok(())
}
