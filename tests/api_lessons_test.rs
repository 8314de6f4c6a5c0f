//! Integration tests for the lesson upsert and lookup endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use axum::http::StatusCode;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use crate::test_utils::{get_json, post_json, post_raw, test_app};

    /// Tests upserting a lesson without an ID generates one and stores
    /// the original content
    #[tokio::test]
    async fn it_upserts_a_lesson_with_a_generated_id() {
        let t = test_app();

        let (status, body) =
            post_json(&t.app, "/upsert-lesson", json!({"content": "## Topic A"})).await;

        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap();
        assert!(!id.is_empty());
        assert!(body["message"].as_str().unwrap().contains(id));

        let record = t.store.get("lessons", id).unwrap();
        assert_eq!(record.metadata["content"], "## Topic A");
        assert_eq!(record.metadata["id"], id);
    }

    /// Tests the stored record can be fetched back by the generated ID
    #[tokio::test]
    async fn it_fetches_an_upserted_lesson() {
        let t = test_app();

        let (_, body) = post_json(&t.app, "/upsert-lesson", json!({"content": "## Topic A"})).await;
        let id = body["id"].as_str().unwrap().to_string();

        let (status, body) = get_json(&t.app, &format!("/lessons/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);
        assert_eq!(body["metadata"]["content"], "## Topic A");
    }

    /// Tests fetching a lesson that was never stored
    #[tokio::test]
    async fn it_returns_404_for_unknown_lessons() {
        let t = test_app();

        let (status, body) = get_json(&t.app, "/lessons/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    /// Tests two upserts without IDs get different IDs
    #[tokio::test]
    async fn it_generates_distinct_ids() {
        let t = test_app();

        let (_, first) = post_json(&t.app, "/upsert-lesson", json!({"content": "one"})).await;
        let (_, second) = post_json(&t.app, "/upsert-lesson", json!({"content": "two"})).await;

        assert_ne!(first["id"], second["id"]);
        assert_eq!(t.store.upserts.load(Ordering::SeqCst), 2);
    }

    /// Tests a supplied string ID is used as is
    #[tokio::test]
    async fn it_keeps_supplied_ids() {
        let t = test_app();

        let (status, body) = post_json(
            &t.app,
            "/upsert-lesson",
            json!({"id": "lesson-1001", "content": "Fractions"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "lesson-1001");
        assert!(t.store.get("lessons", "lesson-1001").is_some());
    }

    /// Tests numeric IDs are stored as strings
    #[tokio::test]
    async fn it_stringifies_numeric_ids() {
        let t = test_app();

        let (status, body) =
            post_json(&t.app, "/upsert-lesson", json!({"id": 1001, "content": "Fractions"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "1001");
        assert!(t.store.get("lessons", "1001").is_some());

        let (_, body) =
            post_json(&t.app, "/upsert-lesson", json!({"id": 2002.0, "content": "Decimals"})).await;
        assert_eq!(body["id"], "2002");
        assert!(t.store.get("lessons", "2002").is_some());
    }

    /// Tests upserting the same ID twice overwrites the record
    #[tokio::test]
    async fn it_overwrites_existing_lessons() {
        let t = test_app();

        post_json(&t.app, "/upsert-lesson", json!({"id": "7", "content": "old"})).await;
        post_json(&t.app, "/upsert-lesson", json!({"id": "7", "content": "new"})).await;

        assert_eq!(t.store.records.lock().len(), 1);
        assert_eq!(t.store.get("lessons", "7").unwrap().metadata["content"], "new");
    }

    /// Tests missing or empty content is rejected before embedding
    #[tokio::test]
    async fn it_rejects_missing_content() {
        let t = test_app();

        for payload in [
            json!({}),
            json!({"content": ""}),
            json!({"content": null}),
            json!({"content": 42}),
            json!({"id": "1", "content": ["a"]}),
        ] {
            let (status, body) = post_json(&t.app, "/upsert-lesson", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].is_string());
        }

        assert_eq!(t.embedder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(t.store.upserts.load(Ordering::SeqCst), 0);
    }

    /// Tests a body that isn't JSON is a validation error
    #[tokio::test]
    async fn it_rejects_malformed_json() {
        let t = test_app();

        let (status, body) = post_raw(&t.app, "/upsert-lesson", "{\"content\": ".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    /// Tests whitespace only content fails at the embedding step
    #[tokio::test]
    async fn it_fails_on_whitespace_only_content() {
        let t = test_app();

        let (status, body) =
            post_json(&t.app, "/upsert-lesson", json!({"content": "  \n\t  "})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("embedding"));
        assert_eq!(t.embedder.calls.load(Ordering::SeqCst), 0);
    }

    /// Tests the cleaned content is embedded but the original is stored
    #[tokio::test]
    async fn it_embeds_cleaned_content_and_stores_the_original() {
        let t = test_app();
        let content = "## Topic A\n\n  Adding   fractions\twith like denominators\n";
        let started = Utc::now();

        let (status, body) =
            post_json(&t.app, "/upsert-lesson", json!({"id": "1001", "content": content})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "1001");

        assert_eq!(
            *t.embedder.inputs.lock(),
            vec!["## Topic A Adding fractions with like denominators".to_string()]
        );
        let record = t.store.get("lessons", "1001").unwrap();
        assert_eq!(record.metadata["content"], content);

        let last_updated: DateTime<Utc> = record.metadata["lastUpdated"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        // Stored with millisecond precision
        assert!(last_updated >= started - chrono::Duration::milliseconds(1));
        assert!(last_updated <= Utc::now());
    }

    /// Tests caller metadata is merged but reserved keys win
    #[tokio::test]
    async fn it_merges_caller_metadata() {
        let t = test_app();

        let (status, _) = post_json(
            &t.app,
            "/upsert-lesson",
            json!({
                "id": "1002",
                "content": "Decimals",
                "metadata": {"subject": "math", "content": "spoofed", "lastUpdated": "never"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let metadata = t.store.get("lessons", "1002").unwrap().metadata;
        assert_eq!(metadata["subject"], "math");
        assert_eq!(metadata["content"], "Decimals");
        assert_ne!(metadata["lastUpdated"], "never");
    }

    /// Tests embedding failures are reported as server errors
    #[tokio::test]
    async fn it_returns_500_when_embedding_fails() {
        let t = test_app();
        t.embedder.fail.store(true, Ordering::SeqCst);

        let (status, body) = post_json(&t.app, "/upsert-lesson", json!({"content": "text"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("embedding service unavailable")
        );
        assert_eq!(t.store.upserts.load(Ordering::SeqCst), 0);
    }

    /// Tests storage failures are reported as server errors
    #[tokio::test]
    async fn it_returns_500_when_storage_fails() {
        let t = test_app();
        t.store.fail_writes.store(true, Ordering::SeqCst);

        let (status, body) = post_json(&t.app, "/upsert-lesson", json!({"content": "text"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("index is read only"));
    }

    /// Tests lessons go to the configured namespace
    #[tokio::test]
    async fn it_uses_the_configured_namespace() {
        let mut config = crate::test_utils::test_config();
        config.namespace = "course-101".to_string();
        let t = crate::test_utils::test_app_with_config(config);

        post_json(&t.app, "/upsert-lesson", json!({"id": "1", "content": "x"})).await;

        assert!(t.store.get("course-101", "1").is_some());
        assert!(t.store.get("lessons", "1").is_none());
    }
}
