#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::pipeline::PipelineContext;
    use crate::server::{AppState, build_router};

    /// 构建不触达LLM服务的测试路由
    fn test_router(temp_dir: &TempDir, api_key: &str) -> Router {
        let mut config = Config::default();
        config.research_data_root = temp_dir.path().to_path_buf();
        config.llm.api_key = api_key.to_string();

        let context = PipelineContext::new(config).unwrap();
        build_router(Arc::new(AppState::new(context)))
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn research_body(num_questions: u32) -> String {
        json!({
            "objective": "Understand tablet demand",
            "category": "Electronics",
            "subcategory": "Tablets",
            "age": "25-34",
            "income": "50k-75k",
            "location": "Berlin",
            "num_questions": num_questions
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_index_route() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_router(&temp_dir, "test-key");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Welcome to Market Research API");
        assert_eq!(body["endpoints"]["Generate Questions"], "/research");
        assert_eq!(body["endpoints"]["View Categories"], "/categories");
    }

    #[tokio::test]
    async fn test_categories_route() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_router(&temp_dir, "test-key");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        let map = body.as_object().unwrap();

        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["Appliances", "Electronics", "Fitness", "Luxury Fashion"]
        );
        assert_eq!(body["Electronics"], json!(["Tablets", "Laptops", "Smartwatches"]));
        assert_eq!(body["Luxury Fashion"], json!(["Apparel", "shoes"]));
    }

    #[tokio::test]
    async fn test_research_rejects_zero_questions() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_router(&temp_dir, "test-key");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/research")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(research_body(0)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        assert_eq!(body["kind"], "invalid_request");
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .starts_with("Research generation failed:")
        );
    }

    #[tokio::test]
    async fn test_research_rejects_missing_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_router(&temp_dir, "");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/research")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(research_body(10)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert_eq!(body["kind"], "config");
    }
}
