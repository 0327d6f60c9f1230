//! API路由：欢迎页、品类目录、调研问卷生成

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::pipeline::{self, ResearchError, ResearchRequest};
use crate::server::AppState;
use crate::taxonomy;

type AppStateArc = Arc<AppState>;

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(index))
        .route("/categories", get(categories))
        .route("/research", post(research))
}

/// `GET /` 静态欢迎信息与端点索引
async fn index() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Market Research API",
        "endpoints": {
            "Generate Questions": "/research",
            "View Categories": "/categories"
        }
    }))
}

/// `GET /categories` 静态品类目录
async fn categories() -> Json<Value> {
    Json(taxonomy::catalog_as_json())
}

/// `POST /research` 执行完整流水线：调研、落盘、问卷生成
async fn research(
    State(state): State<AppStateArc>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<Value>, ApiError> {
    info!(
        "Research request: {}/{} ({} questions)",
        request.category, request.subcategory, request.num_questions
    );

    let outcome = pipeline::execute(&state.context, &request)
        .await
        .map_err(|e| {
            error!("Research pipeline failed ({}): {}", e.kind(), e);
            ApiError(e)
        })?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "questions": outcome.questions,
            "metadata": outcome.metadata
        }
    })))
}

/// 流水线错误到HTTP响应的映射。
/// 封闭的错误分类对应不同状态码，响应体同时携带可读detail与机器可读kind。
pub struct ApiError(pub ResearchError);

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            ResearchError::Config(_) | ResearchError::Persist { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ResearchError::InvalidRequest(_) | ResearchError::QuestionCountMismatch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ResearchError::ArtifactNotFound(_) | ResearchError::ArtifactEmpty(_) => {
                StatusCode::NOT_FOUND
            }
            ResearchError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "detail": format!("Research generation failed: {}", self.0),
            "kind": self.0.kind()
        });
        (self.status_code(), Json(body)).into_response()
    }
}
