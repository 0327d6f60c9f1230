//! HTTP服务：对外暴露调研流水线

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::pipeline::PipelineContext;

pub mod routes;

/// 各handler共享的应用状态
pub struct AppState {
    pub context: PipelineContext,
}

impl AppState {
    pub fn new(context: PipelineContext) -> Self {
        Self { context }
    }
}

/// 组装路由。CORS全放行。
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 启动HTTP服务。API KEY缺失在启动时即失败，而不是等到第一个请求。
pub async fn run(config: Config) -> Result<()> {
    config.llm.ensure_api_key()?;

    let addr = config.server.bind_addr();
    let context = PipelineContext::new(config)?;
    let state = Arc::new(AppState::new(context));

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// Include tests
#[cfg(test)]
mod tests;
