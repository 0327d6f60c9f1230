use std::path::PathBuf;
use thiserror::Error;

/// 调研流水线的封闭错误分类。
/// HTTP边界根据kind映射到不同的状态码，不再把所有异常折叠成500。
#[derive(Debug, Error)]
pub enum ResearchError {
    /// 缺失配置（如API KEY未设置），在流水线启动前检查
    #[error("missing configuration: {0}")]
    Config(String),

    /// 请求参数不合法
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 调研文档目录不存在
    #[error("Directory not found: {0}")]
    ArtifactNotFound(PathBuf),

    /// 调研文档目录存在但没有可读的文档
    #[error("No documents found in {0}")]
    ArtifactEmpty(PathBuf),

    /// 调研文档持久化失败，视为致命错误（问卷生成依赖文档存在）
    #[error("Failed to save research artifact at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 模型回复的问题数量与请求数量不一致，不返回部分结果
    #[error("Failed to generate exactly {expected} questions (got {actual})")]
    QuestionCountMismatch { expected: usize, actual: usize },

    /// 上游LLM调用失败（重试与兜底模型均已耗尽）
    #[error("LLM call failed: {0}")]
    Upstream(anyhow::Error),
}

impl ResearchError {
    /// 机器可读的错误类别，随HTTP错误响应一起返回
    pub fn kind(&self) -> &'static str {
        match self {
            ResearchError::Config(_) => "config",
            ResearchError::InvalidRequest(_) => "invalid_request",
            ResearchError::ArtifactNotFound(_) => "not_found",
            ResearchError::ArtifactEmpty(_) => "empty",
            ResearchError::Persist { .. } => "persist",
            ResearchError::QuestionCountMismatch { .. } => "count_mismatch",
            ResearchError::Upstream(_) => "upstream",
        }
    }
}
