use anyhow::Result;

use crate::{config::Config, llm::client::LLMClient};

/// 流水线上下文，每个请求的各阶段共享同一份配置与LLM客户端
#[derive(Clone)]
pub struct PipelineContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
}

impl PipelineContext {
    /// 创建新的流水线上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.llm.clone())?;

        Ok(Self { llm_client, config })
    }
}
