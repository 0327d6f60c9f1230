//! 市场调研执行器：单agent、单任务，同步执行并持久化调研摘要

use std::path::PathBuf;

use super::artifact::ArtifactStore;
use super::context::PipelineContext;
use super::error::ResearchError;

/// 调研agent的角色设定
const RESEARCH_AGENT_PREAMBLE: &str = "You are a Research Assistant, an AI specialist in market research. \
Your goal is to gather detailed market insights and present them as a detailed summary in plain text format.";

/// 构建调研任务描述，固定模板按 category/subcategory 参数化
fn build_research_task(category: &str, subcategory: &str) -> String {
    format!(
        "Research market trends for {category}/{subcategory} including trends over the last 5 years, \
companies performing well, competition, demand, economic factors, consumer demographics such as age \
and income groups, brands available in the market and their performance, market sentiment, and both \
quantitative and qualitative analysis.\n\n\
Expected output: a detailed summary of market trends in plain text format."
    )
}

/// 执行市场调研并把摘要写入文档存储，返回文档路径
pub async fn run_market_research(
    context: &PipelineContext,
    store: &ArtifactStore,
    category: &str,
    subcategory: &str,
) -> Result<PathBuf, ResearchError> {
    println!("🔍 正在执行市场调研: {}/{}", category, subcategory);

    let task = build_research_task(category, subcategory);
    let summary = context
        .llm_client
        .prompt(RESEARCH_AGENT_PREAMBLE, &task)
        .await
        .map_err(ResearchError::Upstream)?;

    if summary.trim().is_empty() {
        return Err(ResearchError::Upstream(anyhow::anyhow!(
            "model returned an empty research summary for {}/{}",
            category,
            subcategory
        )));
    }

    let path = store.save(category, subcategory, &summary)?;
    println!("💾 市场调研数据已保存: {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_task_parameterization() {
        let task = build_research_task("Electronics", "Tablets");
        assert!(task.contains("Electronics/Tablets"));
    }

    #[test]
    fn test_research_task_coverage() {
        // 任务模板必须覆盖全部固定调研维度
        let task = build_research_task("Fitness", "Gym Equipment");
        for facet in [
            "trends over the last 5 years",
            "competition",
            "demand",
            "economic factors",
            "consumer demographics",
            "brands available in the market",
            "market sentiment",
            "quantitative and qualitative analysis",
        ] {
            assert!(task.contains(facet), "missing facet: {}", facet);
        }
    }
}
