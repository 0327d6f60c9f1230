//! 问卷问题生成：读取调研文档，结合用户画像，通过结构化提取生成精确数量的问题

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactStore;
use super::context::PipelineContext;
use super::error::ResearchError;

/// 结构化提取的目标类型，模型必须返回符合该Schema的响应
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SurveyQuestionSet {
    /// The generated survey questions, in order, one string per question,
    /// without any leading numbering.
    pub questions: Vec<String>,
}

/// 问卷质量报告。独立的质量检查，不在生成路径上自动执行。
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionQualityReport {
    /// 数量与期望一致
    pub correct_count: bool,
    /// 去除首尾空白后均非空
    pub non_empty: bool,
    /// 互不重复
    pub unique: bool,
    /// 每条长度在 10..=200 字符之间
    pub proper_length: bool,
}

impl QuestionQualityReport {
    pub fn is_valid(&self) -> bool {
        self.correct_count && self.non_empty && self.unique && self.proper_length
    }
}

/// 问卷生成的系统提示词
const QUESTION_SYSTEM_PROMPT: &str = "You are a market research expert. Based on the provided research data and context, \
you generate insightful survey questions that help understand customer needs and preferences.\n\n\
Guidelines for questions:\n\
- Mix of quantitative and qualitative questions\n\
- Include questions about:\n\
  * Purchase intent\n\
  * Product features preferences\n\
  * Price sensitivity\n\
  * Brand awareness\n\
  * Usage patterns\n\
  * Pain points\n\
  * Customer satisfaction\n\
  * Competitive comparison\n\
  * Future needs\n\
  * Demographics validation\n\
- Make questions specific to the product category\n\
- Avoid leading or biased questions\n\
- Each question should be clear and focused";

/// 合并调研数据与用户画像为带标签分段的上下文块
fn build_market_context(research_data: &str, user_context: &str) -> String {
    format!(
        "Research Data:\n{}\n\nUser Context:\n{}",
        research_data, user_context
    )
}

/// 构建结构化提取的用户提示词
fn build_extraction_prompt(
    category: &str,
    subcategory: &str,
    full_context: &str,
    num_questions: usize,
) -> String {
    format!(
        "Generate exactly {num_questions} survey questions for {subcategory} in the {category} category. \
Consider the demographic context included below.\n\n\
Return exactly {num_questions} questions.\n\n\
Context:\n{full_context}"
    )
}

/// 构建自由文本回退路径的用户提示词，要求模型输出带编号的问题列表
fn build_numbered_prompt(
    category: &str,
    subcategory: &str,
    full_context: &str,
    num_questions: usize,
) -> String {
    format!(
        "Generate exactly {num_questions} survey questions for {subcategory} in the {category} category, \
numbered 1-{num_questions}, one question per line. Consider the demographic context included below.\n\n\
Context:\n{full_context}"
    )
}

/// 从模型的自由文本回复中解析编号问题列表。
/// 保留以字面数字 1..N 开头的非空行，并剥离行首的 "<编号>. " 前缀。
/// 这是一个顺序敏感的启发式解析，只作为结构化提取失败时的回退。
pub fn parse_numbered_reply(reply: &str, num_questions: usize) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && (1..=num_questions).any(|i| line.starts_with(i.to_string().as_str()))
        })
        .map(|line| match line.split_once(". ") {
            Some((_, rest)) => rest.to_string(),
            None => line.to_string(),
        })
        .collect()
}

/// 独立的问卷质量检查
pub fn validate_questions(questions: &[String], expected_count: usize) -> QuestionQualityReport {
    let mut seen = std::collections::HashSet::new();
    QuestionQualityReport {
        correct_count: questions.len() == expected_count,
        non_empty: questions.iter().all(|q| !q.trim().is_empty()),
        unique: questions.iter().all(|q| seen.insert(q.as_str())),
        proper_length: questions
            .iter()
            .all(|q| (10..=200).contains(&q.chars().count())),
    }
}

/// 生成精确数量的问卷问题。
/// 主路径使用结构化提取（Schema约束），提取彻底失败时回退到编号列表解析。
/// 两条路径都以数量校验收尾，数量不一致即失败，绝不返回部分结果。
pub async fn generate_questions(
    context: &PipelineContext,
    store: &ArtifactStore,
    category: &str,
    subcategory: &str,
    user_context: &str,
    num_questions: usize,
) -> Result<Vec<String>, ResearchError> {
    let research_data = store.load_combined(category, subcategory)?;
    let full_context = build_market_context(&research_data, user_context);

    println!(
        "📝 正在生成问卷问题: {}/{} (期望 {} 条)",
        category, subcategory, num_questions
    );

    let extraction_prompt =
        build_extraction_prompt(category, subcategory, &full_context, num_questions);

    let questions = match context
        .llm_client
        .extract::<SurveyQuestionSet>(QUESTION_SYSTEM_PROMPT, &extraction_prompt)
        .await
    {
        Ok(set) => set
            .questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect::<Vec<_>>(),
        Err(e) => {
            eprintln!("⚠️ 结构化提取失败，回退到编号列表解析: {}", e);
            let numbered_prompt =
                build_numbered_prompt(category, subcategory, &full_context, num_questions);
            let reply = context
                .llm_client
                .prompt(QUESTION_SYSTEM_PROMPT, &numbered_prompt)
                .await
                .map_err(ResearchError::Upstream)?;
            parse_numbered_reply(&reply, num_questions)
        }
    };

    if questions.len() != num_questions {
        return Err(ResearchError::QuestionCountMismatch {
            expected: num_questions,
            actual: questions.len(),
        });
    }

    Ok(questions)
}
