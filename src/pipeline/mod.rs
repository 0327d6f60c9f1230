//! 调研流水线：市场调研 → 文档持久化 → 问卷问题生成，严格串行执行

use serde::{Deserialize, Serialize};

pub mod artifact;
pub mod context;
pub mod error;
pub mod questions;
pub mod research;

pub use artifact::ArtifactStore;
pub use context::PipelineContext;
pub use error::ResearchError;

/// 单次请求允许的最大问题数量，保证提取提示词规模可控
pub const MAX_QUESTIONS: u32 = 50;

/// 一次调研请求，随HTTP调用到达，不做持久化
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchRequest {
    pub objective: String,
    pub category: String,
    pub subcategory: String,
    pub age: String,
    pub income: String,
    pub location: String,
    pub num_questions: u32,
}

impl ResearchRequest {
    /// 把用户画像拼装为问卷生成的上下文片段
    pub fn demographic_context(&self) -> String {
        format!(
            "Objective: {}, Age: {}, Income: {}, Location: {}",
            self.objective, self.age, self.income, self.location
        )
    }

    /// 请求参数校验
    pub fn validate(&self) -> Result<(), ResearchError> {
        if self.num_questions == 0 {
            return Err(ResearchError::InvalidRequest(
                "num_questions must be a positive integer".to_string(),
            ));
        }
        if self.num_questions > MAX_QUESTIONS {
            return Err(ResearchError::InvalidRequest(format!(
                "num_questions must not exceed {}",
                MAX_QUESTIONS
            )));
        }
        if self.category.trim().is_empty() || self.subcategory.trim().is_empty() {
            return Err(ResearchError::InvalidRequest(
                "category and subcategory must be non-empty".to_string(),
            ));
        }
        // category/subcategory作为文档路径的组成部分，不允许逃出存储根目录
        if !is_safe_path_component(&self.category) || !is_safe_path_component(&self.subcategory) {
            return Err(ResearchError::InvalidRequest(
                "category and subcategory must not contain path separators or '..'".to_string(),
            ));
        }
        Ok(())
    }
}

/// 校验单个路径组成部分：不含路径分隔符，也不含 `..`
fn is_safe_path_component(value: &str) -> bool {
    !value.contains(['/', '\\']) && !value.contains("..")
}

/// 流水线执行结果：问题列表与元数据
#[derive(Debug, Clone, Serialize)]
pub struct SurveyOutcome {
    pub questions: Vec<String>,
    pub metadata: SurveyMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyMetadata {
    pub category: String,
    pub subcategory: String,
    pub requested_questions: u32,
    pub generated_questions: usize,
}

/// 执行完整流水线。任一阶段失败则整个请求失败，不返回部分结果。
pub async fn execute(
    context: &PipelineContext,
    request: &ResearchRequest,
) -> Result<SurveyOutcome, ResearchError> {
    request.validate()?;
    context
        .config
        .llm
        .ensure_api_key()
        .map_err(|e| ResearchError::Config(e.to_string()))?;

    let store = ArtifactStore::new(context.config.research_data_root.clone());

    // 阶段一：市场调研并落盘
    research::run_market_research(context, &store, &request.category, &request.subcategory)
        .await?;

    // 阶段二：读取调研文档，生成精确数量的问卷问题
    let user_context = request.demographic_context();
    let questions = questions::generate_questions(
        context,
        &store,
        &request.category,
        &request.subcategory,
        &user_context,
        request.num_questions as usize,
    )
    .await?;

    Ok(SurveyOutcome {
        metadata: SurveyMetadata {
            category: request.category.clone(),
            subcategory: request.subcategory.clone(),
            requested_questions: request.num_questions,
            generated_questions: questions.len(),
        },
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> ResearchRequest {
        ResearchRequest {
            objective: "Understand tablet demand".to_string(),
            category: "Electronics".to_string(),
            subcategory: "Tablets".to_string(),
            age: "25-34".to_string(),
            income: "50k-75k".to_string(),
            location: "Berlin".to_string(),
            num_questions: 10,
        }
    }

    #[test]
    fn test_demographic_context() {
        let request = sample_request();
        assert_eq!(
            request.demographic_context(),
            "Objective: Understand tablet demand, Age: 25-34, Income: 50k-75k, Location: Berlin"
        );
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_questions() {
        let mut request = sample_request();
        request.num_questions = 0;
        let err = request.validate().unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }

    #[test]
    fn test_validate_too_many_questions() {
        let mut request = sample_request();
        request.num_questions = MAX_QUESTIONS + 1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_path_traversal() {
        let mut request = sample_request();
        request.category = "../../etc".to_string();
        let err = request.validate().unwrap_err();
        assert_eq!(err.kind(), "invalid_request");

        let mut request = sample_request();
        request.subcategory = "Tablets/../secrets".to_string();
        assert!(request.validate().is_err());

        let mut request = sample_request();
        request.subcategory = "Tablets\\secrets".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_blank_category() {
        let mut request = sample_request();
        request.category = "  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_deserialization() {
        let body = r#"{
            "objective": "launch planning",
            "category": "Fitness",
            "subcategory": "Fitness Trackers",
            "age": "18-24",
            "income": "30k-50k",
            "location": "Oslo",
            "num_questions": 5
        }"#;
        let request: ResearchRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.category, "Fitness");
        assert_eq!(request.num_questions, 5);
    }
}
