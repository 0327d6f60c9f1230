use tempfile::TempDir;

use surveyforge_rs::config::Config;
use surveyforge_rs::pipeline::questions::{parse_numbered_reply, validate_questions};
use surveyforge_rs::pipeline::{
    ArtifactStore, PipelineContext, ResearchError, ResearchRequest, execute,
};

/// 构建指向临时目录的测试配置，不触达LLM服务
fn test_config(temp_dir: &TempDir, api_key: &str) -> Config {
    let mut config = Config::default();
    config.research_data_root = temp_dir.path().to_path_buf();
    config.llm.api_key = api_key.to_string();
    config
}

fn sample_request(num_questions: u32) -> ResearchRequest {
    ResearchRequest {
        objective: "Understand tablet demand".to_string(),
        category: "Electronics".to_string(),
        subcategory: "Tablets".to_string(),
        age: "25-34".to_string(),
        income: "50k-75k".to_string(),
        location: "Berlin".to_string(),
        num_questions,
    }
}

#[test]
fn test_artifact_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    // 首次读取：目录不存在
    let err = store.load_combined("Electronics", "Tablets").unwrap_err();
    assert!(matches!(err, ResearchError::ArtifactNotFound(_)));

    // 写入后可读取，且内容带固定头部
    store
        .save("Electronics", "Tablets", "Tablet market is expanding.")
        .unwrap();
    let combined = store.load_combined("Electronics", "Tablets").unwrap();
    assert!(combined.starts_with("Market Research Summary:"));
    assert!(combined.contains("Tablet market is expanding."));

    // 再次运行覆盖历史文档
    store
        .save("Electronics", "Tablets", "Revised research run.")
        .unwrap();
    let combined = store.load_combined("Electronics", "Tablets").unwrap();
    assert!(combined.contains("Revised research run."));
    assert!(!combined.contains("Tablet market is expanding."));
}

#[test]
fn test_artifact_roundtrip_with_bracketed_category() {
    // 品类名中的通配字符不得影响已落盘文档的读取
    let temp_dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp_dir.path());

    store
        .save("Electronics [US]", "Tablets", "US tablet market data")
        .unwrap();
    let combined = store.load_combined("Electronics [US]", "Tablets").unwrap();
    assert!(combined.contains("US tablet market data"));
}

#[tokio::test]
async fn test_pipeline_rejects_invalid_request_before_any_work() {
    let temp_dir = TempDir::new().unwrap();
    let context = PipelineContext::new(test_config(&temp_dir, "test-key")).unwrap();

    let err = execute(&context, &sample_request(0)).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_request");

    // 参数校验失败时不应产生任何落盘文档
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_pipeline_rejects_missing_api_key() {
    let temp_dir = TempDir::new().unwrap();
    let context = PipelineContext::new(test_config(&temp_dir, "")).unwrap();

    let err = execute(&context, &sample_request(10)).await.unwrap_err();
    assert_eq!(err.kind(), "config");
}

#[test]
fn test_parsed_reply_passes_quality_validation() {
    let reply = "1. How likely are you to buy a tablet in the next 6 months?\n\
                 2. Which tablet features matter most to you?\n\
                 3. What price range do you consider reasonable for a tablet?";
    let questions = parse_numbered_reply(reply, 3);
    assert_eq!(questions.len(), 3);

    let report = validate_questions(&questions, 3);
    assert!(report.is_valid());
}

#[test]
fn test_short_reply_yields_count_mismatch_material() {
    // 模型只给出 N-1 条合规行时，解析结果不足额，生成路径必须整体失败
    let reply = "1. How likely are you to buy a tablet in the next 6 months?\n\
                 2. Which tablet features matter most to you?";
    let questions = parse_numbered_reply(reply, 3);
    assert_eq!(questions.len(), 2);

    let report = validate_questions(&questions, 3);
    assert!(!report.correct_count);
}
