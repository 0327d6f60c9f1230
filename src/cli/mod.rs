use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, LLMProvider};
use crate::pipeline::{ArtifactStore, PipelineContext, research};
use crate::taxonomy;

/// SurveyForge-RS - 由Rust与AI驱动的市场调研问卷生成服务
#[derive(Parser, Debug)]
#[command(name = "surveyforge-rs")]
#[command(
    about = "AI-based market research service. It runs an automated LLM research step for a product category, persists the research summary, and generates an exact-count set of survey questions."
)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 启动市场调研HTTP服务
    Serve(ServeArgs),
    /// 独立执行一次市场调研并落盘（参数缺省时交互式输入）
    Research(ResearchArgs),
}

/// 两个子命令共享的配置参数
#[derive(clap::Args, Debug)]
pub struct CommonArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 调研文档存储根目录
    #[arg(short, long)]
    pub data_root: Option<PathBuf>,

    /// LLM Provider (openai, moonshot, deepseek, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 高能效模型，用于调研摘要与问卷抽取
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，作为抽取失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// 监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// 监听端口
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(clap::Args, Debug)]
pub struct ResearchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// 调研的category
    #[arg(long)]
    pub category: Option<String>,

    /// 调研的subcategory
    #[arg(long)]
    pub subcategory: Option<String>,
}

impl CommonArgs {
    /// 将CLI参数转换为配置。优先级：CLI参数 > 配置文件 > 默认值
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|e| {
                panic!("⚠️ 无法读取配置文件 {:?}: {}", config_path, e)
            })
        } else {
            // 尝试从默认位置加载，不存在则使用默认值
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("surveyforge.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|e| {
                    panic!(
                        "⚠️ 无法读取默认配置文件 {:?}: {}",
                        default_config_path, e
                    )
                })
            } else {
                Config::default()
            }
        };

        // 覆盖配置文件中的设置
        if let Some(data_root) = self.data_root {
            config.research_data_root = data_root;
        }
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }
}

impl ServeArgs {
    /// 将serve子命令的参数转换为配置
    pub fn into_config(self) -> Config {
        let host = self.host.clone();
        let port = self.port;

        let mut config = self.common.into_config();
        if let Some(host) = host {
            config.server.host = host;
        }
        if let Some(port) = port {
            config.server.port = port;
        }
        config
    }
}

/// 独立的市场调研入口：只执行调研与落盘，不生成问卷
pub async fn run_research(args: ResearchArgs) -> Result<()> {
    let ResearchArgs {
        common,
        category,
        subcategory,
    } = args;

    let config = common.into_config();
    config.llm.ensure_api_key()?;

    println!("📚 可用品类:");
    for (name, subs) in taxonomy::CATEGORY_CATALOG {
        println!("   - {}: {}", name, subs.join(", "));
    }

    let category = match category {
        Some(c) => c,
        None => prompt_line("Enter the category (e.g., Electronics): ")?,
    };
    if let Some(subs) = taxonomy::subcategories(&category) {
        println!("   {} 的可选subcategory: {}", category, subs.join(", "));
    }
    let subcategory = match subcategory {
        Some(s) => s,
        None => prompt_line("Enter the subcategory (e.g., Tablets): ")?,
    };
    if category.is_empty() || subcategory.is_empty() {
        bail!("category与subcategory不能为空");
    }

    let context = PipelineContext::new(config)?;
    context.llm_client.check_connection().await?;

    let store = ArtifactStore::new(context.config.research_data_root.clone());
    match research::run_market_research(&context, &store, &category, &subcategory).await {
        Ok(path) => {
            println!("✅ 市场调研完成: {}", path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ 市场调研执行失败: {}", e);
            Err(e.into())
        }
    }
}

/// 打印提示并读取一行标准输入
fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
