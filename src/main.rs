use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod llm;
mod pipeline;
mod server;
mod taxonomy;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    match args.command {
        cli::Command::Serve(serve_args) => {
            let config = serve_args.into_config();
            init_tracing(config.verbose);
            server::run(config).await
        }
        cli::Command::Research(research_args) => cli::run_research(research_args).await,
    }
}

/// 初始化日志订阅器，RUST_LOG优先于verbose开关
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
