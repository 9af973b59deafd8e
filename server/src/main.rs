use anyhow::Result;
use axum::Router;
use clap::Parser;
use docsearch_core::{EngineConfig, EnglishPreprocessor};
use docsearch_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus directory (*.txt)
    #[arg(long, default_value = "./Dataset")]
    corpus: String,
    /// Optional JSON file with engine limits
    #[arg(long)]
    config: Option<String>,
    /// Keep word forms as they are instead of stemming
    #[arg(long, default_value_t = false)]
    no_stem: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let preprocessor = EnglishPreprocessor::new().with_stemming(!args.no_stem);
    let app: Router = build_app(&args.corpus, config, preprocessor)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
