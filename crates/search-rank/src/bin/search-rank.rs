use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use search_rank::pipeline::Orchestrator;
use search_rank::prelude::*;
use search_retrieve::{Query, SearchRequest, Strategy};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search query against the bundled in-memory fixture corpus.
    Search {
        query: String,
        /// Strategies to dispatch, comma-separated (dense, fts, graph).
        #[arg(long, value_delimiter = ',', default_values_t = vec!["dense".to_string(), "fts".to_string()])]
        strategies: Vec<String>,
        #[arg(long, default_value_t = 5)]
        top_k: usize,
        /// Stream every matching hit rather than the fused/reranked top-k.
        #[arg(long)]
        systematic: bool,
    },
    /// Start the HTTP surface (`/search`, `/search/systematic`, `/health`).
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = search_config::AppConfig::load().context("failed to load configuration")?;
    let orchestrator = Arc::new(build_orchestrator(&config));

    match cli.command {
        Commands::Search {
            query,
            strategies,
            top_k,
            systematic,
        } => run_search(&orchestrator, query, strategies, top_k, systematic).await?,
        Commands::Serve { port } => {
            search_rank::http::serve(orchestrator, port)
                .await
                .context("HTTP server exited with an error")?;
        }
    }

    Ok(())
}

fn build_orchestrator(config: &search_config::AppConfig) -> Orchestrator {
    use search_rank::mocks::{MockEmbedder, MockFtsStore, MockGraphStore, MockVectorStore};
    use search_retrieve::prelude::{DenseRetriever, GraphRetriever, SparseRetriever};

    let embedder = Arc::new(MockEmbedder::new(config.embedding.context_length.min(64)));
    let vector_store = Arc::new(MockVectorStore::with_fixture_corpus(embedder.dimension()));
    let fts_store = Arc::new(MockFtsStore::with_fixture_corpus());
    let graph_store = Arc::new(MockGraphStore::with_fixture_graph());

    Orchestrator::builder()
        .with_dense(Arc::new(DenseRetriever::new(embedder, vector_store)))
        .with_sparse(Arc::new(SparseRetriever::new(fts_store)))
        .with_graph(Arc::new(GraphRetriever::new(graph_store)))
        .build()
}

fn parse_strategy(s: &str) -> Result<Strategy> {
    match s.trim().to_lowercase().as_str() {
        "dense" => Ok(Strategy::Dense),
        "fts" | "sparse" => Ok(Strategy::Fts),
        "graph" => Ok(Strategy::Graph),
        other => anyhow::bail!("unknown strategy: {other}"),
    }
}

async fn run_search(
    orchestrator: &Orchestrator,
    query: String,
    strategies: Vec<String>,
    top_k: usize,
    systematic: bool,
) -> Result<()> {
    let strategies = strategies
        .iter()
        .map(|s| parse_strategy(s))
        .collect::<Result<Vec<_>>>()?;

    let mut request = SearchRequest::new(Query::Text(query), strategies);
    request.top_k = top_k;

    if systematic {
        use futures::StreamExt;
        let stream = orchestrator.execute_systematic(&request);
        futures::pin_mut!(stream);
        let mut count = 0usize;
        while let Some(hit) = stream.next().await {
            let hit = hit?;
            println!("{}", serde_json::to_string(&hit)?);
            count += 1;
        }
        eprintln!("{count} hits streamed");
    } else {
        let response = orchestrator.execute(&request).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}
