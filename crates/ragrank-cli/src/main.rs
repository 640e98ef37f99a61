//! ragrank CLI - Run the passage ranking pipeline over saved search results.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ragrank_core::{
    Passage, Preset, QueryRewriter, RankConfig, RankError, Result, SearchBackend,
};
use ragrank_query::{
    normalize_query, score, FixedRewriter, PassthroughRewriter, RetrievalEngine,
};

/// ragrank - Score, merge and filter search passages for a RAG prompt
#[derive(Parser)]
#[command(name = "ragrank")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/ragrank/config.toml, then ./ragrank.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Named preset: balanced, high-precision or high-recall
    #[arg(short, long, global = true)]
    preset: Option<Preset>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full retrieval turn over a JSON file of passages
    Rank {
        /// JSON array of passages
        file: PathBuf,

        /// The user's query
        #[arg(short, long)]
        query: String,

        /// Rewritten query, as a model would return it
        #[arg(short, long)]
        rewritten: Option<String>,

        /// Minimum content length (overrides config)
        #[arg(long)]
        min_length: Option<usize>,

        /// Maximum number of passages (overrides config)
        #[arg(long)]
        max_documents: Option<usize>,
    },

    /// Print the score of each passage in a JSON file
    Score {
        /// JSON array of passages
        file: PathBuf,
    },

    /// Normalize a rewritten query
    Normalize {
        /// Raw rewritten query
        raw: String,

        /// The user's original query
        #[arg(short, long)]
        original: String,
    },

    /// Print the effective configuration
    Config,
}

/// Search backend answering every query with the passages of one file.
struct JsonFileBackend {
    path: PathBuf,
}

#[async_trait]
impl SearchBackend for JsonFileBackend {
    async fn retrieve(&self, _query: &str) -> Result<Vec<Passage>> {
        load_passages(&self.path)
    }
}

fn load_passages(path: &Path) -> Result<Vec<Passage>> {
    let content = fs::read_to_string(path).map_err(|e| {
        RankError::search(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>, preset: Option<Preset>) -> Result<RankConfig> {
    let mut config = match path {
        Some(path) => RankConfig::load(path)?,
        None => RankConfig::load_default()?,
    };

    if let Some(preset) = preset {
        config.document = ragrank_core::DocumentConfig::preset(preset);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref(), cli.preset)?;

    match cli.command {
        Commands::Rank {
            file,
            query,
            rewritten,
            min_length,
            max_documents,
        } => {
            if let Some(min_length) = min_length {
                config.document.min_content_length = min_length;
            }
            if let Some(max_documents) = max_documents {
                config.document.max_documents = max_documents;
            }
            rank(config, file, &query, rewritten).await?;
        }
        Commands::Score { file } => {
            score_file(&config, &file)?;
        }
        Commands::Normalize { raw, original } => {
            let normalized = normalize_query(&raw, &original, &config.query);
            println!("{}", normalized.query);
            eprintln!("({})", normalized.outcome);
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn rank(
    config: RankConfig,
    file: PathBuf,
    query: &str,
    rewritten: Option<String>,
) -> Result<()> {
    let rewriter: Arc<dyn QueryRewriter> = match rewritten {
        Some(text) => Arc::new(FixedRewriter::new(text)),
        None => Arc::new(PassthroughRewriter),
    };
    let engine = RetrievalEngine::new(Arc::new(JsonFileBackend { path: file }), rewriter, config);

    let outcome = engine.run_turn(&[], query).await?;

    if outcome.passages.is_empty() {
        eprintln!("No passages passed the quality filter.");
    }

    println!("{}", serde_json::to_string_pretty(&outcome.passages)?);
    eprintln!("Search query: {}", outcome.query);
    eprintln!("{}", serde_json::to_string_pretty(&outcome.metrics)?);

    Ok(())
}

fn score_file(config: &RankConfig, file: &Path) -> Result<()> {
    let passages = load_passages(file)?;

    for passage in &passages {
        println!(
            "{:>6.2}  {:<10}  {}",
            score(passage, &config.document.scoring),
            passage.display_confidence(),
            passage.group_key()
        );
    }

    Ok(())
}
