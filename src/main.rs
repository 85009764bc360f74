use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use staj_assistant::{chat_model, generation_config, init_tracing, render_mode, styled_output};
use staj_cli::{
    AssistantConfig, EmbedderKind, RAG_SYSTEM_PROMPT, SessionLoop, ToolCallingAgent,
    display_banner, print_info, print_ready_hint, print_success, print_warning,
};
use staj_core::Embedder;
use staj_gemini::{GeminiConfig, GeminiEmbedder};
use staj_rag::{DocumentLoader, HashEmbedder, LocalVectorStore, ingest_folder};
use staj_tools::{DuckDuckGoProvider, ToolRegistry};

#[derive(Parser)]
#[command(name = "staj")]
#[command(about = "GTÜ internship assistant backed by Gemini and a local document index", long_about = None)]
struct Cli {
    /// Folder with the internship documents (.pdf, .html, .txt)
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Directory of the persistent document index
    #[arg(long)]
    db_dir: Option<PathBuf>,

    /// Gemini model id
    #[arg(short, long)]
    model: Option<String>,

    /// Print replies without Markdown rendering
    #[arg(long)]
    raw: bool,

    /// Answer one question and exit
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let interactive = cli.query.is_none();

    let mut config = AssistantConfig::from_env()?;
    if let Some(docs_dir) = cli.docs_dir {
        config.docs_dir = docs_dir;
    }
    if let Some(db_dir) = cli.db_dir {
        config.db_dir = db_dir;
    }

    let gemini = GeminiConfig::from_env()?;
    let model = chat_model(&gemini, cli.model)?;

    let embedder: Arc<dyn Embedder> = match config.embedder {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new()),
        EmbedderKind::Gemini => Arc::new(GeminiEmbedder::new(gemini.clone())?),
    };

    if interactive {
        display_banner("GTÜ Staj Asistanı", &[]);
        print_info("Dokümanlar yükleniyor...");
    }

    let store = Arc::new(LocalVectorStore::open_or_create(&config.db_dir, embedder).await?);
    info!(origin = ?store.origin(), db = %config.db_dir.display(), "Vector store ready");
    if interactive {
        print_info(store.origin().message());
    }
    let summary = ingest_folder(&DocumentLoader::new(&config.docs_dir), &store).await?;

    info!(
        added = summary.added,
        failed = summary.failed,
        chunks = store.len(),
        "Startup ingest finished"
    );
    if interactive {
        if summary.added > 0 {
            print_success(&summary.message());
        } else {
            print_warning(&summary.message());
        }
    }

    let tools = ToolRegistry::rag_tools(store, Arc::new(DuckDuckGoProvider::new()?));
    let agent = ToolCallingAgent::new(model, tools, RAG_SYSTEM_PROMPT)
        .with_config(generation_config(&gemini));
    let session = SessionLoop::new(agent)
        .with_render_mode(render_mode(cli.raw))
        .with_styles(styled_output());

    if let Some(question) = cli.query {
        println!("{}", session.ask(&question).await?);
        return Ok(());
    }

    print_ready_hint();
    let stats = session.run(io::stdin().lock(), &mut io::stdout()).await?;
    info!(dispatched = stats.dispatched, failed = stats.failed, "Session ended");

    Ok(())
}
