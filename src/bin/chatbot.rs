use anyhow::Result;
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing::info;

use staj_assistant::{chat_model, generation_config, init_tracing, render_mode, styled_output};
use staj_cli::{CHATBOT_SYSTEM_PROMPT, SessionLoop, ToolCallingAgent};
use staj_gemini::GeminiConfig;
use staj_tools::{DuckDuckGoProvider, ToolRegistry};

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(about = "Concise Gemini assistant with web search", long_about = None)]
struct Cli {
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

    let gemini = GeminiConfig::from_env()?;
    let model = chat_model(&gemini, cli.model)?;
    let tools = ToolRegistry::basic_tools(Arc::new(DuckDuckGoProvider::new()?));

    let agent = ToolCallingAgent::new(model, tools, CHATBOT_SYSTEM_PROMPT)
        .with_config(generation_config(&gemini));
    let session = SessionLoop::new(agent)
        .with_prompt(">>")
        .with_render_mode(render_mode(cli.raw))
        .with_styles(styled_output());

    if let Some(question) = cli.query {
        println!("{}", session.ask(&question).await?);
        return Ok(());
    }

    let stats = session.run(io::stdin().lock(), &mut io::stdout()).await?;
    info!(dispatched = stats.dispatched, failed = stats.failed, "Session ended");

    Ok(())
}
