use clap::Parser;
use tracing::info;

use scholar_agent::{config::Config, utils::init_logger, ResearchAgent, SourceMode};

/// Gather, analyze and summarize a topic, then optionally answer questions about it
#[derive(Debug, Parser)]
#[command(name = "scholar-agent", version, about)]
struct Cli {
    /// Topic to research, e.g. "Python (programming language)"
    topic: String,

    /// Also search arXiv and answer questions through the LLM
    #[arg(long)]
    dual: bool,

    /// Question to ask the knowledge base after the run (repeatable)
    #[arg(long = "ask", value_name = "QUESTION")]
    questions: Vec<String>,

    /// Print the gathered source text as well
    #[arg(long)]
    raw: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let mode = if cli.dual {
        SourceMode::DualSource
    } else {
        SourceMode::SingleSource
    };
    info!(mode = %mode, provider = %config.llm.default_provider, "Configuration loaded");

    let agent = ResearchAgent::from_config(mode, &config)?;
    let report = agent.run_pipeline(&cli.topic).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if cli.raw {
            println!("== Gathered ==\n{}\n", report.gathered);
        }
        println!("== Analysis ==\n{}\n", report.analysis.trim());
        println!("== Summary ==\n{}", report.summary.trim());
    }

    if !cli.questions.is_empty() {
        agent.enrich_knowledge_base(&report.gathered).await?;
        agent.enrich_knowledge_base(&report.summary).await?;

        for question in &cli.questions {
            let answer = agent.query_knowledge_base(question).await?;
            println!("\n== {} ==\n{}", question, answer.trim());
        }
    }

    Ok(())
}
