//! Crypto news agent CLI
//!
//! # Usage
//!
//! ```bash
//! # Keys are read from the environment or a .env file
//! export NEWSAPI_KEY="..."
//! export FINANCIAL_DATASETS_API_KEY="..."
//!
//! crypto-news ask "What's the price of bitcoin?"
//! crypto-news chat --multi
//! crypto-news collect --now
//! ```

mod display;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use newsagent::api::regulations::format_top_documents;
use newsagent::chart::{DEFAULT_CHART_DAYS, DEFAULT_CHART_TICKER, TextChartRenderer, graph_reply};
use newsagent::collector::{CollectionJob, Scheduler};
use newsagent::llm::ChatModel;
use newsagent::sentiment::LexiconScorer;
use newsagent::summarizer::{ExtractiveSummarizer, LlmSummarizer, Summarizer};
use newsagent::{
    DataSource, LiveDataSource, MultiAgentOrchestrator, NewsAgentConfig, QueryRouter,
    SentimentScorer,
};
use newsagent_core::{Agent, ChatLog};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "crypto-news")]
#[command(about = "Crypto news, prices and sentiment from the command line", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one question with the keyword router
    Ask {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Answer one question with the multi-tool orchestrator
    Multi {
        #[arg(required = true)]
        query: Vec<String>,

        /// Let the LLM pick the tool
        #[arg(long)]
        llm_select: bool,
    },

    /// Interactive chat session
    Chat {
        /// Use the multi-tool orchestrator instead of the keyword router
        #[arg(long)]
        multi: bool,

        /// Let the LLM pick the tool (with --multi)
        #[arg(long)]
        llm_select: bool,
    },

    /// Latest news with per-article sentiment
    Dashboard,

    /// Price history with news events
    Graph {
        #[arg(long, default_value = DEFAULT_CHART_TICKER)]
        ticker: String,

        #[arg(long, default_value_t = DEFAULT_CHART_DAYS)]
        days: u32,
    },

    /// Top documents from Regulations.gov
    Regulations {
        #[arg(long, default_value = "crypto")]
        query: String,

        #[arg(long, default_value_t = 5)]
        limit: u32,
    },

    /// Collect and summarize news on a schedule until Ctrl+C
    Collect {
        /// Run the first collection right away
        #[arg(long)]
        now: bool,
    },

    /// Show which keys and settings are loaded
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = newsagent_utils::load_dotenv();
    newsagent_utils::init_tracing();
    dotenv.log();

    let args = Args::parse();
    let config = NewsAgentConfig::from_env().context("invalid configuration")?;

    match args.command {
        Command::Config => show_config(&config),
        Command::Ask { query } => {
            let router = build_router(&config)?;
            println!("{}", router.respond(&query.join(" ")).await);
        }
        Command::Multi { query, llm_select } => {
            let orchestrator = build_orchestrator(&config, llm_select)?;
            println!("{}", orchestrator.ask(&query.join(" ")).await);
        }
        Command::Chat { multi, llm_select } => {
            let agent: Box<dyn Agent> = if multi {
                Box::new(build_orchestrator(&config, llm_select)?)
            } else {
                Box::new(build_router(&config)?)
            };
            run_repl(agent.as_ref()).await?;
        }
        Command::Dashboard => dashboard(&config).await?,
        Command::Graph { ticker, days } => {
            let source = LiveDataSource::from_config(&config)?;
            let reply = graph_reply(
                &source,
                &ticker,
                days,
                Local::now().date_naive(),
                &TextChartRenderer::default(),
            )
            .await;
            println!("{reply}");
        }
        Command::Regulations { query, limit } => {
            let source = LiveDataSource::from_config(&config)?;
            let documents = source.fetch_regulatory_news(&query, limit).await;
            print!("{}", format_top_documents(&documents));
        }
        Command::Collect { now } => {
            let source: Arc<dyn DataSource> = Arc::new(LiveDataSource::from_config(&config)?);
            let job = CollectionJob::new(source, summarizer(&config));
            let runs = Scheduler::from_config(&config)
                .run_immediately(now)
                .run_until(&job, async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await;
            info!("Collector finished after {runs} run(s)");
        }
    }

    Ok(())
}

fn summarizer(config: &NewsAgentConfig) -> Arc<dyn Summarizer> {
    match ChatModel::from_config(config) {
        Some(model) => Arc::new(LlmSummarizer::new(model)),
        None => Arc::new(ExtractiveSummarizer),
    }
}

fn build_router(config: &NewsAgentConfig) -> anyhow::Result<QueryRouter> {
    let source = Arc::new(LiveDataSource::from_config(config)?);
    Ok(QueryRouter::new(
        source,
        Arc::new(LexiconScorer::new()),
        summarizer(config),
        Arc::new(TextChartRenderer::default()),
    ))
}

fn build_orchestrator(
    config: &NewsAgentConfig,
    llm_select: bool,
) -> anyhow::Result<MultiAgentOrchestrator> {
    let source = Arc::new(LiveDataSource::from_config(config)?);
    let model = ChatModel::from_config(config);
    Ok(MultiAgentOrchestrator::from_config(
        config, source, model, llm_select,
    )?)
}

async fn dashboard(config: &NewsAgentConfig) -> anyhow::Result<()> {
    let source = LiveDataSource::from_config(config)?;
    let articles = source.fetch_news().await;
    if articles.is_empty() {
        println!("No news articles available.");
        return Ok(());
    }

    let scorer = LexiconScorer::new();
    let rows: Vec<_> = articles
        .into_iter()
        .map(|article| {
            let result = scorer.score_article(&article);
            (article, result)
        })
        .collect();

    println!("{}", display::dashboard_table(&rows));
    println!("{}", display::label_breakdown(&rows));

    let overall: Vec<_> = rows.into_iter().map(|(article, _)| article).collect();
    if let Some(result) = scorer.score_articles(&overall) {
        println!("\n{}", result.format());
    }
    Ok(())
}

fn show_config(config: &NewsAgentConfig) {
    println!("{}", display::key_table(&config.key_report()));
    println!();
    println!("Model:               {}", config.openai_model);
    println!("News query:          {}", config.news_query);
    println!("Articles file:       {}", config.articles_path.display());
    println!("Collection interval: {:?}", config.collection_interval);
    println!("Poll interval:       {:?}", config.poll_interval);
}

fn print_banner(agent: &dyn Agent) {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                     Crypto News Agent                        ║
║                                                              ║
║  Ask about prices, news, sentiment or summaries:             ║
║    "What's the price of bitcoin?"                            ║
║    "What's the sentiment on crypto today?"                   ║
║    "Show me the bitcoin graph"                               ║
║                                                              ║
║  Commands:                                                   ║
║    /history  - Show this session                             ║
║    /exit     - Exit                                          ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
    println!("Agent: {}\n", agent.name());
}

async fn run_repl(agent: &dyn Agent) -> anyhow::Result<()> {
    print_banner(agent);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = ChatLog::new();

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        let input = input.trim();
        match input {
            "" => continue,
            "/exit" | "/quit" => {
                println!("Goodbye!");
                break;
            }
            "/history" => {
                for turn in session.turns() {
                    println!("[{}] {}", turn.role.as_str(), turn.content);
                }
                continue;
            }
            _ => {}
        }

        match agent.process(input, &mut session).await {
            Ok(reply) => println!("\nAgent: {}\n", reply),
            Err(e) => eprintln!("\nError: {}\n", e),
        }
    }

    Ok(())
}
