use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod serve;

#[derive(Parser, Debug)]
#[command(name = "askpipe")]
#[command(about = "Multi-source search assistant with local LLM synthesis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one query from the command line.
    Ask(AskCmd),
    /// Run the interactive web front end.
    Serve(ServeCmd),
    /// Diagnose configuration (json; no secrets).
    Doctor,
    /// Print version info.
    Version,
}

#[derive(clap::Args, Debug)]
struct AskCmd {
    /// The question to answer.
    query: String,
    /// Skip the primary/fallback web search.
    #[arg(long)]
    no_web: bool,
    /// Skip the Wikipedia search.
    #[arg(long)]
    no_wiki: bool,
    /// Also print the evidence JSON to stdout.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct ServeCmd {
    /// Port to listen on.
    #[arg(long, env = "ASKPIPE_PORT", default_value_t = 7860)]
    port: u16,
}

/// Install the process-wide log sinks: stderr plus an append-only file.
/// Library crates only emit events; this is the one place a subscriber is
/// configured.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", "askpipe.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}

fn doctor_report() -> serde_json::Value {
    let google = askpipe_local::google::GoogleConfig::from_env();
    let wikipedia = askpipe_local::wikipedia::WikipediaConfig::from_env();
    let duckduckgo = askpipe_local::duckduckgo::DuckDuckGoConfig::from_env();
    let ollama = askpipe_local::ollama::OllamaConfig::from_env();

    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "google": {
            "endpoint": google.endpoint,
            "num_results": google.num_results,
            "delay_ms": { "min": google.delay_ms.0, "max": google.delay_ms.1 },
        },
        "wikipedia": { "endpoint": wikipedia.endpoint },
        "duckduckgo": { "endpoint": duckduckgo.endpoint },
        "ollama": { "base_url": ollama.base_url, "model": ollama.model },
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    match cli.command {
        Commands::Ask(cmd) => {
            let pipeline = askpipe_local::pipeline_from_env()?;
            let (answer, evidence) = pipeline.run(&cmd.query, !cmd.no_web, !cmd.no_wiki).await;
            println!("{answer}");
            if cmd.json {
                println!("{evidence}");
            }
        }
        Commands::Serve(cmd) => {
            serve::run(cmd.port).await?;
        }
        Commands::Doctor => {
            println!("{}", serde_json::to_string_pretty(&doctor_report())?);
        }
        Commands::Version => {
            println!("askpipe {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
