use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use scholar_core::bootstrap::{build_generator, resolve_config_path};
use scholar_core::{AgentDescriptor, AnswerGenerator, BuildReport, Config};
use scholar_llm::any::AnyProvider;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(name = "scholar", version, about = "Study assistant over your course documents")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the index and answer a single question.
    Ask { question: String },
    /// Build the index and answer questions from stdin until `exit` or EOF.
    Chat,
    /// Build the index and print a summary.
    Index,
    /// Print the agent descriptor as JSON.
    AgentCard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_subscriber();

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command {
        Command::AgentCard => {
            println!("{}", AgentDescriptor::from_config(&config).to_json()?);
        }
        Command::Index => {
            let (_, report) = build_generator(&config).await?;
            print_report(&report);
        }
        Command::Ask { question } => {
            let (generator, _) = build_generator(&config).await?;
            println!("{}", generator.answer(&question).await?);
        }
        Command::Chat => {
            let (generator, report) = build_generator(&config).await?;
            print_report(&report);
            chat_loop(&generator).await?;
        }
    }
    Ok(())
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &BuildReport) {
    println!(
        "Indexed {} chunks from {} of {} files in {:.1}s",
        report.chunks_created,
        report.documents_loaded,
        report.files_seen,
        report.duration.as_secs_f64()
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.path.display(), skipped.reason);
    }
}

async fn chat_loop(generator: &AnswerGenerator<AnyProvider, AnyProvider>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\nquestion> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match generator.answer(question).await {
            Ok(answer) => {
                stdout.write_all(answer.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Err(e) => tracing::error!("failed to answer: {e:#}"),
        }
    }
    Ok(())
}
