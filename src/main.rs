mod answer;
mod commands;
mod docs;
mod error;
mod llm;
mod rank;
mod state;

use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use answer::AnswerEngine;
use commands::Command;
use llm::{ModelClient, OllamaClient};
use state::{AppState, AssistantConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load env
    let _ = dotenv::dotenv();

    // Subscriber first so config warnings are visible
    let log_level = dotenv::var("ASSISTANT_LOG_LEVEL")
        .ok()
        .and_then(|level| level.trim().parse().ok())
        .unwrap_or(AssistantConfig::default().log_level);
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = AssistantConfig::from_env();
    info!(
        data_dir = %config.data_dir.display(),
        log_level = %config.log_level,
        context_size = config.context_size,
        top_k = config.top_k,
        "Configuration loaded"
    );

    println!("==============================================");
    println!("Website Assistant");
    println!("==============================================");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    println!("Loading website content...");
    let index = Arc::new(
        docs::ingest::load(config.data_dir.clone())
            .await
            .context("Failed to load website content")?,
    );
    println!("Loaded {} pages from the website.", index.len());

    let llm: Arc<dyn ModelClient> = Arc::new(
        OllamaClient::new(&config.base_url, config.request_timeout)
            .context("Failed to create model client")?,
    );
    info!(base_url = %config.base_url, model = %config.model, "Model client initialized");

    println!("Initializing Ollama with model '{}'...", config.model);
    if !check_model(llm.as_ref(), &config, &mut stdin).await? {
        return Ok(());
    }

    let mut state = AppState {
        index,
        engine: AnswerEngine::new(llm, config.generation()),
        config,
    };

    println!("\nAssistant is ready! Ask anything about the crawled website.");
    println!("Type 'exit' to quit, 'help' for more commands");

    loop {
        print!("\n> ");
        stdout.flush()?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };

        let command = Command::parse(&line);
        if let ControlFlow::Break(()) = commands::execute(&mut state, command, &mut stdout).await? {
            break;
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Confirm the configured model is installed. Returns `false` if the session
/// should end: service unreachable, or model missing and the user declines.
async fn check_model(
    llm: &dyn ModelClient,
    config: &AssistantConfig,
    stdin: &mut Lines<BufReader<Stdin>>,
) -> Result<bool> {
    let models = match llm.list_models().await {
        Ok(models) => models,
        Err(e) => {
            error!(base_url = %config.base_url, "Model service check failed: {}", e);
            println!("Error connecting to Ollama: {}", e);
            println!(
                "Make sure Ollama is running on this machine ({} by default).",
                config.base_url
            );
            println!("You can download Ollama from: https://ollama.ai/");
            return Ok(false);
        }
    };

    if llm::has_model(&models, &config.model) {
        println!("Ollama initialization successful!");
        return Ok(true);
    }

    warn!(model = %config.model, available = models.len(), "Configured model not installed");
    println!("Warning: Model '{}' not found in Ollama.", config.model);
    println!("Available models:");
    for model in &models {
        println!("  - {}", model);
    }
    println!("\nSet OLLAMA_MODEL to one of these models,");
    println!("or install the model with: ollama pull {}", config.model);

    print!("\nDo you want to try continuing anyway? (y/n): ");
    std::io::stdout().flush()?;
    let reply = stdin.next_line().await?.unwrap_or_default();
    Ok(reply.trim().eq_ignore_ascii_case("y"))
}
