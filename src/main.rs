// src/main.rs

mod cli;
mod config;
mod context;
mod error;
mod llm;
mod prompt;

use anyhow::Context;
use reqwest::Client;
use tracing::info;

#[tokio::main]
async fn main() -> error::Result<()> {
    // Load .env before config, which reads env vars
    dotenvy::dotenv().ok();

    #[cfg(feature = "logging")]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    info!("Starting Linux Command Helper");

    let config = config::Config::load().context("Failed to load configuration")?;
    let client = Client::new();

    print!("⟳ Connecting to Ollama...");
    let _ = std::io::Write::flush(&mut std::io::stdout());
    if !llm::ollama::check_available(&client, &config).await {
        println!(" ✗");
        cli::ui::print_error(&format!(
            "Cannot connect to Ollama at {}\nMake sure Ollama is running: ollama serve",
            config.ollama_base_url
        ));
        std::process::exit(1);
    }
    println!(" ✓");

    cli::repl::run_interactive(&config, &client).await?;

    Ok(())
}
