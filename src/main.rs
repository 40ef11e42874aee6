// src/main.rs
mod cli;
mod client;
mod config;
mod error;
mod flow;
mod git;
mod parser;
mod prompts;
mod providers;
mod types;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use client::LlmClient;
use config::{Config, Provider, ResolvedConfig};
use flow::{RunReport, SystemGit};
use prompts::GenerationRequest;
use ui::TerminalUi;

// =============================================================================
// LOGGING
// =============================================================================
/// Level comes from RUST_LOG; quiet by default so the prompts stay clean.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

// =============================================================================
// SUBCOMMANDS
// =============================================================================
fn cmd_init(cli: &Cli, file: &Config) -> Result<()> {
    let mut config = file.clone();

    // Canonicalize eagerly so `init --provider claude` writes the
    // [anthropic] table instead of inventing a new one.
    let provider = match &cli.provider {
        Some(name) => Some(name.parse::<Provider>()?),
        None => None,
    };

    if let Some(p) = provider {
        let pc = config.get_provider_mut(p);
        if cli.api_key.is_some() {
            pc.api_key = cli.api_key.clone();
        }
        if cli.model.is_some() {
            pc.model = cli.model.clone();
        }
        if cli.max_tokens.is_some() {
            pc.max_tokens = cli.max_tokens;
        }
        if cli.temperature.is_some() {
            pc.temperature = cli.temperature;
        }
        if cli.base_url.is_some() {
            pc.base_url = cli.base_url.clone();
        }
        config.default_provider = Some(p.as_str().to_string());
    }

    if cli.format.is_some() {
        config.default_format = cli.format.clone();
    }
    if cli.language.is_some() {
        config.default_language = cli.language.clone();
    }
    if cli.max_diff_chars.is_some() {
        config.max_diff_chars = cli.max_diff_chars;
    }

    config.save()?;

    if let Some(p) = provider {
        println!("Default provider set to: {}", p);
    }

    Ok(())
}

// Keys are operator-entered; the preview cut must not split a char.
fn key_preview(key: &str) -> String {
    let head: String = key.chars().take(8).collect();
    format!("{}...", head)
}

fn cmd_config() -> Result<()> {
    let config = Config::load();
    let path = Config::path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unknown)".into());

    println!("Config file: {}\n", path);
    println!(
        "default_provider: {}",
        config.default_provider.as_deref().unwrap_or("(not set)")
    );
    println!(
        "default_format:   {}",
        config.default_format.as_deref().unwrap_or("(not set)")
    );
    println!(
        "default_language: {}",
        config.default_language.as_deref().unwrap_or("(not set)")
    );
    println!(
        "max_diff_chars:   {}",
        config
            .max_diff_chars
            .map(|c| c.to_string())
            .unwrap_or_else(|| "(default)".into())
    );

    for provider in Provider::ALL {
        if let Some(p) = config.get_provider(provider) {
            println!("\n[{}]", provider);
            println!(
                "  api_key:     {}",
                p.api_key
                    .as_deref()
                    .map(key_preview)
                    .unwrap_or_else(|| format!("(env: {})", provider.env_var()))
            );
            println!("  model:       {}", p.model.as_deref().unwrap_or("(default)"));
            println!(
                "  max_tokens:  {}",
                p.max_tokens
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "(default)".into())
            );
            println!(
                "  temperature: {}",
                p.temperature
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "(default)".into())
            );
            if let Some(url) = &p.base_url {
                println!("  base_url:    {}", url);
            }
        }
    }

    println!("\nPriority: CLI args > provider config > env var > defaults");
    Ok(())
}

// =============================================================================
// REPORT
// =============================================================================
fn render_report(report: &RunReport) {
    if report.success {
        if let Some(message) = &report.message {
            println!("Committed: {}", message);
        }
        return;
    }

    if report.cancelled {
        println!("Cancelled. Nothing was committed.");
        return;
    }

    if let Some(suggestion) = &report.suggested_message {
        println!("Not committed. Suggested message:");
        println!("  {}", suggestion);
        println!("Run it yourself with:");
        println!("  {}", git::commit_command(suggestion));
        return;
    }

    if let Some(error) = &report.error {
        eprintln!("error: {}", error);
        for hint in error.hints() {
            eprintln!("  hint: {}", hint);
        }
        std::process::exit(1);
    }
}

// =============================================================================
// MAIN
// =============================================================================
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let file_config = Config::load();

    match &cli.command {
        Some(Commands::Init) => return cmd_init(&cli, &file_config),
        Some(Commands::Config) => return cmd_config(),
        None => {}
    }

    let resolved = ResolvedConfig::new(
        cli.provider.as_ref(),
        cli.api_key.as_ref(),
        cli.model.as_ref(),
        cli.base_url.as_ref(),
        cli.max_tokens,
        cli.temperature,
        cli.max_diff_chars,
        cli.format.as_ref(),
        cli.language.as_ref(),
        &file_config,
    );

    let request = GenerationRequest::new(
        resolved.format.as_deref(),
        cli.count,
        resolved.language.as_deref(),
    );

    let client = LlmClient::new(&resolved)?;
    let ui = TerminalUi::new()?;

    let report = flow::run(&request, &SystemGit, &client, &ui, resolved.max_diff_chars).await;
    render_report(&report);

    Ok(())
}
