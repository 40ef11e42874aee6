// src/cli.rs
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gitquill",
    version,
    about = "Draft commit messages from staged changes with an LLM\n\nRunning without a subcommand generates candidates for the staged diff, lets you pick one, and commits it.",
    after_help = "EXAMPLES:
    gitquill                        # 3 conventional candidates for staged changes
    gitquill -n 5                   # five candidates
    gitquill -f gitmoji             # gitmoji-style messages
    gitquill -l zh                  # descriptions in Simplified Chinese
    gitquill --provider anthropic   # one-off provider override

    gitquill init --provider openai --api-key sk-...
                                    # write defaults to ~/.gitquill.toml
    gitquill config                 # show the resolved configuration

FORMATS:
    conventional    <type>(<scope>): <description>   (default)
    gitmoji         <emoji> <description>"
)]
pub struct Cli {
    /// Message format: conventional or gitmoji
    #[arg(short = 'f', long, global = true)]
    pub format: Option<String>,

    /// Number of candidates to generate
    #[arg(short = 'n', long, default_value = "3", value_parser = clap::value_parser!(u8).range(1..=10))]
    pub count: u8,

    /// Message language: en or zh
    #[arg(short = 'l', long, global = true)]
    pub language: Option<String>,

    /// Model provider: openai, anthropic, or google
    #[arg(long, global = true)]
    pub provider: Option<String>,

    #[arg(long, global = true)]
    pub api_key: Option<String>,
    #[arg(long, global = true)]
    pub model: Option<String>,
    #[arg(long, env = "GITQUILL_BASE_URL", global = true)]
    pub base_url: Option<String>,
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Diff characters to send before truncation kicks in
    #[arg(long, global = true)]
    pub max_diff_chars: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or update `~/.gitquill.toml` with provider/model defaults
    Init,

    /// Show the resolved configuration and where each value comes from
    Config,
}
