// src/error.rs
use thiserror::Error;

use crate::config::Provider;

/// Everything that can end a run early. Every variant is terminal for the
/// current invocation; nothing here is retried.
#[derive(Debug, Error)]
pub enum QuillError {
    #[error("Not a git repository")]
    NotAGitRepository,

    #[error("No staged changes")]
    NoStagedChanges,

    #[error("No model configured")]
    ModelNotConfigured { provider: Provider },

    #[error("Unsupported provider '{0}'")]
    UnsupportedProvider(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("No numbered candidates in the model reply")]
    NoCandidatesParsed,

    #[error("Commit failed: {0}")]
    CommitFailed(String),

    #[error("git command failed: {0}")]
    Git(String),
}

impl QuillError {
    /// Remediation lines printed under the error message. Empty when there is
    /// nothing actionable to suggest.
    pub fn hints(&self) -> Vec<String> {
        match self {
            Self::NotAGitRepository => vec![
                "Run gitquill inside a repository, or create one with `git init`.".into(),
            ],
            Self::NoStagedChanges => vec![
                "Stage the changes you want described with `git add <paths>`.".into(),
                "Check what is currently staged with `git status`.".into(),
            ],
            Self::ModelNotConfigured { provider } => vec![
                format!("Set the {} environment variable,", provider.env_var()),
                format!(
                    "or store a key with `gitquill init --provider {} --api-key <key>`.",
                    provider.as_str()
                ),
            ],
            Self::UnsupportedProvider(_) => vec![
                "Known providers: openai, anthropic, google.".into(),
            ],
            Self::Generation(_) => vec![
                "Check network access, the API key, and any --base-url override.".into(),
            ],
            Self::NoCandidatesParsed => vec![
                "The model ignored the `N. <message>` output shape; run again or try another model.".into(),
            ],
            Self::CommitFailed(_) => vec![
                "The staged changes are untouched; inspect the git output above and commit manually if needed.".into(),
            ],
            Self::Git(_) => vec![],
        }
    }
}
