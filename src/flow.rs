// src/flow.rs

use async_trait::async_trait;
use tracing::debug;

use crate::error::QuillError;
use crate::git::{self, truncate_diff};
use crate::parser::parse_candidates;
use crate::prompts::{build_prompt, GenerationRequest, SYSTEM_PROMPT};

/// Sentinel appended after the candidates in the selection list.
pub const CANCEL_OPTION: &str = "Cancel";

// =============================================================================
// SEAMS
// =============================================================================

/// Repository access, narrowed to what one run needs: staged state in,
/// one commit out.
pub trait Vcs {
    fn is_repo(&self) -> bool;
    fn staged_summary(&self) -> Result<String, QuillError>;
    fn staged_diff(&self) -> Result<String, QuillError>;
    fn commit(&self, message: &str) -> Result<String, QuillError>;
}

#[async_trait]
pub trait ModelInvoker {
    async fn invoke(&self, system: &str, prompt: &str) -> Result<String, QuillError>;
}

/// Terminal interaction points. `None` from select or confirm means the
/// operator backed out (Esc or Ctrl-C) instead of answering.
pub trait Interact {
    fn select(&self, prompt: &str, options: &[String]) -> Option<usize>;
    fn confirm(&self, prompt: &str, default: bool) -> Option<bool>;
    fn spin_start(&self, message: &str);
    fn spin_succeed(&self, message: &str);
    fn spin_fail(&self, message: &str);
}

/// [`Vcs`] backed by the git binary via [`crate::git`].
pub struct SystemGit;

impl Vcs for SystemGit {
    fn is_repo(&self) -> bool {
        git::is_git_repo()
    }

    fn staged_summary(&self) -> Result<String, QuillError> {
        let out = git::staged_summary();
        if out.success {
            Ok(out.output)
        } else {
            Err(QuillError::Git(out.error_text()))
        }
    }

    fn staged_diff(&self) -> Result<String, QuillError> {
        let out = git::staged_diff();
        if out.success {
            Ok(out.output)
        } else {
            Err(QuillError::Git(out.error_text()))
        }
    }

    fn commit(&self, message: &str) -> Result<String, QuillError> {
        let out = git::commit_staged(message);
        if out.success {
            Ok(out.output)
        } else {
            Err(QuillError::CommitFailed(out.error_text()))
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A candidate was picked, confirmed, and committed.
    Committed(String),
    /// A candidate was picked but the commit was declined; the message
    /// survives as a suggestion. Not an error.
    Declined(String),
    /// The operator bailed out of the selection list.
    Cancelled,
}

/// Flat summary of one run, for rendering and exit-code decisions.
/// `success` is true only when a commit was created.
#[derive(Debug)]
pub struct RunReport {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<QuillError>,
    pub cancelled: bool,
    pub suggested_message: Option<String>,
}

impl RunReport {
    fn committed(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            error: None,
            cancelled: false,
            suggested_message: None,
        }
    }

    fn declined(suggestion: String) -> Self {
        Self {
            success: false,
            message: None,
            error: None,
            cancelled: false,
            suggested_message: Some(suggestion),
        }
    }

    fn cancelled() -> Self {
        Self {
            success: false,
            message: None,
            error: None,
            cancelled: true,
            suggested_message: None,
        }
    }

    fn failed(error: QuillError) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
            cancelled: false,
            suggested_message: None,
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Runs the whole pipeline: staged diff to candidates to one commit.
pub async fn run(
    request: &GenerationRequest,
    vcs: &dyn Vcs,
    model: &dyn ModelInvoker,
    ui: &dyn Interact,
    max_diff_chars: usize,
) -> RunReport {
    match generate_and_select(request, vcs, model, ui, max_diff_chars).await {
        Ok(SelectionOutcome::Committed(message)) => RunReport::committed(message),
        Ok(SelectionOutcome::Declined(message)) => RunReport::declined(message),
        Ok(SelectionOutcome::Cancelled) => RunReport::cancelled(),
        Err(e) => RunReport::failed(e),
    }
}

/// Checks run in a fixed order so the first missing precondition is the
/// one reported: repository, staged changes, then the model call.
async fn generate_and_select(
    request: &GenerationRequest,
    vcs: &dyn Vcs,
    model: &dyn ModelInvoker,
    ui: &dyn Interact,
    max_diff_chars: usize,
) -> Result<SelectionOutcome, QuillError> {
    if !vcs.is_repo() {
        return Err(QuillError::NotAGitRepository);
    }

    let summary = vcs.staged_summary()?;
    if summary.trim().is_empty() {
        return Err(QuillError::NoStagedChanges);
    }

    let diff = truncate_diff(vcs.staged_diff()?, max_diff_chars);
    let prompt = build_prompt(request, &diff);
    debug!(prompt_chars = prompt.len(), "prompt built");

    ui.spin_start("Generating commit messages...");
    let reply = match model.invoke(SYSTEM_PROMPT, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            ui.spin_fail("Generation failed");
            return Err(e);
        }
    };
    debug!(reply_chars = reply.len(), "model replied");

    let candidates = parse_candidates(&reply);
    if candidates.is_empty() {
        ui.spin_fail("No usable candidates");
        return Err(QuillError::NoCandidatesParsed);
    }
    ui.spin_succeed(&format!("Candidates ready: {}", candidates.len()));

    select_and_commit(&candidates, vcs, ui)
}

fn select_and_commit(
    candidates: &[String],
    vcs: &dyn Vcs,
    ui: &dyn Interact,
) -> Result<SelectionOutcome, QuillError> {
    let mut options: Vec<String> = candidates.to_vec();
    options.push(CANCEL_OPTION.to_string());

    let picked = match ui.select("Pick a commit message", &options) {
        Some(index) if index < candidates.len() => index,
        // The cancel sentinel or backing out of the list.
        _ => return Ok(SelectionOutcome::Cancelled),
    };
    let message = candidates[picked].clone();

    let confirmed = ui
        .confirm(&format!("Commit with \"{}\"?", message), true)
        .unwrap_or(false);
    if !confirmed {
        return Ok(SelectionOutcome::Declined(message));
    }

    let output = vcs.commit(&message)?;
    debug!(output = %output.trim(), "git commit output");
    Ok(SelectionOutcome::Committed(message))
}

// =============================================================================
// TESTS
// =============================================================================
