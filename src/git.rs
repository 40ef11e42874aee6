// src/git.rs
use std::process::Command;

use tracing::debug;

// =============================================================================
// EXCLUDE PATTERNS
// =============================================================================
// Noise kept out of the diff sent to the model. The staged/not-staged check
// runs without these, so the index is always judged as-is.
pub const EXCLUDE_PATTERNS: &[&str] = &[
    ":(exclude)*.lock",
    ":(exclude)package-lock.json",
    ":(exclude)yarn.lock",
    ":(exclude)pnpm-lock.yaml",
    ":(exclude)dist/*",
    ":(exclude)build/*",
    ":(exclude)target/*",
    ":(exclude)*.min.js",
    ":(exclude)*.min.css",
    ":(exclude)*.map",
    ":(exclude).env*",
];

// =============================================================================
// COMMAND OUTPUT
// =============================================================================
/// Uniform result of one shell invocation. `success` is the exit status;
/// stderr lands in `error` while any partial stdout stays in `output`.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl GitOutput {
    /// Best text to show when the command failed.
    pub fn error_text(&self) -> String {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.output.trim().to_string())
    }
}

// =============================================================================
// GIT UTILITIES
// =============================================================================
pub fn run_git(args: &[&str]) -> GitOutput {
    debug!(command = ?args, "running git");
    match Command::new("git").args(args).output() {
        Ok(o) => GitOutput {
            success: o.status.success(),
            output: String::from_utf8_lossy(&o.stdout).to_string(),
            error: if o.stderr.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&o.stderr).to_string())
            },
        },
        Err(e) => GitOutput {
            success: false,
            output: String::new(),
            error: Some(format!("Failed to execute git: {}", e)),
        },
    }
}

fn run_shell(command: &str) -> GitOutput {
    debug!(command, "running shell command");
    match Command::new("sh").arg("-c").arg(command).output() {
        Ok(o) => GitOutput {
            success: o.status.success(),
            output: String::from_utf8_lossy(&o.stdout).to_string(),
            error: if o.stderr.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&o.stderr).to_string())
            },
        },
        Err(e) => GitOutput {
            success: false,
            output: String::new(),
            error: Some(format!("Failed to execute shell: {}", e)),
        },
    }
}

pub fn is_git_repo() -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// `git diff --cached --stat`, the staged/not-staged probe. Empty trimmed
/// output means nothing is staged.
pub fn staged_summary() -> GitOutput {
    run_git(&["diff", "--cached", "--stat"])
}

/// Full staged diff with noise excluded.
pub fn staged_diff() -> GitOutput {
    let mut args = vec!["diff", "--cached", "--unified=3", "--", "."];
    args.extend(EXCLUDE_PATTERNS);
    run_git(&args)
}

pub fn truncate_diff(diff: String, max: usize) -> String {
    if diff.len() <= max {
        return diff;
    }
    // Back off to a char boundary so multibyte content cannot split.
    let mut cut = max;
    while cut > 0 && !diff.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut t = diff[..cut].to_string();
    if let Some(p) = t.rfind("\ndiff --git") {
        if p > max / 2 {
            t.truncate(p);
        }
    }
    t.push_str("\n\n[... truncated ...]");
    t
}

// =============================================================================
// COMMIT
// =============================================================================
/// Escapes a message for embedding in a double-quoted shell argument.
/// Only double quotes and backticks are escaped; nothing else is touched.
pub fn escape_message(message: &str) -> String {
    message.replace('"', "\\\"").replace('`', "\\`")
}

/// The exact command line the executor hands to the shell.
pub fn commit_command(message: &str) -> String {
    format!("git commit -m \"{}\"", escape_message(message))
}

pub fn commit_staged(message: &str) -> GitOutput {
    run_shell(&commit_command(message))
}

// =============================================================================
// MODULE TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // POSIX double-quote semantics: backslash escapes ", `, $ and \ inside
    // double quotes and is dropped; any other pair passes through unchanged.
    fn shell_unescape(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(&next) = chars.peek() {
                    if next == '"' || next == '`' || next == '$' || next == '\\' {
                        out.push(next);
                        chars.next();
                        continue;
                    }
                }
            }
            out.push(c);
        }
        out
    }

    #[test]
    fn escape_message_escapes_double_quotes() {
        assert_eq!(escape_message(r#"say "hi""#), r#"say \"hi\""#);
    }

    #[test]
    fn escape_message_escapes_backticks() {
        assert_eq!(escape_message("run `make`"), "run \\`make\\`");
    }

    #[test]
    fn escape_message_exactly_two_characters_and_no_more() {
        // Dollar signs, backslashes, and other shell metacharacters pass
        // through untouched. That narrowness is the documented policy; any
        // broadening must change this test on purpose.
        let untouched = r"plain $HOME 100% a\b !bang *glob 'single' ;semi";
        assert_eq!(escape_message(untouched), untouched);
    }

    #[test]
    fn escape_message_round_trips_through_shell_unquoting() {
        let original = r#"fix(core): handle "quoted" input and `backtick` spans"#;
        let escaped = escape_message(original);
        assert_eq!(shell_unescape(&escaped), original);
    }

    #[test]
    fn escape_message_empty_is_empty() {
        assert_eq!(escape_message(""), "");
    }

    #[test]
    fn commit_command_embeds_escaped_message() {
        let cmd = commit_command(r#"docs: add "usage" section"#);
        assert_eq!(cmd, r#"git commit -m "docs: add \"usage\" section""#);
    }

    #[test]
    fn commit_command_plain_message_unchanged() {
        assert_eq!(
            commit_command("feat: add parser"),
            r#"git commit -m "feat: add parser""#
        );
    }

    #[test]
    fn truncate_diff_short_unchanged() {
        let diff = "short diff content".to_string();
        let result = truncate_diff(diff.clone(), 1000);
        assert_eq!(result, diff);
    }

    #[test]
    fn truncate_diff_long_truncated() {
        let diff = "a".repeat(500);
        let result = truncate_diff(diff, 100);
        assert!(result.len() < 500);
        assert!(result.contains("[... truncated ...]"));
    }

    #[test]
    fn truncate_diff_preserves_file_boundaries() {
        let diff = format!(
            "diff --git a/file1.rs\n{}\ndiff --git a/file2.rs\n{}",
            "a".repeat(100),
            "b".repeat(100)
        );
        let result = truncate_diff(diff, 150);
        assert!(result.contains("[... truncated ...]"));
        assert!(result.contains("diff --git a/file1.rs"));
        assert!(!result.contains("diff --git a/file2.rs"));
    }

    #[test]
    fn truncate_diff_exact_boundary() {
        let diff = "exactly100chars".repeat(10);
        let result = truncate_diff(diff.clone(), 150);
        assert_eq!(result, diff);
    }

    #[test]
    fn truncate_diff_empty_string() {
        let result = truncate_diff(String::new(), 100);
        assert!(result.is_empty());
    }

    #[test]
    fn truncate_diff_respects_char_boundaries() {
        // 3-byte chars; a cut at 100 bytes lands mid-char.
        let diff = "注".repeat(50);
        let result = truncate_diff(diff, 100);
        assert!(result.contains("[... truncated ...]"));
        assert!(result.starts_with('注'));
    }

    #[test]
    fn exclude_patterns_format() {
        for pattern in EXCLUDE_PATTERNS {
            assert!(
                pattern.starts_with(":(exclude)"),
                "Pattern should start with :(exclude): {}",
                pattern
            );
        }
    }

    #[test]
    fn exclude_patterns_cover_lockfiles_and_env() {
        assert!(EXCLUDE_PATTERNS.iter().any(|p| p.contains("*.lock")));
        assert!(EXCLUDE_PATTERNS.iter().any(|p| p.contains(".env")));
    }

    #[test]
    fn run_git_classifies_success() {
        let out = run_git(&["--version"]);
        assert!(out.success);
        assert!(out.output.contains("git version"));
    }

    #[test]
    fn run_git_classifies_failure_with_stderr() {
        let out = run_git(&["definitely-not-a-subcommand-xyz"]);
        assert!(!out.success);
        assert!(!out.error_text().is_empty());
    }

    #[test]
    fn error_text_prefers_stderr() {
        let out = GitOutput {
            success: false,
            output: "partial stdout".into(),
            error: Some("fatal: broken\n".into()),
        };
        assert_eq!(out.error_text(), "fatal: broken");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let out = GitOutput {
            success: false,
            output: "only stdout here".into(),
            error: None,
        };
        assert_eq!(out.error_text(), "only stdout here");
    }

    #[test]
    fn is_git_repo_answers() {
        // Environment-dependent; just exercise the probe.
        let _ = is_git_repo();
    }
}
