// src/parser.rs

use tracing::debug;

// =============================================================================
// CANDIDATE PARSER
// =============================================================================

/// Extracts candidate messages from a model reply.
///
/// A candidate line is a leading run of ASCII digits, a period, optional
/// whitespace, then non-empty content. Everything else (prose, blank
/// lines, markdown bullets) is dropped. Lines are kept in the order they
/// appear; the numbers themselves are not checked against anything.
pub fn parse_candidates(reply: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    for line in reply.lines() {
        let line = line.trim();
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            continue;
        }
        let Some(rest) = line[digits..].strip_prefix('.') else {
            continue;
        };
        let content = rest.trim();
        if content.is_empty() {
            continue;
        }
        candidates.push(content.to_string());
    }
    debug!(count = candidates.len(), "parsed candidates from reply");
    candidates
}

// =============================================================================
// TESTS
// =============================================================================
