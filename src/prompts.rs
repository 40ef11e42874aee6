// src/prompts.rs

use tracing::debug;

// =============================================================================
// GENERATION REQUEST
// =============================================================================

pub const COUNT_MIN: u8 = 1;
pub const COUNT_MAX: u8 = 10;
pub const DEFAULT_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFormat {
    #[default]
    Conventional,
    Gitmoji,
}

impl MessageFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "conventional" => Some(Self::Conventional),
            "gitmoji" => Some(Self::Gitmoji),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conventional => "conventional",
            Self::Gitmoji => "gitmoji",
        }
    }

    pub fn template(&self) -> &'static PromptTemplate {
        match self {
            Self::Conventional => &CONVENTIONAL_TEMPLATE,
            Self::Gitmoji => &GITMOJI_TEMPLATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Some(Self::En),
            "zh" => Some(Self::Zh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            Self::En => "Write every description in English.",
            Self::Zh => "Write every description in Simplified Chinese.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub format: MessageFormat,
    pub count: u8,
    pub language: Language,
}

impl GenerationRequest {
    /// Unknown format or language strings fall back to the defaults;
    /// the count is clamped into the supported range.
    pub fn new(format: Option<&str>, count: u8, language: Option<&str>) -> Self {
        if let Some(f) = format {
            if MessageFormat::parse(f).is_none() {
                debug!(format = f, "unknown message format, using conventional");
            }
        }
        if let Some(l) = language {
            if Language::parse(l).is_none() {
                debug!(language = l, "unknown language, using en");
            }
        }
        Self {
            format: format.and_then(MessageFormat::parse).unwrap_or_default(),
            count: count.clamp(COUNT_MIN, COUNT_MAX),
            language: language.and_then(Language::parse).unwrap_or_default(),
        }
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            format: MessageFormat::default(),
            count: DEFAULT_COUNT,
            language: Language::default(),
        }
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Immutable per-format instruction block. Both records are plain data;
/// nothing here depends on the diff or the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub format_name: &'static str,
    pub rules: &'static str,
    pub reference: &'static str,
}

pub const CONVENTIONAL_TEMPLATE: PromptTemplate = PromptTemplate {
    format_name: "conventional",
    rules: r#"Each message must follow the Conventional Commits shape `<type>(<scope>): <description>`.
The scope is optional; drop the parentheses when no scope fits.
Descriptions use the imperative mood, stay at or under 50 characters, and never end with a period."#,
    reference: r#"Allowed types:
- feat: a new feature
- fix: a bug fix
- docs: documentation only
- style: formatting, no logic change
- refactor: restructuring without behavior change
- perf: a performance improvement
- test: adding or correcting tests
- build: build system or external dependencies
- ci: CI configuration
- chore: other maintenance"#,
};

pub const GITMOJI_TEMPLATE: PromptTemplate = PromptTemplate {
    format_name: "gitmoji",
    rules: r#"Each message must start with exactly one emoji from the reference table, followed by a space and a short imperative description.
Pick the emoji that matches the dominant change in the diff."#,
    reference: r#"Emoji reference:
- ✨ introduce a new feature
- 🐛 fix a bug
- 📝 add or update documentation
- 💄 update UI or styles
- ♻️ refactor code
- ⚡️ improve performance
- ✅ add or update tests
- 🔧 change configuration files
- 🏗️ change the build system
- 🔥 remove code or files
- 🚀 deploy or release
- 🎨 improve structure or format of the code
- 🔒 fix security issues
- ⬆️ upgrade dependencies
- ⬇️ downgrade dependencies
- 🚚 move or rename files"#,
};

// =============================================================================
// PROMPTS
// =============================================================================

pub const SYSTEM_PROMPT: &str = r#"You generate candidate Git commit messages from a staged diff.

Rules:
1. Follow the requested message format exactly
2. Describe the PURPOSE of the change, not a list of touched files
3. Reply with the numbered list only: no preamble, no markdown fences, no commentary"#;

pub const USER_PROMPT: &str = r#"Generate {count} candidate commit messages for the staged changes below.

{rules}

{reference}

{language} Reply with exactly {count} lines, one candidate per line, in the form `N. <message>` with nothing before or after the list.

```diff
{diff}
```"#;

/// Expands the user prompt for a request. Pure: the same request and
/// diff always produce the same string. The diff is embedded verbatim,
/// so it is replaced last and never rescanned for placeholders.
pub fn build_prompt(request: &GenerationRequest, diff: &str) -> String {
    let template = request.format.template();
    USER_PROMPT
        .replace("{count}", &request.count.to_string())
        .replace("{rules}", template.rules)
        .replace("{reference}", template.reference)
        .replace("{language}", request.language.directive())
        .replace("{diff}", diff)
}

// =============================================================================
// TESTS
// =============================================================================
