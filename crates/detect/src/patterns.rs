//! Precompiled matchers used by the detection cascade.
//!
//! Every check is a pure function of the input text. Regexes are compiled
//! once in [`PatternLibrary::new`] and only read afterwards, so a library
//! can be shared freely between threads.

use regex::Regex;

/// Literal markers that identify a unified diff.
pub const GIT_DIFF_MARKERS: &[&str] = &["diff --git", "index ", "--- a/", "+++ b/", "@@ -"];

/// Keywords counted (case-insensitively, as substrings) for SQL detection.
pub const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER", "JOIN",
];

const URL_PATTERN: &str = r"^https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b";
const EMAIL_PATTERN: &str = r"^\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

const PYTHON_INDICATORS: &[&str] = &[
    r"\bdef\s+\w+\s*\(",
    r"\bclass\s+\w+",
    r"\bimport\s+\w+",
    r"\bfrom\s+\w+\s+import",
    r"(?m):\s*$",
];

const JAVASCRIPT_INDICATORS: &[&str] = &[
    r"\bfunction\s+\w+\s*\(",
    r"\bconst\s+\w+\s*=",
    r"\blet\s+\w+\s*=",
    r"\bvar\s+\w+\s*=",
    r"=>",
    r"console\.log",
];

const MARKDOWN_MARKERS: &[&str] = &[
    r"(?m)^#{1,6}\s",
    r"\[.*?\]\(.*?\)",
    r"\*\*.*?\*\*",
    r"(?m)^\s*[-*+]\s",
    r"```",
];

/// Compiled pattern set shared by all detector calls.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    url: Regex,
    email: Regex,
    python: Vec<Regex>,
    javascript: Vec<Regex>,
    markdown: Vec<Regex>,
}

impl PatternLibrary {
    /// Compile every pattern. Fails only if a built-in pattern is malformed.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            url: Regex::new(URL_PATTERN)?,
            email: Regex::new(EMAIL_PATTERN)?,
            python: compile_all(PYTHON_INDICATORS)?,
            javascript: compile_all(JAVASCRIPT_INDICATORS)?,
            markdown: compile_all(MARKDOWN_MARKERS)?,
        })
    }

    pub fn is_git_diff(&self, text: &str) -> bool {
        GIT_DIFF_MARKERS.iter().any(|marker| text.contains(marker))
    }

    /// Single line starting with an http(s) URL.
    pub fn is_url(&self, text: &str) -> bool {
        is_single_line(text) && self.url.is_match(text)
    }

    /// Single line starting with an email address.
    pub fn is_email(&self, text: &str) -> bool {
        is_single_line(text) && self.email.is_match(text)
    }

    /// Whole-document JSON parse; any syntax error means "not JSON".
    pub fn is_json(&self, text: &str) -> bool {
        serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
    }

    /// Number of distinct SQL keywords present.
    pub fn sql_keyword_count(&self, text: &str) -> usize {
        let upper = text.to_uppercase();
        SQL_KEYWORDS.iter().filter(|kw| upper.contains(*kw)).count()
    }

    pub fn markdown_score(&self, text: &str) -> usize {
        count_matching(&self.markdown, text)
    }

    pub fn python_score(&self, text: &str) -> usize {
        count_matching(&self.python, text)
    }

    pub fn javascript_score(&self, text: &str) -> usize {
        count_matching(&self.javascript, text)
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

/// Counts patterns, not occurrences: each pattern adds at most one.
fn count_matching(patterns: &[Regex], text: &str) -> usize {
    patterns.iter().filter(|re| re.is_match(text)).count()
}

fn is_single_line(text: &str) -> bool {
    !text.contains('\n')
}
