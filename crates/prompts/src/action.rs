//! The catalogue of actions that can be applied to clipboard content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad grouping used by UIs to lay out actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Code,
    Git,
    Data,
    Text,
    Web,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Code => "code",
            Category::Git => "git",
            Category::Data => "data",
            Category::Text => "text",
            Category::Web => "web",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every action the assistant knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Code
    FixTypos,
    AddDocstring,
    GenerateTests,
    ExplainCode,
    AddJsdoc,
    ConvertToTypescript,
    // Git
    GenerateCommit,
    SummarizeChanges,
    // Data
    FormatJson,
    ValidateJson,
    ExtractValues,
    FormatSql,
    ExplainQuery,
    Optimize,
    // Text
    FixGrammar,
    Translate,
    Summarize,
    ExtractKeywords,
    ConvertToHtml,
    ExtractHeadings,
    // Web
    FetchContent,
    SummarizePage,
    ExtractLinks,
    ValidateEmail,
}

impl Action {
    pub const ALL: [Action; 24] = [
        Action::FixTypos,
        Action::AddDocstring,
        Action::GenerateTests,
        Action::ExplainCode,
        Action::AddJsdoc,
        Action::ConvertToTypescript,
        Action::GenerateCommit,
        Action::SummarizeChanges,
        Action::FormatJson,
        Action::ValidateJson,
        Action::ExtractValues,
        Action::FormatSql,
        Action::ExplainQuery,
        Action::Optimize,
        Action::FixGrammar,
        Action::Translate,
        Action::Summarize,
        Action::ExtractKeywords,
        Action::ConvertToHtml,
        Action::ExtractHeadings,
        Action::FetchContent,
        Action::SummarizePage,
        Action::ExtractLinks,
        Action::ValidateEmail,
    ];

    /// Wire name, as used in suggested action lists and HTTP payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Action::FixTypos => "fix_typos",
            Action::AddDocstring => "add_docstring",
            Action::GenerateTests => "generate_tests",
            Action::ExplainCode => "explain_code",
            Action::AddJsdoc => "add_jsdoc",
            Action::ConvertToTypescript => "convert_to_typescript",
            Action::GenerateCommit => "generate_commit",
            Action::SummarizeChanges => "summarize_changes",
            Action::FormatJson => "format_json",
            Action::ValidateJson => "validate_json",
            Action::ExtractValues => "extract_values",
            Action::FormatSql => "format_sql",
            Action::ExplainQuery => "explain_query",
            Action::Optimize => "optimize",
            Action::FixGrammar => "fix_grammar",
            Action::Translate => "translate",
            Action::Summarize => "summarize",
            Action::ExtractKeywords => "extract_keywords",
            Action::ConvertToHtml => "convert_to_html",
            Action::ExtractHeadings => "extract_headings",
            Action::FetchContent => "fetch_content",
            Action::SummarizePage => "summarize_page",
            Action::ExtractLinks => "extract_links",
            Action::ValidateEmail => "validate_email",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.iter().copied().find(|a| a.name() == name)
    }

    pub fn category(&self) -> Category {
        match self {
            Action::FixTypos
            | Action::AddDocstring
            | Action::GenerateTests
            | Action::ExplainCode
            | Action::AddJsdoc
            | Action::ConvertToTypescript => Category::Code,
            Action::GenerateCommit | Action::SummarizeChanges => Category::Git,
            Action::FormatJson
            | Action::ValidateJson
            | Action::ExtractValues
            | Action::FormatSql
            | Action::ExplainQuery
            | Action::Optimize => Category::Data,
            Action::FixGrammar
            | Action::Translate
            | Action::Summarize
            | Action::ExtractKeywords
            | Action::ConvertToHtml
            | Action::ExtractHeadings => Category::Text,
            Action::FetchContent
            | Action::SummarizePage
            | Action::ExtractLinks
            | Action::ValidateEmail => Category::Web,
        }
    }

    /// Short human-readable label.
    pub fn description(&self) -> &'static str {
        match self {
            Action::FixTypos => "Fix spelling and syntax errors",
            Action::AddDocstring => "Add Python docstring",
            Action::GenerateTests => "Generate unit tests",
            Action::ExplainCode => "Explain what code does",
            Action::AddJsdoc => "Add JSDoc comments",
            Action::ConvertToTypescript => "Convert JavaScript to TypeScript",
            Action::GenerateCommit => "Generate commit message",
            Action::SummarizeChanges => "Summarize code changes",
            Action::FormatJson => "Format JSON",
            Action::ValidateJson => "Validate JSON",
            Action::ExtractValues => "Extract values from JSON",
            Action::FormatSql => "Format SQL",
            Action::ExplainQuery => "Explain SQL query",
            Action::Optimize => "Suggest query optimizations",
            Action::FixGrammar => "Fix grammar and spelling",
            Action::Translate => "Translate to another language",
            Action::Summarize => "Summarize text",
            Action::ExtractKeywords => "Extract keywords",
            Action::ConvertToHtml => "Convert Markdown to HTML",
            Action::ExtractHeadings => "Extract document outline",
            Action::FetchContent => "Describe linked content",
            Action::SummarizePage => "Summarize web page",
            Action::ExtractLinks => "Extract links",
            Action::ValidateEmail => "Check email address",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Action {
    type Err = crate::PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::from_name(s).ok_or_else(|| crate::PromptError::NotFound(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("make_coffee"), None);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.name()));
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(Action::AddJsdoc.category(), Category::Code);
        assert_eq!(Action::GenerateCommit.category(), Category::Git);
        assert_eq!(Action::Optimize.category(), Category::Data);
        assert_eq!(Action::Translate.category(), Category::Text);
        assert_eq!(Action::ExtractLinks.category(), Category::Web);
    }

    #[test]
    fn test_from_str_unknown_is_not_found() {
        let err = "nope".parse::<Action>().unwrap_err();
        assert!(matches!(err, crate::PromptError::NotFound(name) if name == "nope"));
    }
}
