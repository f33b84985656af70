//! Subject line sanitization for email filenames.
//!
//! The sanitizer is an ordered list of [`Step`]s. Later steps rely on the
//! normalization done by earlier ones, so the order in [`SubjectSanitizer::new`]
//! is part of the behavior.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Terms whose internal dots survive dot removal.
pub const DEFAULT_PROTECTED_TERMS: &[&str] = &["Mi.com", "Amazon.in"];

/// Literal replacements applied in order after the `You've` rewrite.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("Order ID", "OrderID"),
    ("&", "and"),
    (",", "_"),
    ("you\u{2019}ve", "you_have"),
    ("#", ""),
];

// Private-use code points; they are never valid output.
const TERM_DOT: char = '\u{E000}';
const CURRENCY_DOT: char = '\u{E001}';

static ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("valid regex"));
static LABEL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(:\s*|-\s*)").expect("valid regex"));
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("valid regex"));
static CURRENCY_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Sc}\d+\.\d{2}").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse runs of two or more underscores into one.
pub fn collapse_underscores(s: &str) -> Cow<'_, str> {
    UNDERSCORE_RUN.replace_all(s, "_")
}

/// One transform in the sanitizer pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Trim surrounding whitespace and replace filesystem-illegal characters with `_`.
    ReplaceIllegal,
    /// Turn `:` or `-` plus any following whitespace into `_`.
    ReplaceLabelSeparators,
    /// Strip trailing `.` and then trailing `!`.
    StripTrailingPunctuation,
    CollapseUnderscores,
    /// Rewrite a leading `You've` to `You_have`.
    ExpandLeadingYouHave,
    ApplyReplacements,
    /// Mask the dots inside the given literal terms.
    ProtectTerms(Vec<String>),
    /// Mask the dot inside currency amounts such as `₹199.00`.
    ProtectCurrency,
    RemoveDots,
    RestoreProtectedDots,
    DropNonAscii,
    CollapseWhitespace,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceIllegal => "replace-illegal",
            Self::ReplaceLabelSeparators => "replace-label-separators",
            Self::StripTrailingPunctuation => "strip-trailing-punctuation",
            Self::CollapseUnderscores => "collapse-underscores",
            Self::ExpandLeadingYouHave => "expand-leading-you-have",
            Self::ApplyReplacements => "apply-replacements",
            Self::ProtectTerms(_) => "protect-terms",
            Self::ProtectCurrency => "protect-currency",
            Self::RemoveDots => "remove-dots",
            Self::RestoreProtectedDots => "restore-protected-dots",
            Self::DropNonAscii => "drop-non-ascii",
            Self::CollapseWhitespace => "collapse-whitespace",
        }
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::ReplaceIllegal => ILLEGAL_CHARS.replace_all(input.trim(), "_").into_owned(),
            Self::ReplaceLabelSeparators => LABEL_SEPARATOR.replace_all(input, "_").into_owned(),
            Self::StripTrailingPunctuation => input
                .trim_end_matches('.')
                .trim_end_matches('!')
                .to_string(),
            Self::CollapseUnderscores => collapse_underscores(input).into_owned(),
            Self::ExpandLeadingYouHave => {
                if input.starts_with("You've") {
                    input.replacen("You've", "You_have", 1)
                } else {
                    input.to_string()
                }
            },
            Self::ApplyReplacements => REPLACEMENTS
                .iter()
                .fold(input.to_string(), |acc, (from, to)| acc.replace(from, to)),
            Self::ProtectTerms(terms) => {
                let mut out: String = input
                    .chars()
                    .filter(|c| *c != TERM_DOT && *c != CURRENCY_DOT)
                    .collect();
                for term in terms {
                    let masked = term.replace('.', &TERM_DOT.to_string());
                    out = out.replace(term.as_str(), &masked);
                }
                out
            },
            Self::ProtectCurrency => CURRENCY_AMOUNT
                .replace_all(input, |caps: &regex::Captures<'_>| {
                    caps[0].replace('.', &CURRENCY_DOT.to_string())
                })
                .into_owned(),
            Self::RemoveDots => input.replace('.', ""),
            Self::RestoreProtectedDots => input.replace([TERM_DOT, CURRENCY_DOT], "."),
            Self::DropNonAscii => input.chars().filter(char::is_ascii).collect(),
            Self::CollapseWhitespace => WHITESPACE_RUN.replace_all(input, " ").trim().to_string(),
        }
    }
}

/// Ordered subject sanitization pipeline.
#[derive(Debug, Clone)]
pub struct SubjectSanitizer {
    steps: Vec<Step>,
}

impl Default for SubjectSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_TERMS)
    }
}

impl SubjectSanitizer {
    pub fn new<I>(protected_terms: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let terms = protected_terms
            .into_iter()
            .map(|t| t.as_ref().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            steps: vec![
                Step::ReplaceIllegal,
                Step::ReplaceLabelSeparators,
                Step::StripTrailingPunctuation,
                Step::CollapseUnderscores,
                Step::ExpandLeadingYouHave,
                Step::ApplyReplacements,
                Step::ProtectTerms(terms),
                Step::ProtectCurrency,
                Step::RemoveDots,
                Step::RestoreProtectedDots,
                Step::DropNonAscii,
                Step::CollapseWhitespace,
            ],
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn sanitize(&self, raw_subject: &str) -> String {
        self.steps
            .iter()
            .fold(raw_subject.to_string(), |acc, step| step.apply(&acc))
    }
}

/// Sanitize a subject with the default protected terms.
pub fn sanitize_subject(raw_subject: &str) -> String {
    SubjectSanitizer::default().sanitize(raw_subject)
}
