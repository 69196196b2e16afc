//! Conventional commit message grammar.
//!
//! This module is the single owner of the `type(scope)!: subject` format.
//! Everything that needs to build or recognise a conventional message goes
//! through [`render`], [`matches`] or [`parse`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Footer paragraph appended to every breaking change.
pub const BREAKING_FOOTER: &str =
    "BREAKING CHANGE: this commit introduces changes that are not backward compatible.";

// The type is matched loosely here and checked against `CommitType` afterwards,
// so only the type is case-insensitive while the scope stays lowercase.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)(?:\(([a-z0-9-]+)\))?(!)?: (.+)$")
        .expect("conventional commit header pattern is valid")
});

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
    Revert,
}

impl CommitType {
    /// Every type, in the order they are offered to the user.
    pub const ALL: [CommitType; 11] = [
        Self::Feat,
        Self::Fix,
        Self::Docs,
        Self::Style,
        Self::Refactor,
        Self::Perf,
        Self::Test,
        Self::Build,
        Self::Ci,
        Self::Chore,
        Self::Revert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Build => "build",
            Self::Ci => "ci",
            Self::Chore => "chore",
            Self::Revert => "revert",
        }
    }

    /// Comma separated list of all type names, for error messages.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("Unknown commit type: {}", s))
    }
}

/// In-memory form of a conventional commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredCommit {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
    pub subject: String,
    pub body: Option<String>,
}

impl StructuredCommit {
    /// A non-breaking commit with no scope and no body.
    pub fn new(commit_type: CommitType, subject: impl Into<String>) -> Self {
        Self {
            commit_type,
            scope: None,
            breaking: false,
            subject: subject.into(),
            body: None,
        }
    }

    /// True once the message has the one field that is never optional.
    pub fn is_complete(&self) -> bool {
        !self.subject.trim().is_empty()
    }

    pub fn render(&self) -> String {
        render(self)
    }
}

/// Renders a commit as `type(scope)!: subject`, then the body, then the
/// breaking-change footer, each separated by a blank line.
pub fn render(commit: &StructuredCommit) -> String {
    let mut out = commit.commit_type.as_str().to_string();

    if let Some(scope) = commit.scope.as_deref().filter(|s| !s.is_empty()) {
        out.push('(');
        out.push_str(scope);
        out.push(')');
    }

    if commit.breaking {
        out.push('!');
    }

    out.push_str(": ");
    out.push_str(&commit.subject);

    if let Some(body) = commit.body.as_deref().filter(|b| !b.trim().is_empty()) {
        out.push_str("\n\n");
        out.push_str(body);
    }

    if commit.breaking {
        out.push_str("\n\n");
        out.push_str(BREAKING_FOOTER);
    }

    out
}

/// Whether the first line of `raw` is a conventional commit header.
pub fn matches(raw: &str) -> bool {
    parse_header(first_line(raw)).is_some()
}

/// Parses a conventional message back into its components.
///
/// Returns `None` for anything [`matches`] rejects. The body is whatever
/// follows the header, minus a trailing [`BREAKING_FOOTER`] paragraph.
pub fn parse(raw: &str) -> Option<StructuredCommit> {
    let (commit_type, scope, breaking, subject) = parse_header(first_line(raw))?;

    let rest = raw.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    let mut body = rest.trim();
    if let Some(stripped) = body.strip_suffix(BREAKING_FOOTER) {
        body = stripped.trim_end();
    }

    Some(StructuredCommit {
        commit_type,
        scope,
        breaking,
        subject,
        body: (!body.is_empty()).then(|| body.to_string()),
    })
}

fn first_line(raw: &str) -> &str {
    raw.lines().next().unwrap_or("")
}

fn parse_header(line: &str) -> Option<(CommitType, Option<String>, bool, String)> {
    let caps = HEADER.captures(line)?;
    let commit_type = caps.get(1)?.as_str().parse::<CommitType>().ok()?;
    let scope = caps.get(2).map(|m| m.as_str().to_string());
    let breaking = caps.get(3).is_some();
    let subject = caps.get(4)?.as_str().to_string();
    Some((commit_type, scope, breaking, subject))
}
