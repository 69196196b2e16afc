//! Building a commit message from flags, prompts, or both.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grammar::{CommitType, StructuredCommit};
use crate::messages::{Catalog, Msg};
use crate::prompt::{Prompter, ask_required};

/// How the `commit` command collects its fields.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Always prompt, using flags as defaults.
    #[default]
    Interactive,
    /// Never prompt; flags must carry everything.
    NonInteractive,
    /// Prompt only when no field flag was given.
    Hybrid,
}

impl InteractionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::NonInteractive => "non-interactive",
            Self::Hybrid => "hybrid",
        }
    }
}

/// Fields supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Positional subject.
    pub subject: Option<String>,
    pub commit_type: Option<String>,
    pub scope: Option<String>,
    pub breaking: bool,
    /// Used as the subject when no positional subject is given.
    pub description: Option<String>,
    pub body: Option<String>,
    /// Complete message, used verbatim.
    pub full_message: Option<String>,
}

impl CommitOptions {
    /// Whether any field flag other than `--type` was given.
    ///
    /// `--type` only ever seeds the type, so on its own it does not switch
    /// hybrid mode to non-interactive.
    pub fn has_field_flags(&self) -> bool {
        self.subject.is_some()
            || self.scope.is_some()
            || self.breaking
            || self.description.is_some()
            || self.body.is_some()
            || self.full_message.is_some()
    }

    fn subject_text(&self) -> Option<&str> {
        self.subject
            .as_deref()
            .or(self.description.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Result of assembly: either a structured commit or a verbatim override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembled {
    Structured(StructuredCommit),
    Verbatim(String),
}

impl Assembled {
    /// The final commit message.
    pub fn message(&self) -> String {
        match self {
            Self::Structured(commit) => commit.render(),
            Self::Verbatim(message) => message.clone(),
        }
    }
}

/// Resolves hybrid mode against the supplied options.
pub fn effective_mode(mode: InteractionMode, options: &CommitOptions) -> InteractionMode {
    match mode {
        InteractionMode::Hybrid if options.has_field_flags() => InteractionMode::NonInteractive,
        InteractionMode::Hybrid => InteractionMode::Interactive,
        other => other,
    }
}

/// Builds the commit message for the `commit` command.
///
/// # Errors
///
/// * [`Error::InvalidType`] when `--type` is not a known type in
///   non-interactive mode.
/// * [`Error::MissingSubject`] when non-interactive mode has no subject.
/// * [`Error::Prompt`] when a prompt fails.
pub fn assemble<P: Prompter + ?Sized>(
    options: &CommitOptions,
    mode: InteractionMode,
    prompter: &mut P,
    catalog: &Catalog,
) -> Result<Assembled> {
    if let Some(message) = options.full_message.as_deref().filter(|m| !m.trim().is_empty()) {
        debug!("using full message override");
        return Ok(Assembled::Verbatim(message.to_string()));
    }

    let mode = effective_mode(mode, options);
    debug!("assembling commit in {} mode", mode.as_str());

    match mode {
        InteractionMode::NonInteractive => from_flags(options).map(Assembled::Structured),
        _ => {
            let defaults = prompt_defaults(options);
            collect_fields(prompter, catalog, &defaults).map(Assembled::Structured)
        }
    }
}

fn from_flags(options: &CommitOptions) -> Result<StructuredCommit> {
    let commit_type = match options.commit_type.as_deref() {
        Some(t) => t.parse::<CommitType>().map_err(|_| Error::InvalidType {
            given: t.to_string(),
            valid: CommitType::valid_list(),
        })?,
        None => CommitType::Feat,
    };

    let commit = StructuredCommit {
        commit_type,
        scope: options.scope.as_deref().and_then(normalize_scope),
        breaking: options.breaking,
        subject: options.subject_text().unwrap_or_default().to_string(),
        body: non_empty(options.body.as_deref()),
    };

    if !commit.is_complete() {
        return Err(Error::MissingSubject);
    }
    Ok(commit)
}

fn prompt_defaults(options: &CommitOptions) -> StructuredCommit {
    let commit_type = match options.commit_type.as_deref().map(str::parse::<CommitType>) {
        Some(Ok(t)) => t,
        Some(Err(e)) => {
            warn!("{}; defaulting the type prompt to feat", e);
            CommitType::Feat
        }
        None => CommitType::Feat,
    };

    StructuredCommit {
        commit_type,
        scope: options.scope.as_deref().and_then(normalize_scope),
        breaking: options.breaking,
        subject: options.subject_text().unwrap_or_default().to_string(),
        body: non_empty(options.body.as_deref()),
    }
}

/// Prompts for every field, in the order type, subject, scope, breaking, body.
///
/// `defaults` pre-fills each prompt. Also used by the rewrite planner's edit
/// flow, seeded with the parsed suggestion.
pub fn collect_fields<P: Prompter + ?Sized>(
    prompter: &mut P,
    catalog: &Catalog,
    defaults: &StructuredCommit,
) -> Result<StructuredCommit> {
    let items: Vec<String> = CommitType::ALL
        .iter()
        .map(|t| format!("{}: {}", t, catalog.type_description(*t)))
        .collect();
    let default_index = CommitType::ALL
        .iter()
        .position(|t| *t == defaults.commit_type)
        .unwrap_or(0);
    let picked = prompter.select(catalog.text(Msg::SelectType), &items, default_index)?;
    let commit_type = CommitType::ALL
        .get(picked)
        .copied()
        .unwrap_or(defaults.commit_type);

    let subject = ask_required(
        prompter,
        catalog.text(Msg::EnterSubject),
        catalog.text(Msg::SubjectRequired),
        &defaults.subject,
    )?;

    let scope = prompter.input(
        catalog.text(Msg::EnterScope),
        defaults.scope.as_deref().unwrap_or(""),
    )?;

    let breaking = prompter.confirm(catalog.text(Msg::IsBreaking), defaults.breaking)?;

    let body = prompter.input(
        catalog.text(Msg::EnterBody),
        defaults.body.as_deref().unwrap_or(""),
    )?;

    let commit = StructuredCommit {
        commit_type,
        scope: normalize_scope(&scope),
        breaking,
        subject,
        body: non_empty(Some(&body)),
    };
    debug_assert!(commit.is_complete(), "ask_required returned a blank subject");
    Ok(commit)
}

/// Lower-cases a scope and reduces it to letters, digits and hyphens so the
/// rendered header stays within the grammar. Returns `None` when nothing is
/// left.
pub fn normalize_scope(raw: &str) -> Option<String> {
    let mut scope = String::new();
    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            scope.push(c);
        } else if (c.is_whitespace() || c == '-' || c == '_' || c == '/') && !scope.ends_with('-')
        {
            scope.push('-');
        }
    }
    let scope = scope.trim_matches('-');
    (!scope.is_empty()).then(|| scope.to_string())
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
