//! Best-effort classification of free-form commit messages.
//!
//! Used by the rewrite planner to suggest a conventional replacement for
//! historical messages that do not already match the grammar. The guess is
//! keyword based and is always shown to the user before anything is written.

use tracing::debug;

use crate::grammar::{CommitType, StructuredCommit};

/// Keyword rules, checked in order. The first rule with any keyword
/// contained in the lower-cased message decides the type.
const RULES: &[(&[&str], CommitType)] = &[
    (&["fix", "bug", "issue"], CommitType::Fix),
    (&["feat", "add", "new"], CommitType::Feat),
    (&["doc", "readme"], CommitType::Docs),
    (&["test"], CommitType::Test),
    (&["refactor", "clean"], CommitType::Refactor),
    (&["style", "format"], CommitType::Style),
    (&["perf", "performance"], CommitType::Perf),
    (&["build", "webpack", "package"], CommitType::Build),
    (&["ci", "travis", "github"], CommitType::Ci),
    (&["revert"], CommitType::Revert),
];

const BREAKING_KEYWORDS: &[&str] = &["break", "breaking", "major", "incompatible"];

/// Subject used when a message carries no usable text at all.
const FALLBACK_SUBJECT: &str = "Update";

/// Guesses a structured commit for a message that is not conventional yet.
///
/// Never fails: unknown messages become `chore`. The scope is never inferred.
/// The subject is taken from the first non-blank line, with a bare `type:`
/// prefix removed and the first letter capitalised; any further lines are
/// kept as the body.
pub fn classify(raw: &str) -> StructuredCommit {
    let lower = raw.to_lowercase();

    let mut commit_type = RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, t)| *t)
        .unwrap_or(CommitType::Chore);

    let breaking = BREAKING_KEYWORDS.iter().any(|k| lower.contains(k));

    let trimmed = raw.trim();
    let (head, rest) = match trimmed.split_once('\n') {
        Some((head, rest)) => (head.trim(), rest.trim()),
        None => (trimmed, ""),
    };

    let mut subject = head.to_string();
    for t in CommitType::ALL {
        // The prefix is ASCII, so its byte length is the same in `head`.
        let prefix = format!("{}:", t.as_str());
        if let Some(remainder) = strip_prefix_ignore_case(head, &prefix) {
            subject = remainder.trim().to_string();
            commit_type = t;
            break;
        }
    }

    if subject.is_empty() {
        subject = head.to_string();
    }
    if subject.is_empty() {
        subject = FALLBACK_SUBJECT.to_string();
    }

    let commit = StructuredCommit {
        commit_type,
        scope: None,
        breaking,
        subject: capitalize(&subject),
        body: (!rest.is_empty()).then(|| rest.to_string()),
    };

    debug!(
        "classified {:?} as {}{}",
        head,
        commit.commit_type,
        if breaking { " (breaking)" } else { "" }
    );

    commit
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fix_and_capitalizes() {
        let c = classify("fix bug in login");
        assert_eq!(c.commit_type, CommitType::Fix);
        assert!(!c.breaking);
        assert_eq!(c.subject, "Fix bug in login");
        assert_eq!(c.scope, None);
        assert_eq!(c.body, None);
    }

    #[test]
    fn earlier_rules_win() {
        // Contains both "add" (feat) and "test" (test); feat is checked first.
        assert_eq!(classify("add test helpers").commit_type, CommitType::Feat);
        // "bug" beats "readme".
        assert_eq!(classify("readme bug").commit_type, CommitType::Fix);
    }

    #[test]
    fn keyword_table() {
        let cases = [
            ("Update documentation links", CommitType::Docs),
            ("tests for parser", CommitType::Test),
            ("cleanup module layout", CommitType::Refactor),
            ("run formatter", CommitType::Style),
            ("improve performance of walker", CommitType::Perf),
            ("bump package versions", CommitType::Build),
            ("configure travis", CommitType::Ci),
            ("Revert previous change", CommitType::Revert),
            ("wip", CommitType::Chore),
        ];
        for (msg, expected) in cases {
            assert_eq!(classify(msg).commit_type, expected, "{}", msg);
        }
    }

    #[test]
    fn detects_breaking_keywords() {
        assert!(classify("major rework of storage").breaking);
        assert!(classify("make config incompatible").breaking);
        assert!(!classify("small tweak").breaking);
    }

    #[test]
    fn strips_degenerate_prefix() {
        let c = classify("Docs:tweak wording");
        assert_eq!(c.commit_type, CommitType::Docs);
        assert_eq!(c.subject, "Tweak wording");

        // Lower-casing `İ` grows it by a byte; the slice must not shift.
        let c = classify("fix:İstanbul locale bug");
        assert_eq!(c.commit_type, CommitType::Fix);
        assert_eq!(c.subject, "İstanbul locale bug");
    }

    #[test]
    fn prefix_overrides_keyword_guess() {
        // "fix" would win the keyword rules, but the explicit prefix says chore.
        let c = classify("chore:fix typo in script");
        assert_eq!(c.commit_type, CommitType::Chore);
        assert_eq!(c.subject, "Fix typo in script");
    }

    #[test]
    fn empty_remainder_keeps_original_line() {
        let c = classify("fix:");
        assert_eq!(c.commit_type, CommitType::Fix);
        assert_eq!(c.subject, "Fix:");
    }

    #[test]
    fn multi_line_message_keeps_body() {
        let c = classify("added cache\n\nSpeeds up lookups.\n");
        assert_eq!(c.commit_type, CommitType::Feat);
        assert_eq!(c.subject, "Added cache");
        assert_eq!(c.body.as_deref(), Some("Speeds up lookups."));
    }

    #[test]
    fn never_returns_empty_subject() {
        for msg in ["x", " ", "\n\n", "ünïcode message", "feat:", "   \t  "] {
            let c = classify(msg);
            assert!(!c.subject.is_empty(), "empty subject for {:?}", msg);
            assert!(CommitType::ALL.contains(&c.commit_type));
        }
    }
}
