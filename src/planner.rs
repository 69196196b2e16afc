//! Reformatting historical commit messages.
//!
//! The planner walks a commit range, suggests a conventional message for
//! every commit that does not already have one, lets the user accept, edit
//! or skip each suggestion, and finally rewrites the accepted ones.
//!
//! Rewrites are applied one commit at a time, oldest first. A failure on one
//! commit is reported and the loop moves on; there is no rollback.

use console::style;
use tracing::{debug, info};

use crate::assemble::collect_fields;
use crate::banner::print_banner;
use crate::classify::classify;
use crate::error::Result;
use crate::git::{GitGateway, short};
use crate::grammar;
use crate::messages::{Catalog, Msg};
use crate::prompt::Prompter;

pub use crate::git::HistoricalCommit;

/// Where a decision stands. Skipped decisions are removed rather than
/// flagged, and nothing ever returns to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStatus {
    Pending,
    Accepted,
}

/// A proposed message change for one non-conventional commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteDecision {
    /// Hash at planning time.
    pub hash: String,
    /// Number of first-parent commits between this one and the range tip.
    /// Stays valid while older commits are rewritten, unlike `hash`.
    pub offset: usize,
    pub old_message: String,
    pub new_message: String,
    pub status: DecisionStatus,
}

/// Per-commit answer during review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Edit,
    Skip,
}

impl ReviewAction {
    const ALL: [ReviewAction; 3] = [Self::Accept, Self::Edit, Self::Skip];

    fn label(self, catalog: &Catalog) -> String {
        let msg = match self {
            Self::Accept => Msg::AcceptSuggestion,
            Self::Edit => Msg::EditSuggestion,
            Self::Skip => Msg::SkipCommit,
        };
        catalog.text(msg).to_string()
    }
}

/// A commit whose message was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRewrite {
    pub old_hash: String,
    pub new_hash: String,
}

/// A commit whose rewrite failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRewrite {
    pub hash: String,
    pub reason: String,
}

/// Result of [`Planner::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub rewritten: Vec<AppliedRewrite>,
    pub failed: Vec<FailedRewrite>,
}

/// How a `format-commits` run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Every commit in range already conforms.
    NothingToDo,
    /// The user skipped every suggestion.
    NothingSelected,
    /// The user declined the final confirmation.
    Cancelled,
    Applied(ApplyReport),
}

/// Plans and applies message rewrites against a [`GitGateway`].
pub struct Planner<'a, G: GitGateway + ?Sized> {
    git: &'a mut G,
    catalog: Catalog,
}

impl<'a, G: GitGateway + ?Sized> Planner<'a, G> {
    pub fn new(git: &'a mut G, catalog: Catalog) -> Self {
        Self { git, catalog }
    }

    /// Collects a pending decision for every non-conventional commit in
    /// `(from, to]`, oldest first.
    ///
    /// `to` should be a symbolic ref such as `HEAD` or a branch name, since
    /// [`apply`](Self::apply) addresses commits relative to it after earlier
    /// rewrites have changed their hashes.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCommit`](crate::error::Error::UnknownCommit) if either
    /// end of the range does not resolve; gateway errors from `git log`.
    pub fn plan(&mut self, from: &str, to: &str) -> Result<Vec<RewriteDecision>> {
        self.git.show(from)?;
        self.git.show(to)?;

        let commits = self.git.log(from, to)?;
        if commits.is_empty() {
            println!("{}", style(self.catalog.text(Msg::NoCommits)).yellow());
            return Ok(Vec::new());
        }

        println!(
            "{}",
            self.catalog.format(Msg::FoundCommits, &[&commits.len()])
        );

        let total = commits.len();
        let mut decisions = Vec::new();
        for (i, commit) in commits.iter().enumerate() {
            let first = first_line(&commit.message);

            if grammar::matches(&commit.message) {
                println!(
                    "{}",
                    style(self.catalog.format(
                        Msg::AlreadyConventional,
                        &[&commit.short_hash(), &first]
                    ))
                    .dim()
                );
                continue;
            }

            let suggestion = classify(&commit.message).render();
            println!(
                "{}",
                self.catalog.format(
                    Msg::SuggestedChange,
                    &[&commit.short_hash(), &first, &first_line(&suggestion)]
                )
            );

            decisions.push(RewriteDecision {
                hash: commit.hash.clone(),
                offset: total - 1 - i,
                old_message: commit.message.clone(),
                new_message: suggestion,
                status: DecisionStatus::Pending,
            });
        }

        debug!("{} of {} commits need a new message", decisions.len(), total);
        Ok(decisions)
    }

    /// Asks the user about every pending decision and returns the accepted
    /// ones, in their original order. Skipped decisions are dropped.
    ///
    /// Editing re-runs the commit field prompts, pre-filled with the parsed
    /// suggestion.
    pub fn review<P: Prompter + ?Sized>(
        &self,
        decisions: Vec<RewriteDecision>,
        prompter: &mut P,
    ) -> Result<Vec<RewriteDecision>> {
        let total = decisions.len();
        let labels: Vec<String> = ReviewAction::ALL
            .iter()
            .map(|a| a.label(&self.catalog))
            .collect();

        let mut accepted = Vec::with_capacity(total);
        for (i, mut decision) in decisions.into_iter().enumerate() {
            if decision.status != DecisionStatus::Pending {
                accepted.push(decision);
                continue;
            }

            println!();
            println!(
                "{}",
                style(self.catalog.format(Msg::ReviewingCommit, &[&(i + 1), &total])).bold()
            );
            println!(
                "{}",
                style(self.catalog.format(Msg::OriginalCommit, &[&decision.old_message])).red()
            );
            println!(
                "{}",
                style(self.catalog.format(Msg::SuggestedCommit, &[&decision.new_message])).green()
            );

            let picked = prompter.select(self.catalog.text(Msg::CommitAction), &labels, 0)?;
            match ReviewAction::ALL.get(picked).copied().unwrap_or(ReviewAction::Skip) {
                ReviewAction::Accept => {
                    decision.status = DecisionStatus::Accepted;
                    accepted.push(decision);
                }
                ReviewAction::Edit => {
                    let defaults = grammar::parse(&decision.new_message)
                        .unwrap_or_else(|| classify(&decision.old_message));
                    let edited = collect_fields(prompter, &self.catalog, &defaults)?;
                    decision.new_message = edited.render();
                    decision.status = DecisionStatus::Accepted;
                    accepted.push(decision);
                }
                ReviewAction::Skip => {
                    debug!("skipped {}", short(&decision.hash));
                }
            }
        }

        Ok(accepted)
    }

    /// Shows the accepted set and asks for a final go-ahead. Defaults to no.
    pub fn confirm<P: Prompter + ?Sized>(
        &self,
        accepted: &[RewriteDecision],
        prompter: &mut P,
    ) -> Result<bool> {
        let entries: Vec<String> = accepted
            .iter()
            .map(|d| {
                format!(
                    "{}: \"{}\" => \"{}\"",
                    short(&d.hash),
                    first_line(&d.old_message),
                    first_line(&d.new_message)
                )
            })
            .collect();
        print_banner(self.catalog.text(Msg::Summary), &entries);

        prompter.confirm(
            &self.catalog.format(Msg::ConfirmRewrite, &[&accepted.len()]),
            false,
        )
    }

    /// Rewrites every accepted decision, oldest first, addressing each one as
    /// `<to>~<offset>`.
    ///
    /// Failures are printed and recorded; the loop always runs to the end.
    pub fn apply(&mut self, accepted: &[RewriteDecision], to: &str) -> ApplyReport {
        println!("{}", style(self.catalog.text(Msg::ApplyingChanges)).cyan());

        let mut report = ApplyReport::default();
        for decision in accepted {
            let rev = format!("{}~{}", to, decision.offset);
            let old_short = short(&decision.hash);
            match self.git.rewrite_message(&rev, &decision.new_message) {
                Ok(new_hash) => {
                    info!("rewrote {} as {}", old_short, short(&new_hash));
                    println!(
                        "{}",
                        style(self.catalog.format(Msg::UpdatedCommit, &[&old_short])).green()
                    );
                    report.rewritten.push(AppliedRewrite {
                        old_hash: decision.hash.clone(),
                        new_hash,
                    });
                }
                Err(e) => {
                    eprintln!(
                        "{}",
                        style(self.catalog.format(Msg::ErrorUpdating, &[&old_short, &e]))
                            .red()
                            .bold()
                    );
                    report.failed.push(FailedRewrite {
                        hash: decision.hash.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        println!(
            "{}",
            self.catalog.format(
                Msg::ConversionComplete,
                &[&report.rewritten.len(), &report.failed.len()]
            )
        );
        println!(
            "{}",
            style(self.catalog.text(Msg::ForcePushWarning)).yellow().bold()
        );

        report
    }
}

/// Runs the whole `format-commits` flow: plan, review, confirm, apply.
///
/// # Errors
///
/// Fails before any prompt if `from` does not resolve. Prompt and gateway
/// errors abort the flow; per-commit rewrite failures do not.
pub fn format_commits<G, P>(
    git: &mut G,
    prompter: &mut P,
    catalog: Catalog,
    from: &str,
    to: &str,
) -> Result<FormatOutcome>
where
    G: GitGateway + ?Sized,
    P: Prompter + ?Sized,
{
    let mut planner = Planner::new(git, catalog);

    let decisions = planner.plan(from, to)?;
    if decisions.is_empty() {
        println!("{}", style(catalog.text(Msg::AllConventional)).green());
        return Ok(FormatOutcome::NothingToDo);
    }

    let accepted = planner.review(decisions, prompter)?;
    if accepted.is_empty() {
        println!("{}", style(catalog.text(Msg::NoCommitsSelected)).yellow());
        return Ok(FormatOutcome::NothingSelected);
    }

    if !planner.confirm(&accepted, prompter)? {
        println!("{}", style(catalog.text(Msg::OperationCancelled)).yellow().bold());
        return Ok(FormatOutcome::Cancelled);
    }

    Ok(FormatOutcome::Applied(planner.apply(&accepted, to)))
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::git::CommitFlags;
    use crate::grammar::BREAKING_FOOTER;
    use crate::messages::Language;
    use crate::prompt::testing::{Answer, ScriptedPrompter};

    /// Linear in-memory history, oldest first. Only understands `HEAD`,
    /// `HEAD~n` and full or abbreviated hashes.
    struct FakeGit {
        commits: Vec<HistoricalCommit>,
        rewrites: Vec<(String, String)>,
        fail_on: Option<String>,
        next_hash: usize,
    }

    impl FakeGit {
        fn with_messages(messages: &[&str]) -> Self {
            let commits = messages
                .iter()
                .enumerate()
                .map(|(i, m)| HistoricalCommit {
                    hash: format!("{:040x}", i + 1),
                    message: m.to_string(),
                })
                .collect();
            Self {
                commits,
                rewrites: Vec::new(),
                fail_on: None,
                next_hash: 0x1000,
            }
        }

        fn index_of(&self, rev: &str) -> Option<usize> {
            let last = self.commits.len().checked_sub(1)?;
            if rev == "HEAD" {
                return Some(last);
            }
            if let Some(n) = rev.strip_prefix("HEAD~") {
                return last.checked_sub(n.parse().ok()?);
            }
            self.commits
                .iter()
                .position(|c| rev.len() >= 4 && c.hash.starts_with(rev))
        }

        fn messages(&self) -> Vec<&str> {
            self.commits.iter().map(|c| c.message.as_str()).collect()
        }
    }

    impl GitGateway for FakeGit {
        fn status(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn init(&mut self) -> Result<()> {
            Ok(())
        }

        fn add(&mut self, _paths: &[&str]) -> Result<()> {
            Ok(())
        }

        fn commit(&mut self, _message: &str, _flags: CommitFlags) -> Result<()> {
            Ok(())
        }

        fn show(&self, rev: &str) -> Result<String> {
            self.index_of(rev)
                .map(|i| self.commits[i].hash.clone())
                .ok_or_else(|| Error::UnknownCommit(rev.to_string()))
        }

        fn log(&self, from: &str, to: &str) -> Result<Vec<HistoricalCommit>> {
            let start = self
                .index_of(from)
                .ok_or_else(|| Error::UnknownCommit(from.to_string()))?;
            let end = self
                .index_of(to)
                .ok_or_else(|| Error::UnknownCommit(to.to_string()))?;
            Ok(self.commits[start + 1..=end].to_vec())
        }

        fn rewrite_message(&mut self, rev: &str, message: &str) -> Result<String> {
            let idx = self
                .index_of(rev)
                .ok_or_else(|| Error::UnknownCommit(rev.to_string()))?;
            if self.fail_on.as_deref() == Some(self.commits[idx].message.as_str()) {
                return Err(Error::RewriteFailed {
                    hash: short(&self.commits[idx].hash).to_string(),
                    reason: "conflict".to_string(),
                });
            }
            self.rewrites.push((rev.to_string(), message.to_string()));
            self.commits[idx].message = message.to_string();
            // Descendants get new hashes, just like a real rebase.
            for commit in &mut self.commits[idx..] {
                self.next_hash += 1;
                commit.hash = format!("{:040x}", self.next_hash);
            }
            Ok(self.commits[idx].hash.clone())
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(Language::En)
    }

    fn base(git: &FakeGit) -> String {
        git.commits[0].hash.clone()
    }

    #[test]
    fn plan_skips_conforming_commits() {
        let mut git = FakeGit::with_messages(&[
            "initial",
            "fix bug in login",
            "feat: already fine",
            "Added readme",
        ]);
        let from = base(&git);
        let decisions = Planner::new(&mut git, catalog())
            .plan(&from, "HEAD")
            .expect("plan should succeed");

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].old_message, "fix bug in login");
        assert_eq!(decisions[0].new_message, "fix: Fix bug in login");
        assert_eq!(decisions[0].offset, 2);
        assert_eq!(decisions[1].new_message, "feat: Added readme");
        assert_eq!(decisions[1].offset, 0);
        assert!(decisions.iter().all(|d| d.status == DecisionStatus::Pending));
    }

    #[test]
    fn plan_renders_breaking_suggestions() {
        let mut git = FakeGit::with_messages(&["initial", "major api change"]);
        let from = base(&git);
        let decisions = Planner::new(&mut git, catalog())
            .plan(&from, "HEAD")
            .expect("plan should succeed");
        assert_eq!(
            decisions[0].new_message,
            format!("chore!: Major api change\n\n{}", BREAKING_FOOTER)
        );
    }

    #[test]
    fn unknown_start_fails_before_prompting() {
        let mut git = FakeGit::with_messages(&["initial", "wip"]);
        let mut prompter = ScriptedPrompter::default();
        let result = format_commits(&mut git, &mut prompter, catalog(), "deadbeef", "HEAD");
        assert!(matches!(result, Err(Error::UnknownCommit(ref r)) if r == "deadbeef"));
        assert!(prompter.seen.is_empty());
    }

    #[test]
    fn all_conforming_is_nothing_to_do() {
        let mut git = FakeGit::with_messages(&["initial", "fix: a", "docs(readme): b"]);
        let from = base(&git);
        let mut prompter = ScriptedPrompter::default();
        let outcome = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD")
            .expect("should succeed");
        assert_eq!(outcome, FormatOutcome::NothingToDo);
        assert!(git.rewrites.is_empty());
        assert!(prompter.seen.is_empty());
    }

    #[test]
    fn skipping_everything_is_nothing_selected() {
        let mut git = FakeGit::with_messages(&["initial", "wip", "more wip"]);
        let from = base(&git);
        let mut prompter = ScriptedPrompter::new([Answer::Select(2), Answer::Select(2)]);
        let outcome = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD")
            .expect("should succeed");
        assert_eq!(outcome, FormatOutcome::NothingSelected);
        assert!(git.rewrites.is_empty());
    }

    #[test]
    fn declining_confirmation_cancels() {
        let mut git = FakeGit::with_messages(&["initial", "wip"]);
        let from = base(&git);
        let mut prompter = ScriptedPrompter::new([Answer::Select(0), Answer::Default]);
        let outcome = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD")
            .expect("should succeed");
        assert_eq!(outcome, FormatOutcome::Cancelled);
        assert!(git.rewrites.is_empty());
        assert_eq!(git.messages(), vec!["initial", "wip"]);
    }

    #[test]
    fn accepted_rewrites_apply_oldest_first_and_are_idempotent() {
        let mut git = FakeGit::with_messages(&[
            "initial",
            "fix bug in login",
            "chore: fine",
            "update docs",
        ]);
        let from = base(&git);
        let mut prompter = ScriptedPrompter::new([
            Answer::Select(0),
            Answer::Select(0),
            Answer::Confirm(true),
        ]);
        let outcome = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD")
            .expect("should succeed");

        match outcome {
            FormatOutcome::Applied(report) => {
                assert_eq!(report.rewritten.len(), 2);
                assert!(report.failed.is_empty());
            }
            other => panic!("expected Applied, got {:?}", other),
        }
        assert_eq!(
            git.rewrites,
            vec![
                ("HEAD~2".to_string(), "fix: Fix bug in login".to_string()),
                ("HEAD~0".to_string(), "docs: Update docs".to_string()),
            ]
        );
        assert_eq!(
            git.messages(),
            vec!["initial", "fix: Fix bug in login", "chore: fine", "docs: Update docs"]
        );

        // The base commit keeps its hash, so the same range can be planned again.
        let again = Planner::new(&mut git, catalog())
            .plan(&from, "HEAD")
            .expect("second plan should succeed");
        assert!(again.is_empty());
    }

    #[test]
    fn edit_reprompts_with_suggestion_as_defaults() {
        let mut git = FakeGit::with_messages(&["initial", "fix bug in login"]);
        let from = base(&git);
        let mut prompter = ScriptedPrompter::new([
            Answer::Select(1),                       // edit
            Answer::Default,                         // type: fix (from suggestion)
            Answer::Text("handle empty password".to_string()),
            Answer::Text("auth".to_string()),
            Answer::Default,                         // breaking: false
            Answer::Default,                         // body: none
            Answer::Confirm(true),
        ]);
        let outcome = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD")
            .expect("should succeed");

        assert!(matches!(outcome, FormatOutcome::Applied(_)));
        assert_eq!(git.messages()[1], "fix(auth): handle empty password");
    }

    #[test]
    fn review_drops_skipped_and_keeps_order() {
        let mut git = FakeGit::with_messages(&["initial", "one", "two", "three"]);
        let from = base(&git);
        let planner_decisions = Planner::new(&mut git, catalog())
            .plan(&from, "HEAD")
            .expect("plan should succeed");

        let mut prompter = ScriptedPrompter::new([
            Answer::Select(0),
            Answer::Select(2),
            Answer::Select(0),
        ]);
        let accepted = Planner::new(&mut git, catalog())
            .review(planner_decisions, &mut prompter)
            .expect("review should succeed");

        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].old_message, "one");
        assert_eq!(accepted[1].old_message, "three");
        assert!(accepted.iter().all(|d| d.status == DecisionStatus::Accepted));
    }

    #[test]
    fn failed_rewrite_does_not_stop_the_loop() {
        let mut git = FakeGit::with_messages(&["initial", "first change", "second change"]);
        git.fail_on = Some("first change".to_string());
        let from = base(&git);
        let mut prompter = ScriptedPrompter::new([
            Answer::Select(0),
            Answer::Select(0),
            Answer::Confirm(true),
        ]);
        let outcome = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD")
            .expect("should succeed");

        match outcome {
            FormatOutcome::Applied(report) => {
                assert_eq!(report.rewritten.len(), 1);
                assert_eq!(report.failed.len(), 1);
                assert_eq!(report.failed[0].hash, format!("{:040x}", 2));
            }
            other => panic!("expected Applied, got {:?}", other),
        }
        assert_eq!(git.messages(), vec!["initial", "first change", "chore: Second change"]);
    }

    #[test]
    fn prompt_failure_aborts_review() {
        let mut git = FakeGit::with_messages(&["initial", "wip"]);
        let from = base(&git);
        let mut prompter = ScriptedPrompter::new([Answer::Fail]);
        let result = format_commits(&mut git, &mut prompter, catalog(), &from, "HEAD");
        assert!(matches!(result, Err(Error::Prompt(_))));
        assert!(git.rewrites.is_empty());
    }
}
