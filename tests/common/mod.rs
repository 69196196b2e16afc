#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use gitqq::error::{Error, Result};
use gitqq::git::SystemGit;
use gitqq::prompt::Prompter;
use tempfile::TempDir;

/// A throwaway repository with a local identity and signing disabled.
pub struct TestRepo {
    dir: TempDir,
    counter: usize,
}

impl TestRepo {
    /// `None` when `git` is not installed, so callers can skip.
    pub fn new() -> Option<Self> {
        which::which("git").ok()?;
        let repo = Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
            counter: 0,
        };
        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.name", "Test Author"]);
        repo.git(&["config", "user.email", "author@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        Some(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runs git in the repository and returns trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let out = Command::new("git")
            .current_dir(self.path())
            .args(args)
            .output()
            .expect("failed to spawn git");
        assert!(
            out.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).trim().to_string()
    }

    /// Changes a file and commits it with `message`. Returns the new hash.
    pub fn commit(&mut self, message: &str) -> String {
        self.commit_with_env(message, &[])
    }

    /// Like [`TestRepo::commit`], with author and committer dated `date`.
    pub fn commit_at(&mut self, message: &str, date: &str) -> String {
        self.commit_with_env(
            message,
            &[("GIT_AUTHOR_DATE", date), ("GIT_COMMITTER_DATE", date)],
        )
    }

    fn commit_with_env(&mut self, message: &str, envs: &[(&str, &str)]) -> String {
        self.counter += 1;
        fs::write(
            self.path().join(format!("file{}.txt", self.counter)),
            format!("change {}\n", self.counter),
        )
        .expect("failed to write file");
        self.git(&["add", "--all"]);

        let out = Command::new("git")
            .current_dir(self.path())
            .args(["commit", "-q", "-m", message])
            .envs(envs.iter().copied())
            .output()
            .expect("failed to spawn git");
        assert!(
            out.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        self.git(&["rev-parse", "HEAD"])
    }

    /// Commit subjects, oldest first.
    pub fn subjects(&self) -> Vec<String> {
        self.git(&["log", "--reverse", "--format=%s"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Subjects along first-parent history, oldest first.
    pub fn first_parent_subjects(&self) -> Vec<String> {
        self.git(&["log", "--first-parent", "--reverse", "--format=%s"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Gateway bound to this repository, using the built binary as
    /// sequence editor.
    pub fn system_git(&self) -> SystemGit {
        SystemGit::new()
            .with_workdir(self.path())
            .with_editor(env!("CARGO_BIN_EXE_gitqq"))
    }

    /// Runs the `gitqq` binary inside the repository.
    pub fn gitqq(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gitqq"))
            .current_dir(self.path())
            .env("HOME", self.path())
            .args(args)
            .output()
            .expect("failed to spawn gitqq")
    }
}

/// Answers handed out in order by [`Scripted`].
pub enum Reply {
    Text(&'static str),
    Confirm(bool),
    Select(usize),
}

/// Prompter that replays a fixed list of replies.
pub struct Scripted {
    replies: VecDeque<Reply>,
}

impl Scripted {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.replies.is_empty()
    }

    fn next(&mut self, prompt: &str) -> Result<Reply> {
        self.replies
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("unexpected prompt: {}", prompt)))
    }
}

impl Prompter for Scripted {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        match self.next(prompt)? {
            Reply::Text("") => Ok(default.to_string()),
            Reply::Text(s) => Ok(s.to_string()),
            _ => Err(Error::Prompt(format!("expected text for: {}", prompt))),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Reply::Confirm(b) => Ok(b),
            _ => Err(Error::Prompt(format!("expected confirm for: {}", prompt))),
        }
    }

    fn select(&mut self, prompt: &str, _items: &[String], _default: usize) -> Result<usize> {
        match self.next(prompt)? {
            Reply::Select(i) => Ok(i),
            _ => Err(Error::Prompt(format!("expected select for: {}", prompt))),
        }
    }
}
