use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Separates records in the `git log` output.
const RECORD_SEP: char = '\u{1e}';
/// Separates the hash from the message inside a record.
const FIELD_SEP: char = '\u{0}';

/// A commit as read from history: its full hash and raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalCommit {
    pub hash: String,
    pub message: String,
}

impl HistoricalCommit {
    /// The seven-character abbreviation shown to users.
    pub fn short_hash(&self) -> &str {
        short(&self.hash)
    }
}

/// Seven-character abbreviation of a hash.
pub fn short(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// Extra switches for [`GitGateway::commit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitFlags {
    pub allow_empty: bool,
}

/// Abstraction over the repository operations the tool performs.
///
/// [`SystemGit`] drives the real `git` binary; tests substitute an
/// in-memory history.
pub trait GitGateway {
    /// `git status --porcelain`, one entry per changed path.
    fn status(&self) -> Result<Vec<String>>;

    /// Initialise a repository in the working directory.
    fn init(&mut self) -> Result<()>;

    /// Stage `paths`, or every change when `paths` is empty.
    fn add(&mut self, paths: &[&str]) -> Result<()>;

    /// Create a commit with `message`.
    fn commit(&mut self, message: &str, flags: CommitFlags) -> Result<()>;

    /// Resolve `rev` to a full commit hash.
    ///
    /// Fails with [`Error::UnknownCommit`] if it does not name a commit.
    fn show(&self, rev: &str) -> Result<String>;

    /// Commits in `(from, to]`, oldest first, following first parents.
    fn log(&self, from: &str, to: &str) -> Result<Vec<HistoricalCommit>>;

    /// Replace the message of the commit named by `rev`, keeping its tree,
    /// author and author date. Returns the rewritten commit's new hash.
    ///
    /// Every descendant is rewritten too, so their hashes change.
    fn rewrite_message(&mut self, rev: &str, message: &str) -> Result<String>;
}

/// [`GitGateway`] backed by the `git` executable.
///
/// Every command is spawned with an argument vector; commit messages are
/// passed as single arguments and never pass through a shell.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
    editor_exe: Option<PathBuf>,
}

impl SystemGit {
    /// Operate on the repository containing the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operate on the repository at `dir` instead of the current directory.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Executable to use as `GIT_SEQUENCE_EDITOR` during rewrites.
    ///
    /// Defaults to the running executable, which must understand
    /// `--sequence-editor <hash> <todo-file>`.
    pub fn with_editor(mut self, exe: impl Into<PathBuf>) -> Self {
        self.editor_exe = Some(exe.into());
        self
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    /// Absolute path of the `.git` directory.
    pub fn git_dir(&self) -> Result<PathBuf> {
        let mut cmd = self.git();
        cmd.arg("rev-parse").arg("--absolute-git-dir");
        run_output(cmd)
            .map(PathBuf::from)
            .map_err(|e| Error::gateway("rev-parse --absolute-git-dir", e))
    }

    fn editor_exe(&self) -> std::result::Result<PathBuf, String> {
        match &self.editor_exe {
            Some(p) => Ok(p.clone()),
            None => std::env::current_exe()
                .map_err(|e| format!("cannot locate current executable: {}", e)),
        }
    }

    fn has_parent(&self, hash: &str) -> bool {
        let mut cmd = self.git();
        cmd.arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("{}^", hash));
        run_output(cmd).is_ok()
    }

    /// Committer name, email and date of `hash`, as the `GIT_COMMITTER_*`
    /// variables that reproduce them.
    fn committer_env(
        &self,
        hash: &str,
    ) -> std::result::Result<Vec<(&'static str, String)>, String> {
        let mut cmd = self.git();
        cmd.arg("log")
            .arg("-1")
            .arg("--format=%cn%x00%ce%x00%cI")
            .arg(hash)
            .arg("--");
        let out = run_output(cmd)
            .map_err(|e| format!("cannot read committer of {}: {}", short(hash), e))?;
        let mut fields = out.splitn(3, FIELD_SEP);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(email), Some(date)) => Ok(vec![
                ("GIT_COMMITTER_NAME", name.to_string()),
                ("GIT_COMMITTER_EMAIL", email.to_string()),
                ("GIT_COMMITTER_DATE", date.to_string()),
            ]),
            _ => Err(format!("unexpected committer line for {}: {:?}", short(hash), out)),
        }
    }

    /// Steps of a single message rewrite. Any error leaves a rebase in
    /// progress for the caller to abort.
    ///
    /// The rebase stops right after the target is replayed, so the amend
    /// works the same for ordinary and merge commits. The amend keeps the
    /// target's committer; descendants are recommitted by the rebase and get
    /// the current committer date.
    fn rewrite_steps(
        &self,
        hash: &str,
        message: &str,
        git_dir: &Path,
    ) -> std::result::Result<(), String> {
        let exe = self.editor_exe()?;
        let committer = self.committer_env(hash)?;

        let mut rebase = self.git();
        rebase
            .arg("rebase")
            .arg("--interactive")
            .arg("--rebase-merges")
            .arg("--no-autosquash");
        if self.has_parent(hash) {
            rebase.arg(format!("{}^", hash));
        } else {
            rebase.arg("--root");
        }
        rebase.env(
            "GIT_SEQUENCE_EDITOR",
            build_sequence_editor_env(&exe.to_string_lossy(), hash),
        );
        rebase.env("GIT_EDITOR", "true");
        run_output(rebase).map_err(|e| format!("`git rebase -i` failed: {}", e))?;

        if !rebase_in_progress(git_dir) {
            return Err(String::from("rebase finished without stopping at the commit"));
        }

        let mut amend = self.git();
        amend
            .arg("commit")
            .arg("--amend")
            .arg("--allow-empty")
            .arg("--no-verify")
            .arg("--cleanup=whitespace")
            .arg("--message")
            .arg(message);
        amend.envs(committer);
        run_output(amend).map_err(|e| format!("`git commit --amend` failed: {}", e))?;

        let mut cont = self.git();
        cont.arg("rebase").arg("--continue");
        cont.env("GIT_EDITOR", "true");
        run_output(cont).map_err(|e| format!("`git rebase --continue` failed: {}", e))?;

        if rebase_in_progress(git_dir) {
            return Err(String::from("rebase stopped again after the rewritten commit"));
        }
        Ok(())
    }

    fn abort_rebase(&self) {
        let mut cmd = self.git();
        cmd.arg("rebase").arg("--abort");
        if let Err(e) = run_output(cmd) {
            warn!("`git rebase --abort` failed: {}", e);
        }
    }
}

impl GitGateway for SystemGit {
    fn status(&self) -> Result<Vec<String>> {
        let mut cmd = self.git();
        cmd.arg("status").arg("--porcelain");
        let out = run_output(cmd).map_err(|e| Error::gateway("status", e))?;
        Ok(out
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    fn init(&mut self) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("init");
        run_status(cmd).map_err(|e| Error::gateway("init", e))
    }

    fn add(&mut self, paths: &[&str]) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("add").arg("--all");
        if !paths.is_empty() {
            cmd.arg("--").args(paths);
        }
        run_status(cmd).map_err(|e| Error::gateway("add", e))
    }

    fn commit(&mut self, message: &str, flags: CommitFlags) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("commit").arg("--message").arg(message);
        if flags.allow_empty {
            cmd.arg("--allow-empty");
        }
        debug!("git commit ({} bytes, allow_empty={})", message.len(), flags.allow_empty);
        run_status(cmd).map_err(|e| Error::gateway("commit", e))
    }

    fn show(&self, rev: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg("--end-of-options")
            .arg(format!("{}^{{commit}}", rev));
        run_output(cmd).map_err(|e| {
            debug!("could not resolve {}: {}", rev, e);
            Error::UnknownCommit(rev.to_string())
        })
    }

    fn log(&self, from: &str, to: &str) -> Result<Vec<HistoricalCommit>> {
        let mut cmd = self.git();
        cmd.arg("log")
            .arg("--first-parent")
            .arg("--reverse")
            .arg("--format=%H%x00%B%x1e")
            .arg(format!("{}..{}", from, to))
            .arg("--");
        let out = run_output(cmd).map_err(|e| Error::gateway("log", e))?;
        Ok(parse_log(&out))
    }

    fn rewrite_message(&mut self, rev: &str, message: &str) -> Result<String> {
        let fail = |reason: String| Error::RewriteFailed {
            hash: rev.to_string(),
            reason,
        };

        let hash = self.show(rev).map_err(|e| fail(e.to_string()))?;
        let git_dir = self.git_dir().map_err(|e| fail(e.to_string()))?;
        if rebase_in_progress(&git_dir) {
            return Err(fail(String::from("a rebase is already in progress")));
        }

        info!("rewriting message of {}", short(&hash));
        if let Err(reason) = self.rewrite_steps(&hash, message, &git_dir) {
            if rebase_in_progress(&git_dir) {
                self.abort_rebase();
            }
            return Err(Error::RewriteFailed {
                hash: short(&hash).to_string(),
                reason,
            });
        }

        self.show(rev).map_err(|e| fail(e.to_string()))
    }
}

/// Splits `git log --format=%H%x00%B%x1e` output into commits.
fn parse_log(out: &str) -> Vec<HistoricalCommit> {
    out.split(RECORD_SEP)
        .filter_map(|record| {
            let record = record.trim_start_matches(['\n', '\r']);
            let (hash, message) = record.split_once(FIELD_SEP)?;
            let hash = hash.trim();
            if hash.is_empty() {
                return None;
            }
            Some(HistoricalCommit {
                hash: hash.to_string(),
                message: message.trim_end().to_string(),
            })
        })
        .collect()
}

/// Builds the value for the `GIT_SEQUENCE_EDITOR` environment variable.
///
/// Git runs this value through a shell and appends the todo file path, so
/// `exe_path` is quoted if it contains spaces. `target` is a hex hash and
/// needs no quoting.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     build_sequence_editor_env("/usr/local/bin/gitqq", "abc123"),
///     "/usr/local/bin/gitqq --sequence-editor abc123"
/// );
/// ```
pub(crate) fn build_sequence_editor_env(exe_path: &str, target: &str) -> String {
    let quoted = if exe_path.contains(' ') {
        format!("\"{}\"", exe_path)
    } else {
        exe_path.to_string()
    };

    format!("{quoted} --sequence-editor {target}")
}

/// Runs a command and returns only its exit status.
///
/// Returns `Err` with the trimmed stderr (or the spawn error) on failure.
fn run_status(cmd: Command) -> std::result::Result<(), String> {
    run_output(cmd).map(|_| ())
}

/// Runs a command and returns its trimmed standard output on success,
/// or its trimmed standard error as an `Err` on failure.
///
/// If the process fails to spawn, the I/O error message is returned.
fn run_output(mut cmd: Command) -> std::result::Result<String, String> {
    match cmd.output() {
        Ok(out) => {
            if out.status.success() {
                Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
            } else {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                if stderr.is_empty() {
                    Err(String::from("non-zero exit"))
                } else {
                    Err(stderr)
                }
            }
        }
        Err(e) => Err(format!("{}", e)),
    }
}

/// Detects if a Git rebase is currently in progress.
///
/// Checks for the `rebase-merge` or `rebase-apply` directories inside
/// `git_dir`, which git creates for interactive and apply-style rebases.
pub fn rebase_in_progress(git_dir: &Path) -> bool {
    git_dir.join("rebase-merge").exists() || git_dir.join("rebase-apply").exists()
}
