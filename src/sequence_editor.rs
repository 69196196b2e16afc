use std::{
    fs::{File, read_to_string},
    io::Write,
    path::Path,
};

use crate::error::{Error, Result};

/// Shortest abbreviated hash accepted as a match in the todo list.
const MIN_ABBREV: usize = 4;

/// Entry point used when the binary runs as `GIT_SEQUENCE_EDITOR`.
///
/// Git invokes the editor as `<exe> --sequence-editor <target> <todo-file>`,
/// where `<target>` is the full hash of the commit to stop at.
///
/// # Errors
///
/// Returns [`Error::SequenceEditor`] if either argument is missing, if the
/// todo file cannot be rewritten, or if no line replays the target.
pub fn run(target: Option<&str>, todo_path: Option<&str>) -> Result<()> {
    let target = target.ok_or_else(|| Error::SequenceEditor("missing target commit".into()))?;
    let path = todo_path.ok_or_else(|| Error::SequenceEditor("missing todo file path".into()))?;
    rewrite(Path::new(path), target)
}

/// Reads the todo file at `path`, inserts a `break` right after the line
/// that replays `target`, and writes the result back.
///
/// The target may be replayed by a `pick` or, under `--rebase-merges`, by a
/// `merge -C`. Stopping after it leaves the recreated commit at `HEAD` ready
/// to be amended. Every other line, comments included, is kept unchanged.
pub fn rewrite(path: &Path, target: &str) -> Result<()> {
    let body = read_to_string(path)
        .map_err(|e| Error::SequenceEditor(format!("read failed: {}", e)))?;

    let mut marked = false;
    let mut out = Vec::new();
    for line in body.lines() {
        out.push(line.to_string());
        if !marked && replays(line, target) {
            let indent = &line[..line.len() - line.trim_start().len()];
            out.push(format!("{}break", indent));
            marked = true;
        }
    }

    if !marked {
        return Err(Error::SequenceEditor(format!(
            "no pick or merge line for commit {} in todo list",
            target
        )));
    }

    let transformed = out.join("\n") + "\n";
    let mut file = File::create(path)
        .map_err(|e| Error::SequenceEditor(format!("create failed: {}", e)))?;
    file.write_all(transformed.as_bytes())
        .map_err(|e| Error::SequenceEditor(format!("write failed: {}", e)))
}

/// Whether a todo line recreates `target`.
///
/// Matches `pick <hash>` (or `p`) and `merge -C <hash>` / `merge -c <hash>`
/// (or `m`), where `<hash>` abbreviates `target`.
fn replays(line: &str, target: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return false;
    }

    let mut words = trimmed.split_whitespace();
    let hash = match words.next() {
        Some("pick" | "p") => words.next(),
        Some("merge" | "m") => match words.next() {
            Some("-C" | "-c") => words.next(),
            _ => None,
        },
        _ => None,
    };

    hash.is_some_and(|h| hash_matches(h, target))
}

fn hash_matches(abbrev: &str, target: &str) -> bool {
    abbrev.len() >= MIN_ABBREV
        && abbrev.chars().all(|c| c.is_ascii_hexdigit())
        && target.to_ascii_lowercase().starts_with(&abbrev.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{replays, run};
    use std::io::{Read, Write};

    const TARGET: &str = "abc1234def5678abc1234def5678abc1234def56";

    fn run_on(todo: &str) -> String {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        write!(file, "{}", todo).expect("failed to write");
        let path = file.path().to_path_buf();

        run(Some(TARGET), path.to_str()).expect("sequence editor run failed");

        let mut s = String::new();
        let mut f = std::fs::File::open(&path).expect("failed to open file");
        f.read_to_string(&mut s).expect("failed to read file");
        s
    }

    #[test]
    fn breaks_after_target_pick() {
        let out = run_on(
            "pick 1111111 First\npick abc1234 Target message\npick 2222222 Third\n# pick abc1234 in a comment\n",
        );
        assert_eq!(
            out,
            "pick 1111111 First\npick abc1234 Target message\nbreak\npick 2222222 Third\n# pick abc1234 in a comment\n"
        );
    }

    #[test]
    fn breaks_after_target_merge() {
        let out = run_on(
            "label onto\nreset onto\npick 1111111 Side\nlabel side\nreset onto\nmerge -C abc1234 side # Merge branch 'side'\npick 2222222 Tip\n",
        );
        assert_eq!(
            out,
            "label onto\nreset onto\npick 1111111 Side\nlabel side\nreset onto\nmerge -C abc1234 side # Merge branch 'side'\nbreak\npick 2222222 Tip\n"
        );
    }

    #[test]
    fn missing_target_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        writeln!(file, "pick 1111111 First").expect("failed to write");
        let path = file.path().to_path_buf();

        assert!(run(Some(TARGET), path.to_str()).is_err());
    }

    #[test]
    fn replays_accepts_short_commands() {
        assert!(replays("p abc1234 Commit message", TARGET));
        assert!(replays("m -c abc1234 side", TARGET));
        assert!(replays("\t  pick abc1234 Commit message", TARGET));
    }

    #[test]
    fn replays_ignores_other_lines() {
        assert!(!replays("pick 9999999 Other", TARGET));
        assert!(!replays("squash abc1234 Commit message", TARGET));
        assert!(!replays("merge abc1234", TARGET));
        assert!(!replays("label abc1234", TARGET));
        assert!(!replays("# pick abc1234", TARGET));
        assert!(!replays("pick abc Commit", TARGET));
    }

    #[test]
    fn run_without_arguments_returns_error() {
        assert!(run(None, Some("todo")).is_err());
        assert!(run(Some(TARGET), None).is_err());
    }
}
