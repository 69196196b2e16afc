use crate::assemble::{CommitOptions, InteractionMode, assemble};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::git::{CommitFlags, GitGateway, SystemGit};
use crate::grammar::{CommitType, StructuredCommit};
use crate::messages::{Catalog, Language, Msg};
use crate::planner::format_commits;
use crate::prompt::{DialoguerPrompter, Prompter};
use crate::sequence_editor;

use clap::{Args, Parser, Subcommand};
use console::style;
use std::env;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GITQQ_LOG";

/// Conventional commits without memorising the grammar.
#[derive(Parser, Debug)]
#[command(name = "gitqq", version, about)]
struct Cli {
    /// Display language for this invocation (overrides the config file)
    #[arg(long, global = true, value_enum)]
    lang: Option<Language>,

    /// Interaction mode for this invocation (overrides the config file)
    #[arg(long, global = true, value_enum)]
    mode: Option<InteractionMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stage all changes and create a conventional commit
    Commit(CommitArgs),

    /// Suggest conventional messages for existing commits and rewrite them
    FormatCommits {
        /// Commits after this one (up to HEAD) are examined
        from_commit: String,
    },

    /// Initialize a repository with an empty first commit
    Init,

    /// Show the active configuration
    Config,
}

#[derive(Args, Debug, Default)]
struct CommitArgs {
    /// Short description of the change
    subject: Option<String>,

    /// Commit type (feat, fix, docs, ...)
    #[arg(short = 't', long = "type")]
    commit_type: Option<String>,

    /// Scope of the change
    #[arg(short, long)]
    scope: Option<String>,

    /// Mark as a breaking change
    #[arg(short, long)]
    breaking: bool,

    /// Short description, used when no subject argument is given
    #[arg(short, long)]
    description: Option<String>,

    /// Longer explanation placed after the subject
    #[arg(long)]
    body: Option<String>,

    /// Complete commit message, used as-is
    #[arg(short = 'm', long)]
    full_message: Option<String>,

    /// Never prompt; take every field from the flags
    #[arg(long)]
    non_interactive: bool,

    /// Commit what is already staged instead of staging everything
    #[arg(long)]
    no_add: bool,
}

impl CommitArgs {
    fn options(&self) -> CommitOptions {
        CommitOptions {
            subject: self.subject.clone(),
            commit_type: self.commit_type.clone(),
            scope: self.scope.clone(),
            breaking: self.breaking,
            description: self.description.clone(),
            body: self.body.clone(),
            full_message: self.full_message.clone(),
        }
    }
}

/// Installs the `tracing` subscriber. Logs go to stderr, filtered by
/// `GITQQ_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second initialisation (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Verifies git is available and, if `require_repo`, that the working
/// directory is inside a repository.
fn verify_environment(git: &SystemGit, require_repo: bool) -> Result<()> {
    which::which("git").map_err(|_| Error::gateway("lookup", "`git` not found in PATH"))?;
    if require_repo {
        git.git_dir()
            .map_err(|e| Error::gateway("rev-parse", format!("not inside a git repo ({})", e)))?;
    }
    Ok(())
}

/// Whether porcelain status lines include anything staged in the index.
fn has_staged_changes(status: &[String]) -> bool {
    status.iter().any(|line| {
        let index = line.chars().next().unwrap_or(' ');
        index != ' ' && index != '?' && index != '!'
    })
}

/// Assembles a message, stages, and commits.
///
/// Assembly finishes before the first repository call, so a rejected
/// message leaves the repository untouched.
fn run_commit<G, P>(
    git: &mut G,
    prompter: &mut P,
    catalog: &Catalog,
    mode: InteractionMode,
    options: &CommitOptions,
    stage: bool,
) -> Result<i32>
where
    G: GitGateway + ?Sized,
    P: Prompter + ?Sized,
{
    let message = assemble(options, mode, prompter, catalog)?.message();

    if stage {
        git.add(&[])?;
    }

    if !has_staged_changes(&git.status()?) {
        println!("{}", style(catalog.text(Msg::NothingToCommit)).yellow());
        return Ok(1);
    }

    println!("{}", catalog.format(Msg::CreatingCommit, &[&message]));
    git.commit(&message, CommitFlags::default())?;
    println!("{}", style(catalog.text(Msg::CommitCreated)).green().bold());
    Ok(0)
}

/// Initialises a repository and records an empty, conventional first commit.
fn run_init<G: GitGateway + ?Sized>(git: &mut G, catalog: &Catalog) -> Result<i32> {
    println!("{}", catalog.text(Msg::InitStart));
    git.init()?;

    let message = StructuredCommit::new(CommitType::Chore, "initial commit").render();
    git.commit(&message, CommitFlags { allow_empty: true })?;

    println!("{}", style(catalog.text(Msg::InitDone)).green().bold());
    Ok(0)
}

fn run_config(config: &Config, catalog: &Catalog) -> Result<i32> {
    println!(
        "{}",
        catalog.format(Msg::CurrentLanguage, &[&config.language.code()])
    );
    println!(
        "{}",
        catalog.format(Msg::CurrentMode, &[&config.interaction.as_str()])
    );
    if let Some(path) = Config::path() {
        println!("{}", catalog.format(Msg::ConfigPath, &[&path.display()]));
    }
    Ok(0)
}

/// Localised, user-facing text for a command error.
fn describe(e: &Error, catalog: &Catalog) -> String {
    match e {
        Error::InvalidType { given, valid } => catalog.format(Msg::InvalidType, &[given, valid]),
        Error::MissingSubject => catalog.text(Msg::MissingSubject).to_string(),
        Error::UnknownCommit(rev) => catalog.format(Msg::UnknownCommit, &[rev]),
        Error::Gateway { .. } => catalog.format(Msg::GatewayFailure, &[e]),
        Error::Prompt(reason) => catalog.format(Msg::PromptFailure, &[reason]),
        other => other.to_string(),
    }
}

fn dispatch(cli: &Cli, config: &Config, catalog: &Catalog) -> Result<i32> {
    let mut git = SystemGit::new();
    let mut prompter = DialoguerPrompter;

    match &cli.command {
        Command::Commit(args) => {
            verify_environment(&git, true)?;
            let mode = if args.non_interactive {
                InteractionMode::NonInteractive
            } else {
                config.interaction
            };
            run_commit(
                &mut git,
                &mut prompter,
                catalog,
                mode,
                &args.options(),
                !args.no_add,
            )
        }
        Command::FormatCommits { from_commit } => {
            verify_environment(&git, true)?;
            let outcome = format_commits(&mut git, &mut prompter, *catalog, from_commit, "HEAD")?;
            debug!("format-commits finished: {:?}", outcome);
            Ok(0)
        }
        Command::Init => {
            verify_environment(&git, false)?;
            run_init(&mut git, catalog)
        }
        Command::Config => run_config(config, catalog),
    }
}

/// Main CLI entry point for `gitqq`.
///
/// This function:
/// 1. Installs the log subscriber.
/// 2. Handles the special `--sequence-editor <hash> <todo-file>` invocation
///    that git makes during a message rewrite.
/// 3. Parses the command line and loads the configuration once, applying
///    `--lang` / `--mode` overrides.
/// 4. Runs the selected command.
///
/// Command failures are printed in the active language and turn into exit
/// code `1`; they are not returned as `Err`.
///
/// # Errors
///
/// Returns `Err` only when running as sequence editor and the todo file
/// cannot be rewritten.
///
/// # Exit Codes
///
/// * `0` – Success, including "nothing to do" and a cancelled rewrite.
/// * `1` – The command failed, or there was nothing to commit.
pub fn entry() -> Result<i32> {
    init_logging();

    let args: Vec<String> = env::args().collect();

    // Special case: act as `git sequence-editor` if invoked with that flag.
    if args.len() >= 2 && args[1] == "--sequence-editor" {
        sequence_editor::run(
            args.get(2).map(String::as_str),
            args.get(3).map(String::as_str),
        )?;
        return Ok(0);
    }

    let cli = Cli::parse_from(args);

    let mut config = Config::load();
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    if let Some(mode) = cli.mode {
        config.interaction = mode;
    }
    let catalog = Catalog::new(config.language);

    match dispatch(&cli, &config, &catalog) {
        Ok(code) => Ok(code),
        Err(e) => {
            error!("command failed: {}", e);
            eprintln!("{}", style(describe(&e, &catalog)).red().bold());
            Ok(1)
        }
    }
}
