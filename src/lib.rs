//! # gitqq
//!
//! Conventional commits without memorising the grammar.
//!
//! This crate provides:
//! - The conventional-commit grammar: render, match and parse messages
//! - A keyword classifier that turns free-form messages into structured ones
//! - A commit assembler that merges flags and prompts into a message
//! - A planner that reviews existing history and rewrites non-conforming
//!   messages in place
//!
//! ## Usage
//!
//! ```bash
//! # Prompt for every field
//! gitqq commit
//!
//! # Everything from flags
//! gitqq commit "add login" --type feat --scope auth --non-interactive
//!
//! # Review and rewrite the commits after abc123
//! gitqq format-commits abc123
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Commit types, structured commits and the header grammar
//! - [`classify`] - Free-form message classification
//! - [`assemble`] - Interaction modes and commit assembly
//! - [`planner`] - History review and message rewriting
//! - [`git`] - Repository gateway over the `git` executable
//! - [`sequence_editor`] - Rebase todo file transformation
//! - [`prompt`] - User input abstractions
//! - [`messages`] - Localised user-facing text
//! - [`config`] - Persistent settings
//! - [`banner`] - Framed summary panel
//! - [`cli`] - Command-line interface and main entry point
//! - [`error`] - Error type shared by every module

pub mod assemble;
pub mod banner;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod grammar;
pub mod messages;
pub mod planner;
pub mod prompt;
pub mod sequence_editor;
