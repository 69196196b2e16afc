use console::style;

/// Entry point for the `gitqq` binary.
///
/// Delegates to the CLI entry function and exits the process with the
/// returned exit code. If an error escapes (only possible when running as
/// the rebase sequence editor), it is printed and the process exits with
/// status code 1.
fn main() {
    match gitqq::cli::entry() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", style("gitqq:").red().bold(), e);
            std::process::exit(1)
        }
    }
}
