use console::{measure_text_width, style};
use std::iter;

/// Prints a framed, colourised panel listing the commits about to be rewritten.
///
/// The box is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so ANSI colour codes inside the content do
/// not throw the padding off. Borders are styled independently from the
/// content.
///
/// # Examples
///
/// ```no_run
/// use gitqq::banner::print_banner;
///
/// print_banner(
///     "Commits that will be rewritten:",
///     &["abc1234: \"fix bug\" => \"fix: Fix bug\"".to_string()],
/// );
/// ```
pub fn print_banner(title: &str, entries: &[String]) {
    let lines = banner_lines(title, entries);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(&line);
        let pad = max_width - visible;
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Builds the panel content: a bold title, a blank line, then one line per
/// entry. Entries may carry ANSI styling; callers measuring width must use
/// the visible width.
fn banner_lines(title: &str, entries: &[String]) -> Vec<String> {
    iter::once(style(title).bold().to_string())
        .chain(iter::once(String::new()))
        .chain(entries.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::banner_lines;
    use console::measure_text_width;

    #[test]
    fn banner_lines_put_title_first() {
        let entries = vec!["abc1234: \"old\" => \"fix: new\"".to_string()];
        let lines = banner_lines("Commits that will be rewritten:", &entries);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Commits that will be rewritten:"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], entries[0]);
    }

    #[test]
    fn banner_width_ignores_styling() {
        let lines = banner_lines("Title", &[]);
        assert_eq!(measure_text_width(&lines[0]), "Title".len());
    }
}
