use crossterm::style::Stylize;
use similar::{ChangeTag, TextDiff};

use crate::ui::theme;

/// Unified diff of the remote vhost (`old`) against the rendered one (`new`)
pub fn render_unified_diff_with_line_numbers(
    path: &str,
    old: &str,
    new: &str,
    supports_color: bool,
) -> String {
    let diff = TextDiff::from_lines(old, new);
    let width = old
        .lines()
        .count()
        .max(new.lines().count())
        .max(1)
        .to_string()
        .len();

    let mut out = String::new();
    for header in [format!("--- {path} (remote)"), format!("+++ {path} (rendered)")] {
        out.push_str(&paint(&header, None, supports_color));
        out.push('\n');
    }

    for change in diff.iter_all_changes() {
        let (old_no, new_no, sign) = match change.tag() {
            ChangeTag::Delete => (change.old_index(), None, "-"),
            ChangeTag::Insert => (None, change.new_index(), "+"),
            ChangeTag::Equal => (change.old_index(), change.new_index(), " "),
        };
        let column = |n: Option<usize>| match n {
            Some(i) => format!("{:>width$}", i + 1),
            None => " ".repeat(width),
        };

        let value = change.value().trim_end_matches('\n');
        let line = format!("{} {} {sign} {value}", column(old_no), column(new_no));
        out.push_str(&paint(&line, Some(change.tag()), supports_color));
        out.push('\n');
    }

    out
}

/// `None` is a header line
fn paint(s: &str, tag: Option<ChangeTag>, supports_color: bool) -> String {
    if !supports_color {
        return s.to_string();
    }
    let color = match tag {
        None => theme::colors::INFO,
        Some(ChangeTag::Delete) => theme::colors::ERROR,
        Some(ChangeTag::Insert) => theme::colors::SUCCESS,
        Some(ChangeTag::Equal) => theme::colors::DIM,
    };
    format!("{}", s.with(color))
}
