//! Terminal output for corix commands
//!
//! Colors honour NO_COLOR, CLICOLOR and CLICOLOR_FORCE through `colored`.

use std::fmt::Display;

use colored::Colorize;

use crate::application::format_score;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print a completed write (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print the selection a tree was built for (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print a labelled setting such as a config path
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print a score column, starred when it is the configured default
pub fn selection(column: &str, is_default: bool) {
    if is_default {
        println!("{} {}", "*".green().bold(), column.bold());
    } else {
        println!("  {}", column);
    }
}

/// Print a root score line: `<selection>: x.xx/10 (<note>)`
pub fn score(label: &(impl Display + ?Sized), score: Option<f64>, note: &str) {
    println!("{}: {} ({})", label.to_string().green(), score_text(score).as_str().bold(), note);
}

/// Root score out of ten, or the placeholder when undefined.
pub fn score_text(score: Option<f64>) -> String {
    match score {
        Some(s) if !s.is_nan() => format!("{}/10", format_score(s)),
        _ => format_score(f64::NAN),
    }
}

/// Print plain output (no color, for trees, details and JSON)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_scores_when_score_text_then_out_of_ten_or_placeholder() {
        assert_eq!(score_text(Some(2.5)), "2.50/10");
        assert_eq!(score_text(Some(f64::NAN)), "n/a");
        assert_eq!(score_text(None), "n/a");
    }
}
