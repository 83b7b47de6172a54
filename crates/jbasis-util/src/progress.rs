use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a Cargo-style status line: `   Resolving com.example:foo:1.2.0`
///
/// The label is right-aligned to 12 columns and styled bold green; the
/// message follows in the terminal's default colour.
pub fn status(label: &str, message: &str) {
    print_line(Style::new().green().bold(), label, message);
}

/// Warning variant of [`status`] with a bold yellow label.
pub fn status_warn(label: &str, message: &str) {
    print_line(Style::new().yellow().bold(), label, message);
}

fn print_line(style: Style, label: &str, message: &str) {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "{:>12} {message}", style.apply_to(label));
}

/// Byte-count progress bar shown while a large artifact downloads.
///
/// The caller drives the position and clears the bar once the payload
/// has been read.
pub fn download_bar(total_bytes: u64, label: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("  {msg} {bar:30.cyan/dim} {bytes}/{total_bytes}")
        .expect("static template is well-formed")
        .progress_chars("##-");
    let bar = ProgressBar::new(total_bytes).with_style(style);
    bar.set_message(label.to_string());
    bar
}
