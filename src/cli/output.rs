//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Display;

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print present location (green checkmark, indented)
pub fn found(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print missing location (red X, indented)
pub fn missing(msg: &(impl Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

/// Print labelled value (green label)
pub fn labelled(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print a leaf card: bold title over an indented body line
pub fn card(title: &(impl Display + ?Sized), body: &(impl Display + ?Sized)) {
    println!("{}", title.to_string().bold());
    println!("  {}", body);
}

/// Print placeholder text shown instead of cards (dimmed)
pub fn placeholder(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().dimmed());
}

/// Print plain output (no color, for rendered trees and config)
pub fn plain(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
