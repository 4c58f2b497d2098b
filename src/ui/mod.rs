pub mod table;
pub mod theme;

pub use table::{declarations_table, languages_table};
pub use theme::{theme, Theme};

use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{}", text.style(theme().heading.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", "error:".style(theme().error.clone()), label);
}

pub fn warn(label: &str) {
    eprintln!("{} {}", "warning:".style(theme().warn.clone()), label);
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}
