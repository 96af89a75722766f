//! User-facing progress output.
//!
//! Phase results go to stdout with color and a status glyph; diagnostics for
//! operators go through `tracing` on stderr. Keeping the two streams apart
//! lets callers pipe the report while still capturing logs.

const GREEN: &str = "\x1b[0;32m";
const RED: &str = "\x1b[0;31m";
const YELLOW: &str = "\x1b[1;33m";
const BLUE: &str = "\x1b[0;34m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn success(message: &str) {
    println!("{GREEN}\u{2713} {message}{RESET}");
}

pub fn error(message: &str) {
    println!("{RED}\u{2717} {message}{RESET}");
}

pub fn warning(message: &str) {
    println!("{YELLOW}\u{26a0} {message}{RESET}");
}

pub fn info(message: &str) {
    println!("{BLUE}\u{2139} {message}{RESET}");
}

/// Section heading printed at the start of each phase.
pub fn banner(title: &str) {
    println!();
    println!("{BOLD}=== {title} ==={RESET}");
}
