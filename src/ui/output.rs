//! Output functions for consistent CLI formatting

use console::style;

/// Print a `KEY=value` line on stdout
///
/// The shape is what CI systems read back with `source` or `$GITHUB_ENV`.
pub fn key_value(key: &str, value: &str) {
    println!("{}", format_key_value(key, value));
}

/// Print a warning on stderr
pub fn step_warn(message: &str) {
    eprintln!("{} {}", style("[WARN]").yellow(), message);
}

fn format_key_value(key: &str, value: &str) -> String {
    format!("{key}={value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_shape() {
        assert_eq!(format_key_value("VERSION", "v1.2.3"), "VERSION=v1.2.3");
        assert_eq!(format_key_value("VERSION_WITHOUT_PREFIX", ""), "VERSION_WITHOUT_PREFIX=");
    }
}
