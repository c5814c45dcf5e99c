//! Unified output formatting utilities for consistent CLI presentation.
//!
//! Every command prints through these helpers so errors, notices, section headers
//! and key/value lines look the same across the CLI. Errors are red, headers white,
//! labels muted.

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
///
/// # Colors
/// - "✕ Error:" in red
/// - Message in white
/// - Newlines before and after for spacing
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
///
/// ```
///
/// # Colors
/// - Checkmark in green, message in white
/// - Newlines before and after for spacing
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
///
/// # Format
/// ```text
///
/// <message>
///
/// ```
///
/// # Colors
/// - Message in white
/// - Newlines before and after for spacing
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
///
/// # Colors
/// - Header in white
/// - Newlines before and after for spacing
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// Formats and prints one aligned `label  value` line
///
/// # Colors
/// - Label in bright_black (muted), padded to 12 columns
/// - Value in white
pub fn print_field(label: &str, value: &str) {
    println!("  {}  {}", format!("{label:<12}").bright_black(), value.white());
}

/// Formats and prints a muted placeholder line, e.g. `(none)`
pub fn print_muted(message: &str) {
    println!("  {}", message.bright_black());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_does_not_panic() {
        print_error("Test error message");
    }

    #[test]
    fn test_print_success_does_not_panic() {
        print_success("Operation completed");
    }

    #[test]
    fn test_print_info_does_not_panic() {
        print_info("Information message");
    }

    #[test]
    fn test_print_section_header_does_not_panic() {
        print_section_header("Local Branches");
    }

    #[test]
    fn test_print_field_does_not_panic() {
        print_field("Remote", "origin");
        print_muted("(none)");
    }

    #[test]
    fn test_color_functions_available() {
        // Test that color functions are available and don't panic
        let _ = "test".red();
        let _ = "test".white();
        let _ = "test".blue();
        let _ = "test".bright_black();
    }
}
