//! File helpers for rewriting Markdown documents.
//!
//! The formatted text is fully computed before anything is written, so a
//! formatting failure leaves the file untouched.

use std::{fs, path::Path};

use crate::{config::FormatterConfig, reflow::format};

/// Rewrite a file in place with the default configuration.
///
/// # Errors
/// Returns an error if the file cannot be read, formatted, or written.
pub fn rewrite(path: &Path) -> std::io::Result<()> {
    rewrite_with(path, &FormatterConfig::default())
}

/// Rewrite a file in place with the given configuration.
///
/// # Errors
/// Returns an error if the file cannot be read, formatted, or written.
pub fn rewrite_with(path: &Path, config: &FormatterConfig) -> std::io::Result<()> {
    let text = fs::read_to_string(path)?;
    let formatted = format(&text, config).map_err(std::io::Error::other)?;
    fs::write(path, formatted)
}

/// Check whether a file is already formatted under the given
/// configuration.
///
/// # Errors
/// Returns an error if the file cannot be read or formatted.
pub fn is_formatted(path: &Path, config: &FormatterConfig) -> std::io::Result<bool> {
    let text = fs::read_to_string(path)?;
    let formatted = format(&text, config).map_err(std::io::Error::other)?;
    Ok(text == formatted)
}
