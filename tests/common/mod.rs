//! Utility helpers shared across integration tests.
#![allow(dead_code, unused_macros)] // not every test target uses every helper

/// Build a `Vec<String>` from a list of string slices.
///
/// This macro is primarily used in tests to reduce boilerplate when
/// constructing documents as collections of lines.
macro_rules! lines_vec {
    ($($line:expr),* $(,)?) => {
        vec![$($line.to_string()),*]
    };
}

use mdreflow::FormatterConfig;

/// Format `text` with the default configuration.
pub fn fmt(text: &str) -> String {
    mdreflow::format(text, &FormatterConfig::default()).expect("formatting should succeed")
}

/// Format `text` with the given configuration.
pub fn fmt_with(text: &str, config: &FormatterConfig) -> String {
    mdreflow::format(text, config).expect("formatting should succeed")
}

/// Assert that every line of `output` fits within `limit` characters.
///
/// Only suitable for plain-text output where raw and nominal width agree.
pub fn assert_lines_within(output: &str, limit: usize) {
    for line in output.lines() {
        assert!(
            line.chars().count() <= limit,
            "line exceeds {limit} characters: {line:?}"
        );
    }
}
