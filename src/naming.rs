//! Naming policies
//!
//! Converts declared member names (PascalCase) into the casing a serializer
//! writes on the wire. Used for enum member names and registry-wide property
//! naming.

use serde::{Deserialize, Serialize};

/// Casing convention applied to declared member names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// `camelCase`
    CamelCase,
    /// `snake_case`
    SnakeCaseLower,
    /// `SNAKE_CASE`
    SnakeCaseUpper,
    /// `kebab-case`
    KebabCaseLower,
    /// `KEBAB-CASE`
    KebabCaseUpper,
}

impl NamingPolicy {
    /// Convert a declared name according to this policy
    pub fn convert(&self, name: &str) -> String {
        match self {
            NamingPolicy::CamelCase => to_camel_case(name),
            NamingPolicy::SnakeCaseLower => join_words(name, '_', false),
            NamingPolicy::SnakeCaseUpper => join_words(name, '_', true),
            NamingPolicy::KebabCaseLower => join_words(name, '-', false),
            NamingPolicy::KebabCaseUpper => join_words(name, '-', true),
        }
    }
}

/// Convert string to camelCase.
///
/// Lowercases the leading run of uppercase letters, keeping the last one
/// uppercase when it starts the next word (`URLValue` -> `urlValue`).
pub fn to_camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_uppercase() {
            result.extend(chars[i..].iter());
            return result;
        }

        let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
        if i > 0 && next_is_lower {
            result.extend(chars[i..].iter());
            return result;
        }

        result.extend(c.to_lowercase());
    }

    result
}

/// Split a name into words at case boundaries, digits-to-letters boundaries,
/// and existing separators.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // "aB" starts a word, and so does the last capital of "ABc"
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn join_words(s: &str, separator: char, upper: bool) -> String {
    let words: Vec<String> = split_words(s)
        .into_iter()
        .map(|w| if upper { w.to_uppercase() } else { w.to_lowercase() })
        .collect();
    words.join(&separator.to_string())
}
