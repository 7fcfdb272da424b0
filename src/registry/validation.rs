// ABOUTME: Integrity checks for environment names and keys read from a value grid
// ABOUTME: Names are compared trimmed and lower-cased; the first failing category is reported

use indexmap::IndexMap;

use super::error::{RegistryError, Result};

/// The only character a key may not contain: it would end a marker early.
pub const INVALID_KEY_CHARS: &[char] = &['}'];

/// Characters that cannot appear in a file name component on any supported platform
pub fn is_invalid_file_name_char(ch: char) -> bool {
    ch < ' ' || matches!(ch, '"' | '<' | '>' | '|' | ':' | '*' | '?' | '\\' | '/')
}

/// Trimmed, lower-cased form used for comparison and storage
pub fn normalise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn verify_environments<S: AsRef<str>>(names: &[S]) -> Result<()> {
    let names: Vec<String> = names.iter().map(|n| normalise_name(n.as_ref())).collect();

    if names.iter().any(String::is_empty) {
        return Err(RegistryError::BlankEnvironment);
    }

    let duplicates = duplicates(&names);
    if !duplicates.is_empty() {
        return Err(RegistryError::DuplicateEnvironment {
            environments: duplicates,
        });
    }

    let invalid: Vec<String> = names
        .into_iter()
        .filter(|name| name.chars().any(is_invalid_file_name_char))
        .collect();
    if !invalid.is_empty() {
        return Err(RegistryError::InvalidCharEnvironment {
            environments: invalid,
        });
    }

    Ok(())
}

pub fn verify_keys<S: AsRef<str>>(keys: &[S]) -> Result<()> {
    let keys: Vec<String> = keys.iter().map(|k| normalise_name(k.as_ref())).collect();

    if keys.iter().any(String::is_empty) {
        return Err(RegistryError::BlankKey);
    }

    let duplicates = duplicates(&keys);
    if !duplicates.is_empty() {
        return Err(RegistryError::DuplicateKey { keys: duplicates });
    }

    let invalid: Vec<String> = keys
        .into_iter()
        .filter(|key| key.contains(INVALID_KEY_CHARS))
        .collect();
    if !invalid.is_empty() {
        return Err(RegistryError::InvalidCharKey { keys: invalid });
    }

    Ok(())
}

/// Each name seen more than once, listed once in order of first appearance
fn duplicates(names: &[String]) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}
