//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use component_catalog::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Manifest file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

use crate::defaults;

/// Generate an error for when the manifest file is not found.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest file not found: {path}\n\n\
         hint: Use -m/--manifest to point at the component list XML\n\
         hint: Download the component list first, this tool does not fetch it",
        path = path.display()
    )
}

/// Generate an error for when a settings file given explicitly is missing.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a {default} file in the current directory\n\
         hint: Use --config to specify a different path\n\
         hint: Set {env} environment variable",
        path = path.display(),
        default = defaults::DEFAULT_CONFIG_FILENAME,
        env = defaults::CONFIG_ENV_VAR,
    )
}

/// Generate an error for a command that needs an installation directory.
pub fn source_required() -> anyhow::Error {
    anyhow::anyhow!(
        "No installation directory given\n\n\
         hint: Use --source <DIR> to point at an existing installation\n\
         hint: Set {env} or the `source` key in {config}",
        env = defaults::SOURCE_ENV_VAR,
        config = defaults::DEFAULT_CONFIG_FILENAME,
    )
}

/// Generate an error for a cycle detected in component dependencies.
pub fn cycle_detected(cycle: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Cycle detected in component dependencies: {cycle}\n\n\
         hint: Remove one of the ids from a `depends` attribute to break the cycle\n\
         hint: Selecting any member of the cycle forces all of them to be installed"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
pub(crate) fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut previous: Vec<usize> = (0..=b_len).collect();
    let mut current = vec![0usize; b_len + 1];

    for i in 1..=a_len {
        current[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_len]
}
