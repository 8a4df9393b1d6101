//! Reader for the upstream extractor's link stream
//!
//! The extractor delivers one JSON object per line with the fields
//! `filename`, `lineno`, and `uri`. Blank lines are skipped; a malformed
//! record fails the whole load, since a silently dropped reference would
//! break the one-result-per-reference invariant.

use crate::checker::LinkReference;
use crate::InputError;
use std::path::Path;

/// Loads link references from a JSON-lines file
///
/// # Arguments
///
/// * `path` - Path to the links file
///
/// # Returns
///
/// * `Ok(Vec<LinkReference>)` - Every record in file order
/// * `Err(InputError)` - Read failure or a malformed record
pub fn load_links(path: &Path) -> Result<Vec<LinkReference>, InputError> {
    let content = std::fs::read_to_string(path)?;
    parse_links(&content)
}

/// Parses link references from JSON-lines content
pub fn parse_links(content: &str) -> Result<Vec<LinkReference>, InputError> {
    let mut links = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reference =
            serde_json::from_str(line).map_err(|e| InputError::Record {
                lineno: index + 1,
                source: e,
            })?;
        links.push(reference);
    }

    Ok(links)
}
