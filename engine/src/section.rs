// ═══════════════════════════════════════════════════════════════════════
// Section splitter — breaks raw file text into labeled blocks on the
// leading '[' delimiter and checks the format-specific block count.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MapError;

/// Every block label in both grammars is prefixed by this delimiter.
pub const SECTION_DELIMITER: char = '[';

/// Split raw text into top-level blocks. Fails fast when the observed
/// count differs from the format's expected count; no block is parsed in
/// that case.
pub(crate) fn split(text: &str, expected: usize) -> Result<Vec<&str>, MapError> {
    let parts: Vec<&str> = text
        .split(SECTION_DELIMITER)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() != expected {
        return Err(MapError::MissingSections {
            expected,
            found: parts.len(),
        });
    }

    Ok(parts)
}

/// Extract a block's body: the text after the label's closing ']' and
/// its line terminator.
pub(crate) fn body(part: &str) -> &str {
    match part.split_once(']') {
        Some((_, rest)) => rest.trim_start_matches(['\r', '\n']),
        None => part,
    }
}
