//! BibTeX database parsing.
//!
//! Splits a .bib file into entries with brace-depth tracking, then extracts
//! every `field = value` pair of each entry into a field map. No schema is
//! enforced: whatever fields an entry carries are kept, and consumers decide
//! which ones they need. `@comment`, `@preamble`, and `@string` directives
//! are skipped.

use crate::models::{BibRecord, Bibliography};
use std::collections::HashMap;
use thiserror::Error;

#[cfg(test)]
#[path = "bibtex_test.rs"]
mod bibtex_test;

#[derive(Debug, Error, PartialEq)]
pub enum BibError {
    #[error("no BibTeX entries found in file")]
    Empty,
    #[error("entry {index} is malformed: {reason}")]
    Malformed { index: usize, reason: &'static str },
}

// ============================================================================
// File Splitting
// ============================================================================

/// Split a multi-entry .bib file into individual entry strings.
/// Tracks brace depth so nested braces inside field values don't end an
/// entry early.
pub fn split_bib_entries(content: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut chars = content.chars().peekable();
    let skip_types = ["comment", "preamble", "string"];

    while let Some(&ch) = chars.peek() {
        if ch != '@' {
            chars.next();
            continue;
        }

        let mut entry = String::new();
        entry.push(chars.next().unwrap()); // '@'

        let mut entry_type = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                entry_type.push(c);
                entry.push(chars.next().unwrap());
            } else {
                break;
            }
        }

        // Directives carry no citation data; consume and drop them
        if skip_types.contains(&entry_type.to_lowercase().as_str()) {
            let mut depth = 0;
            for c in chars.by_ref() {
                if c == '{' {
                    depth += 1;
                } else if c == '}' {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            continue;
        }

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                entry.push(chars.next().unwrap());
            } else {
                break;
            }
        }

        if chars.peek() == Some(&'{') {
            entry.push(chars.next().unwrap());
            let mut depth = 1;
            for c in chars.by_ref() {
                entry.push(c);
                if c == '{' {
                    depth += 1;
                } else if c == '}' {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
            }
            let trimmed = entry.trim().to_string();
            if !trimmed.is_empty() {
                entries.push(trimmed);
            }
        }
    }

    entries
}

// ============================================================================
// Entry Parsing
// ============================================================================

/// Parse one entry string into (citation key, record). Returns None when the
/// entry has no recognizable `@type{key,` head.
pub fn parse_bib_entry(raw: &str) -> Option<(String, BibRecord)> {
    let raw = raw.trim();
    let at_pos = raw.find('@')?;
    let after_at = &raw[at_pos + 1..];

    let type_end = after_at.find(|c: char| !c.is_alphanumeric() && c != '_')?;
    if type_end == 0 {
        return None;
    }
    let entry_type = after_at[..type_end].to_lowercase();

    let after_type = after_at[type_end..].trim_start();
    if !after_type.starts_with('{') {
        return None;
    }
    let body = after_type[1..].trim_start();
    // The key ends at a comma, whitespace, or — for a fieldless entry like
    // `@misc{key}` — the closing brace
    let key_end = body.find(|c: char| c == ',' || c == '}' || c.is_whitespace())?;
    let cite_key = body[..key_end].to_string();
    if cite_key.is_empty() {
        return None;
    }

    let fields = parse_fields(&body[key_end..]);

    Some((cite_key, BibRecord { entry_type, fields }))
}

/// Walk `name = value` pairs, handling brace-delimited, quoted, and bare
/// values. Field names are lowercased; values lose their grouping braces and
/// collapse internal whitespace (multi-line values become single-line).
fn parse_fields(mut rest: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() || rest.starts_with('}') {
            break;
        }

        let name_end = match rest.find(|c: char| !c.is_alphanumeric() && c != '_' && c != '-') {
            Some(i) if i > 0 => i,
            _ => break,
        };
        let name = rest[..name_end].to_ascii_lowercase();

        let after_name = rest[name_end..].trim_start();
        if !after_name.starts_with('=') {
            break;
        }
        let value_text = after_name[1..].trim_start();

        let (value, consumed) = if value_text.starts_with('{') {
            match brace_delimited(value_text) {
                Some(v) => v,
                None => break, // unbalanced braces: stop, keep what we have
            }
        } else if value_text.starts_with('"') {
            match value_text[1..].find('"') {
                Some(i) => (&value_text[1..i + 1], i + 2),
                None => break,
            }
        } else {
            let end = value_text
                .find(|c: char| c == ',' || c == '}' || c == '\n')
                .unwrap_or(value_text.len());
            (value_text[..end].trim(), end)
        };

        fields.insert(name, normalize_value(value));
        rest = &value_text[consumed..];
    }

    fields
}

/// Extract the content of a `{...}`-delimited value, tracking depth.
/// Returns (inner content, bytes consumed including both braces).
fn brace_delimited(text: &str) -> Option<(&str, usize)> {
    let mut depth = 0;
    for (i, ch) in text.char_indices() {
        if ch == '{' {
            depth += 1;
        } else if ch == '}' {
            depth -= 1;
            if depth == 0 {
                return Some((&text[1..i], i + 1));
            }
        }
    }
    None
}

/// Drop grouping braces and collapse whitespace runs.
fn normalize_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Bibliography Loading
// ============================================================================

/// Parse a complete .bib file into a Bibliography. An unparseable entry
/// fails the whole load — a failed load must leave no partial state, so the
/// caller discards everything on error.
pub fn parse_bib_file(content: &str) -> Result<Bibliography, BibError> {
    let raw_entries = split_bib_entries(content);
    if raw_entries.is_empty() {
        return Err(BibError::Empty);
    }

    let mut entries = HashMap::new();
    for (idx, raw) in raw_entries.iter().enumerate() {
        let (key, record) = parse_bib_entry(raw).ok_or(BibError::Malformed {
            index: idx + 1,
            reason: "missing @type{key, header",
        })?;
        entries.insert(key, record);
    }

    Ok(Bibliography { entries })
}
