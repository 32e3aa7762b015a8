//! Data models for the citation explorer.
//!
//! This module contains the core data structures shared across the
//! application: the loaded bibliography, citation matches produced by the
//! scanner, and the citation detail payloads returned by the lookup API.

use serde::Serialize;
use std::collections::HashMap;

/// Placeholder rendered at the wire boundary when a field cannot be
/// determined. Inside the core, absent fields are `None`, never this string.
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Bibliography
// ============================================================================

/// One parsed BibTeX entry: its entry type plus a field-name → value map.
/// Field names are lowercased at parse time; no schema is enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BibRecord {
    pub entry_type: String,
    pub fields: HashMap<String, String>,
}

impl BibRecord {
    /// Case-insensitive field access (names are stored lowercased).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }
}

/// A loaded bibliography: citation key → record. Keys are case-sensitive.
/// One instance is owned by one session slot and replaced wholesale on each
/// upload; a failed load leaves no bibliography behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bibliography {
    pub entries: HashMap<String, BibRecord>,
}

impl Bibliography {
    pub fn get(&self, key: &str) -> Option<&BibRecord> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Citation Matches
// ============================================================================

/// One occurrence of a citation command found by the scanner.
/// Offsets are byte positions into the comment-stripped source; `end` is
/// exclusive and contiguous with the following verbatim copy region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiteMatch {
    pub start: usize,
    pub end: usize,
    /// Command name without the backslash, e.g. "citep".
    pub command: String,
    /// Keys in source order, comma-split and whitespace-trimmed.
    pub keys: Vec<String>,
    /// Style token of the producing command spec (a CSS class).
    pub style: &'static str,
    /// Index of the producing spec in the command table; the merge tie-break.
    pub spec_index: usize,
}

// ============================================================================
// Citation Details
// ============================================================================

/// Resolved metadata for one citation key. Transient — recomputed per
/// request, never persisted. Absent fields are `None`; the `"N/A"` sentinel
/// appears only in the wire format below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationDetails {
    pub doi: Option<String>,
    pub title: Option<String>,
    pub year: Option<String>,
    pub author: Option<String>,
    pub journal: Option<String>,
    pub citation_count: Option<u64>,
    pub abstract_text: Option<String>,
}

/// Wire format for the citation detail endpoint. Mirrors the shape consumed
/// by the front-end: string fields fall back to "N/A", the citation count is
/// a JSON number when known and "N/A" otherwise.
#[derive(Debug, Serialize)]
pub struct CitationInfo {
    pub doi: String,
    pub title: String,
    pub year: String,
    pub author: String,
    pub journal: String,
    pub citation_count: serde_json::Value,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl CitationInfo {
    pub fn from_details(details: &CitationDetails) -> Self {
        fn or_na(field: &Option<String>) -> String {
            field.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
        }

        let citation_count = match details.citation_count {
            Some(n) => serde_json::Value::from(n),
            None => serde_json::Value::from(NOT_AVAILABLE),
        };

        CitationInfo {
            doi: or_na(&details.doi),
            title: or_na(&details.title),
            year: or_na(&details.year),
            author: or_na(&details.author),
            journal: or_na(&details.journal),
            citation_count,
            abstract_text: or_na(&details.abstract_text),
        }
    }
}

/// Success envelope for the detail endpoint.
#[derive(Debug, Serialize)]
pub struct CitationInfoResponse {
    pub citation_info: CitationInfo,
}

/// Error envelope for the detail endpoint. The HTTP status distinguishes
/// "no bibliography loaded" (400) from "key not found" (404).
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_substitutes_sentinel_for_missing_fields() {
        let info = CitationInfo::from_details(&CitationDetails::default());
        assert_eq!(info.doi, NOT_AVAILABLE);
        assert_eq!(info.title, NOT_AVAILABLE);
        assert_eq!(info.year, NOT_AVAILABLE);
        assert_eq!(info.author, NOT_AVAILABLE);
        assert_eq!(info.journal, NOT_AVAILABLE);
        assert_eq!(info.citation_count, json!(NOT_AVAILABLE));
        assert_eq!(info.abstract_text, NOT_AVAILABLE);
    }

    #[test]
    fn wire_format_keeps_known_fields() {
        let details = CitationDetails {
            title: Some("A Study of Things".to_string()),
            citation_count: Some(42),
            ..CitationDetails::default()
        };
        let info = CitationInfo::from_details(&details);
        assert_eq!(info.title, "A Study of Things");
        assert_eq!(info.citation_count, json!(42));
        assert_eq!(info.year, NOT_AVAILABLE);
    }

    #[test]
    fn wire_format_serializes_abstract_under_its_public_name() {
        let body = CitationInfoResponse {
            citation_info: CitationInfo::from_details(&CitationDetails {
                abstract_text: Some("Summary.".to_string()),
                ..CitationDetails::default()
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["citation_info"]["abstract"], json!("Summary."));
        assert!(
            value["citation_info"].get("abstract_text").is_none(),
            "internal field name must not leak into the wire format"
        );
    }
}
