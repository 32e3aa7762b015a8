//! Citation-span extraction and annotation.
//!
//! The pipeline is strip → scan → merge → annotate:
//!
//! - `strip_comments` removes `%`-to-end-of-line comments so commented-out
//!   citations are never annotated;
//! - `scan_citations` finds every occurrence of each recognized citation
//!   command family;
//! - `merge_matches` orders matches from all families into one globally
//!   ordered, non-overlapping sequence;
//! - `annotate_matches` reconstructs the document, copying non-citation
//!   spans verbatim and replacing each match with styled, clickable markup.
//!
//! Only the command families in `CITE_COMMANDS` are interpreted; everything
//! else in the source is opaque text and passes through unchanged.

use crate::models::CiteMatch;
use regex::Regex;
use thiserror::Error;

#[cfg(test)]
#[path = "annotate_test.rs"]
mod annotate_test;

#[derive(Debug, Error, PartialEq)]
pub enum AnnotateError {
    /// Two citation matches from different command families overlap. Rather
    /// than emit corrupted output, the whole annotation request fails.
    #[error("ambiguous citation markup: overlapping citation commands at byte {offset}")]
    AmbiguousMarkup { offset: usize },
}

// ============================================================================
// Command Table
// ============================================================================

/// A recognized citation command family: the command name (without the
/// backslash) and the style token its matches render with. The table is
/// fixed configuration — adding a family is adding a row.
#[derive(Debug, Clone, Copy)]
pub struct CiteCommandSpec {
    pub command: &'static str,
    pub style: &'static str,
}

pub const CITE_COMMANDS: &[CiteCommandSpec] = &[
    CiteCommandSpec { command: "cite", style: "cite-plain" },
    CiteCommandSpec { command: "citep", style: "cite-paren" },
    CiteCommandSpec { command: "citet", style: "cite-text" },
    CiteCommandSpec { command: "citeauthor", style: "cite-author" },
    CiteCommandSpec { command: "citeyear", style: "cite-year" },
    CiteCommandSpec { command: "citealp", style: "cite-alt" },
];

// ============================================================================
// Comment Stripping
// ============================================================================

/// Remove everything from the first unescaped `%` on a line to the end of
/// that line, keeping the line break. A `%` preceded by `\` is literal and
/// survives. Pure; never fails.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let mut prev = '\0';
        let mut cut = line.len();
        for (pos, ch) in line.char_indices() {
            if ch == '%' && prev != '\\' {
                cut = pos;
                break;
            }
            prev = ch;
        }
        out.push_str(&line[..cut]);
    }

    out
}

// ============================================================================
// Scanning
// ============================================================================

/// Find every occurrence of every recognized citation command. Matches from
/// one family never overlap each other (regex scanning is non-overlapping);
/// cross-family overlap is the merger's problem.
///
/// The key list stops at the first `}` — nested braces inside a key list are
/// not supported. An empty key list (`\cite{}`) yields a single empty key,
/// which downstream lookups report as not found.
pub fn scan_citations(text: &str) -> Vec<CiteMatch> {
    let mut matches = Vec::new();

    for (spec_index, spec) in CITE_COMMANDS.iter().enumerate() {
        // `{` must immediately follow the command name, so e.g. \citep never
        // also matches the \cite family.
        let pattern = format!(r"\\{}\{{([^}}]*)\}}", spec.command);
        let re = Regex::new(&pattern).expect("citation command pattern is valid");

        for caps in re.captures_iter(text) {
            let whole = caps.get(0).expect("match has a whole-pattern group");
            let key_list = caps.get(1).map(|m| m.as_str()).unwrap_or("");

            let keys: Vec<String> = key_list
                .split(',')
                .map(|k| k.trim().to_string())
                .collect();

            matches.push(CiteMatch {
                start: whole.start(),
                end: whole.end(),
                command: spec.command.to_string(),
                keys,
                style: spec.style,
                spec_index,
            });
        }
    }

    matches
}

// ============================================================================
// Merging / Ordering
// ============================================================================

/// Order the union of all families' matches by (start offset, command table
/// index) — a deterministic tie-break in case two families ever matched at
/// the same offset. Overlapping matches mean the markup is ambiguous; that
/// aborts the request instead of silently producing corrupted output.
pub fn merge_matches(mut matches: Vec<CiteMatch>) -> Result<Vec<CiteMatch>, AnnotateError> {
    matches.sort_by_key(|m| (m.start, m.spec_index));

    for pair in matches.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(AnnotateError::AmbiguousMarkup {
                offset: pair[1].start,
            });
        }
    }

    Ok(matches)
}

// ============================================================================
// Annotation / Reconstruction
// ============================================================================

/// Escape text placed into HTML attribute/content positions.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render one match: a styled marker for the command name, then one
/// clickable element per key inside literal braces.
fn render_match(m: &CiteMatch) -> String {
    let links: Vec<String> = m
        .keys
        .iter()
        .map(|key| {
            let escaped = html_escape(key);
            format!(
                r##"<a href="#" class="citation-link {style}" data-citation-key="{key}">{key}</a>"##,
                style = m.style,
                key = escaped,
            )
        })
        .collect();

    format!(
        r#"<span class="cite-command {style}">\{command}</span>{{{links}}}"#,
        style = m.style,
        command = m.command,
        links = links.join(", "),
    )
}

/// Walk the ordered, non-overlapping match sequence and rebuild the
/// document: text before, between, and after matches is copied verbatim —
/// byte for byte — and each match is replaced by its rendered markup.
pub fn annotate_matches(text: &str, matches: &[CiteMatch]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_pos = 0;

    for m in matches {
        out.push_str(&text[last_pos..m.start]);
        out.push_str(&render_match(m));
        last_pos = m.end;
    }
    out.push_str(&text[last_pos..]);

    out
}

/// Full pipeline: strip comments, scan all command families, order the
/// matches, and reconstruct the annotated document.
pub fn annotate_tex(tex: &str) -> Result<String, AnnotateError> {
    let stripped = strip_comments(tex);
    let matches = merge_matches(scan_citations(&stripped))?;
    Ok(annotate_matches(&stripped, &matches))
}
