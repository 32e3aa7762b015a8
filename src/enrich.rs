//! Citation metadata resolution and external enrichment.
//!
//! Resolution is a two-step affair: an exact key lookup against the loaded
//! bibliography, then — when the record carries a DOI — two independent
//! enrichment calls (Crossref for the citation count, Semantic Scholar for
//! the abstract). The calls run concurrently with separate timeouts, and
//! each failure degrades only its own field: a dead enrichment service never
//! fails a lookup.

use crate::models::{Bibliography, CitationDetails};
use crate::ENRICH_TIMEOUT_SECS;
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
#[path = "enrich_test.rs"]
mod enrich_test;

/// What went wrong with one enrichment call. Every variant maps to the
/// "not available" sentinel at the aggregation boundary; the distinction
/// exists for diagnostics.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response payload")]
    Parse,
}

fn classify(e: reqwest::Error) -> EnrichError {
    if e.is_timeout() {
        EnrichError::Timeout
    } else {
        EnrichError::Transport(e)
    }
}

fn http_client() -> Result<reqwest::Client, EnrichError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(ENRICH_TIMEOUT_SECS))
        .build()
        .map_err(EnrichError::Transport)
}

// ============================================================================
// Bibliography Lookup
// ============================================================================

/// Look up a citation key in the bibliography and extract the standard
/// fields. Exact, case-sensitive match; `None` means the key is absent.
/// No network involved — enrichment happens in `resolve_citation`.
pub fn lookup_details(bib: &Bibliography, key: &str) -> Option<CitationDetails> {
    let record = bib.get(key)?;

    let field = |name: &str| record.field(name).map(|v| v.to_string());

    Some(CitationDetails {
        doi: field("doi"),
        title: field("title"),
        year: field("year"),
        author: field("author"),
        // Journal articles carry `journal`; conference papers `booktitle`.
        journal: field("journal")
            .or_else(|| field("booktitle"))
            .or_else(|| field("howpublished")),
        citation_count: None,
        abstract_text: None,
    })
}

// ============================================================================
// External Enrichment
// ============================================================================

/// Crossref works API base; the count for a DOI lives at `<base>/<doi>`.
pub const CROSSREF_API: &str = "https://api.crossref.org/works";

/// Semantic Scholar paper API base; the abstract lives at `<base>/<doi>`.
pub const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/v1/paper";

/// Read Crossref's citation count out of a works payload. Absent or
/// mistyped fields yield `None`, never a panic.
pub fn parse_citation_count(json: &serde_json::Value) -> Option<u64> {
    json.get("message")?.get("is-referenced-by-count")?.as_u64()
}

/// Read an abstract out of a Semantic Scholar paper payload.
pub fn parse_abstract(json: &serde_json::Value) -> Option<String> {
    let text = json.get("abstract")?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Fetch the citation count for a DOI from a Crossref-shaped works API.
/// `api_base` is `CROSSREF_API` in production.
pub async fn fetch_citation_count(api_base: &str, doi: &str) -> Result<u64, EnrichError> {
    let url = format!("{}/{}", api_base, doi);
    let client = http_client()?;

    let response = client
        .get(&url)
        .header("User-Agent", "citeview/0.1 (mailto:user@example.com)")
        .send()
        .await
        .map_err(classify)?;

    if !response.status().is_success() {
        return Err(EnrichError::Status(response.status()));
    }

    let json: serde_json::Value = response.json().await.map_err(|_| EnrichError::Parse)?;
    parse_citation_count(&json).ok_or(EnrichError::Parse)
}

/// Fetch the paper abstract for a DOI from a Semantic-Scholar-shaped API.
/// `api_base` is `SEMANTIC_SCHOLAR_API` in production.
pub async fn fetch_abstract(api_base: &str, doi: &str) -> Result<String, EnrichError> {
    let url = format!("{}/{}", api_base, doi);
    let client = http_client()?;

    let response = client.get(&url).send().await.map_err(classify)?;

    if !response.status().is_success() {
        return Err(EnrichError::Status(response.status()));
    }

    let json: serde_json::Value = response.json().await.map_err(|_| EnrichError::Parse)?;
    parse_abstract(&json).ok_or(EnrichError::Parse)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve a citation key to its full details: bibliography fields plus,
/// when a DOI is available, the two enrichment fields. The enrichment calls
/// fan out concurrently; either one failing leaves its field at `None` and
/// logs the cause.
pub async fn resolve_citation(bib: &Bibliography, key: &str) -> Option<CitationDetails> {
    resolve_citation_at(CROSSREF_API, SEMANTIC_SCHOLAR_API, bib, key).await
}

/// `resolve_citation` against explicit API bases.
pub async fn resolve_citation_at(
    crossref_base: &str,
    scholar_base: &str,
    bib: &Bibliography,
    key: &str,
) -> Option<CitationDetails> {
    let mut details = lookup_details(bib, key)?;

    if let Some(ref doi) = details.doi {
        let (count, abstract_text) = tokio::join!(
            fetch_citation_count(crossref_base, doi),
            fetch_abstract(scholar_base, doi)
        );

        match count {
            Ok(n) => details.citation_count = Some(n),
            Err(e) => eprintln!("citation count lookup failed for {}: {}", doi, e),
        }
        match abstract_text {
            Ok(text) => details.abstract_text = Some(text),
            Err(e) => eprintln!("abstract lookup failed for {}: {}", doi, e),
        }
    }

    Some(details)
}
