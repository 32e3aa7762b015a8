//! citeview - annotate LaTeX sources with interactive citation links.
//!
//! Upload a .bib bibliography and a .tex document; every recognized citation
//! command in the document becomes a clickable element that resolves to the
//! record's metadata plus a live citation count (Crossref) and abstract
//! (Semantic Scholar).
//!
//! Modules:
//!
//! - `models`: bibliography, match, and citation detail structures
//! - `bibtex`: .bib splitting and entry parsing
//! - `annotate`: comment stripping, citation scanning, match ordering, and
//!   document reconstruction
//! - `enrich`: bibliography lookup and external enrichment calls
//! - `session`: per-session bibliography storage
//! - `handlers`: HTTP route handlers
//! - `templates`: HTML page generation

pub mod annotate;
pub mod bibtex;
pub mod enrich;
pub mod handlers;
pub mod models;
pub mod session;
pub mod templates;

// ============================================================================
// Configuration
// ============================================================================

pub const BIND_ADDR: &str = "0.0.0.0:8080";

/// Timeout for each outbound enrichment call, in seconds.
pub const ENRICH_TIMEOUT_SECS: u64 = 5;

/// Sessions older than this are purged from the bibliography store.
pub const SESSION_TTL_HOURS: i64 = 24;

// ============================================================================
// Application State
// ============================================================================

#[derive(Default)]
pub struct AppState {
    /// Session-scoped bibliography slots. Deliberately not a single global:
    /// concurrent sessions must not clobber each other's loaded data.
    pub bibs: BibStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

// Re-export commonly used items
pub use annotate::{
    annotate_matches, annotate_tex, html_escape, merge_matches, scan_citations, strip_comments,
    AnnotateError, CiteCommandSpec, CITE_COMMANDS,
};
pub use bibtex::{parse_bib_entry, parse_bib_file, split_bib_entries, BibError};
pub use enrich::{
    fetch_abstract, fetch_citation_count, lookup_details, parse_abstract, parse_citation_count,
    resolve_citation, resolve_citation_at, EnrichError, CROSSREF_API, SEMANTIC_SCHOLAR_API,
};
pub use models::{
    ApiError, BibRecord, Bibliography, CitationDetails, CitationInfo, CitationInfoResponse,
    CiteMatch, NOT_AVAILABLE,
};
pub use session::{new_session_id, BibStore, SESSION_COOKIE};
pub use templates::{base_html, index_page, DETAIL_JS, STYLE};
