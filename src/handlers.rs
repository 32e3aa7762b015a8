//! HTTP route handlers.
//!
//! Three routes: the upload form (GET /), the upload + annotate action
//! (POST /), and the citation detail API (GET /api/citation/{*key}). The
//! detail endpoint distinguishes "no bibliography loaded" (400) from "key
//! not found" (404) so the front-end can tell the cases apart.

use crate::annotate::{annotate_tex, html_escape};
use crate::bibtex::parse_bib_file;
use crate::enrich::resolve_citation;
use crate::models::{ApiError, CitationInfo, CitationInfoResponse};
use crate::session::{new_session_id, SESSION_COOKIE};
use crate::templates::index_page;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;

/// The session id from the request cookie, or a fresh one. The second
/// element says whether the id is new and must be set on the response.
fn session_id(jar: &CookieJar) -> (String, bool) {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => (cookie.value().to_string(), false),
        _ => (new_session_id(), true),
    }
}

/// Render the index page, attaching the session cookie when it is new.
fn page_response(page: String, session: &str, set_cookie: bool) -> Response {
    if set_cookie {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, session
        );
        ([(SET_COOKIE, cookie)], Html(page)).into_response()
    } else {
        Html(page).into_response()
    }
}

// ============================================================================
// Index / Upload
// ============================================================================

pub async fn index() -> Html<String> {
    Html(index_page(None, None))
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let (session, is_new) = session_id(&jar);

    let mut bib_content: Option<String> = None;
    let mut tex_content: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("bib_file") => bib_content = field.text().await.ok().filter(|t| !t.is_empty()),
            Some("tex_file") => tex_content = field.text().await.ok().filter(|t| !t.is_empty()),
            _ => {}
        }
    }

    let (bib_content, tex_content) = match (bib_content, tex_content) {
        (Some(b), Some(t)) => (b, t),
        _ => {
            // Missing input clears any previously loaded bibliography
            state.bibs.clear(&session);
            let page = index_page(Some("Please upload both a .bib and a .tex file."), None);
            return page_response(page, &session, is_new);
        }
    };

    let bibliography = match parse_bib_file(&bib_content) {
        Ok(bib) => bib,
        Err(e) => {
            // No partial state survives a failed load
            state.bibs.clear(&session);
            let msg = format!("Error processing files: {}", e);
            let page = index_page(Some(&html_escape(&msg)), None);
            return page_response(page, &session, is_new);
        }
    };

    let annotated = match annotate_tex(&tex_content) {
        Ok(html) => html,
        Err(e) => {
            // Ambiguous markup aborts annotation only; parse errors above
            // are the ones that reset bibliography state
            let msg = format!("Error processing files: {}", e);
            let page = index_page(Some(&html_escape(&msg)), None);
            return page_response(page, &session, is_new);
        }
    };

    println!(
        "loaded bibliography with {} entries for session {}",
        bibliography.len(),
        &session[..8.min(session.len())]
    );
    state.bibs.store(&session, bibliography);

    let page = index_page(None, Some(&annotated));
    page_response(page, &session, is_new)
}

// ============================================================================
// Citation Detail API
// ============================================================================

/// GET /api/citation/{*key} — the wildcard segment lets keys contain `/`;
/// the key is treated as an opaque string.
pub async fn citation_detail(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(citation_key): Path<String>,
) -> Response {
    let (session, _) = session_id(&jar);

    let bibliography = match state.bibs.get(&session) {
        Some(bib) => bib,
        None => {
            let body = ApiError {
                error: "No bibliography loaded.".to_string(),
            };
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }
    };

    match resolve_citation(&bibliography, &citation_key).await {
        Some(details) => {
            let body = CitationInfoResponse {
                citation_info: CitationInfo::from_details(&details),
            };
            axum::Json(body).into_response()
        }
        None => {
            let body = ApiError {
                error: format!("Citation information not found for key: {}", citation_key),
            };
            (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
        }
    }
}
