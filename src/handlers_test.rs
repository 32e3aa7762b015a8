//! Tests for the HTTP handlers.

use super::*;
use axum_extra::extract::cookie::Cookie;

fn jar_for(session: &str) -> CookieJar {
    CookieJar::new().add(Cookie::new(SESSION_COOKIE, session.to_string()))
}

fn state_with_bib(session: &str, bib_src: &str) -> Arc<AppState> {
    let state = Arc::new(AppState::new());
    let bib = parse_bib_file(bib_src).expect("test bibliography parses");
    state.bibs.store(session, bib);
    state
}

// ============================================================================
// Session Cookie Tests
// ============================================================================

#[test]
fn session_id_reuses_cookie_value() {
    let (id, is_new) = session_id(&jar_for("abc123"));
    assert_eq!(id, "abc123");
    assert!(!is_new);
}

#[test]
fn session_id_issues_fresh_id_when_absent() {
    let (id, is_new) = session_id(&CookieJar::new());
    assert_eq!(id.len(), 32);
    assert!(is_new);
}

// ============================================================================
// Citation Detail API Tests
// ============================================================================

#[tokio::test]
async fn detail_without_bibliography_is_bad_request() {
    let state = Arc::new(AppState::new());
    let response = citation_detail(
        State(state),
        CookieJar::new(),
        Path("smith2020".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_unknown_key_is_not_found() {
    let state = state_with_bib("sess", "@article{smith2020, title = {T}}");
    let response = citation_detail(State(state), jar_for("sess"), Path("nope".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_known_key_is_ok() {
    // Entry without a DOI so resolution never leaves the process
    let state = state_with_bib("sess", "@article{smith2020, title = {T}, year = {2020}}");
    let response =
        citation_detail(State(state), jar_for("sess"), Path("smith2020".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn detail_is_scoped_to_the_requesting_session() {
    // A bibliography loaded by one session must look absent to another
    let state = state_with_bib("alice", "@article{smith2020, title = {T}}");
    let response = citation_detail(
        State(state),
        jar_for("bob"),
        Path("smith2020".to_string()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
