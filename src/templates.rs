//! HTML templates and styling for the web interface.

// ============================================================================
// CSS
// ============================================================================

pub const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
    line-height: 1.6;
    color: #333;
    background: #fdfdfd;
}

.container { max-width: 900px; margin: 0 auto; padding: 1rem; }

h1 { font-size: 1.4rem; margin-bottom: 1rem; }

.upload-form {
    border: 1px solid #ddd;
    border-radius: 6px;
    padding: 1rem;
    margin-bottom: 1.5rem;
    background: #fff;
}
.upload-form label { display: block; margin-top: 0.5rem; font-size: 0.9rem; }
.upload-form button { margin-top: 0.75rem; padding: 0.4rem 1rem; cursor: pointer; }

.error { color: #b00020; margin-bottom: 1rem; }

.tex-content {
    white-space: pre-wrap;
    font-family: "SF Mono", Menlo, Consolas, monospace;
    font-size: 0.85rem;
    border: 1px solid #ddd;
    border-radius: 6px;
    padding: 1rem;
    background: #fff;
}

.cite-command { font-weight: 600; }
.citation-link { text-decoration: underline; }

.cite-plain .citation-link, a.citation-link.cite-plain { color: #1a0dab; }
a.citation-link.cite-paren { color: #1565c0; }
a.citation-link.cite-text { color: #2e7d32; }
a.citation-link.cite-author { color: #6a1b9a; }
a.citation-link.cite-year { color: #e65100; }
a.citation-link.cite-alt { color: #00695c; }

#citation-detail {
    position: fixed;
    right: 1rem;
    bottom: 1rem;
    max-width: 24rem;
    max-height: 50vh;
    overflow-y: auto;
    border: 1px solid #bbb;
    border-radius: 6px;
    padding: 0.75rem;
    background: #fffef5;
    box-shadow: 0 2px 8px rgba(0,0,0,0.15);
    font-size: 0.85rem;
    display: none;
}
#citation-detail dt { font-weight: 600; }
#citation-detail dd { margin: 0 0 0.4rem 0; }
"#;

// ============================================================================
// JavaScript
// ============================================================================

/// Click handler: fetch citation details for a clicked key and render them
/// in the floating detail panel.
pub const DETAIL_JS: &str = r#"
document.addEventListener('click', async (e) => {
    const link = e.target.closest('.citation-link');
    if (!link) return;
    e.preventDefault();

    const key = link.dataset.citationKey;
    const panel = document.getElementById('citation-detail');
    panel.style.display = 'block';
    panel.innerHTML = '<em>Loading…</em>';

    try {
        const resp = await fetch('/api/citation/' + encodeURIComponent(key));
        const data = await resp.json();
        if (!resp.ok) {
            panel.innerHTML = '<strong>' + (data.error || 'Lookup failed') + '</strong>';
            return;
        }
        const info = data.citation_info;
        panel.innerHTML = '<dl>'
            + '<dt>Title</dt><dd>' + info.title + '</dd>'
            + '<dt>Authors</dt><dd>' + info.author + '</dd>'
            + '<dt>Year</dt><dd>' + info.year + '</dd>'
            + '<dt>Venue</dt><dd>' + info.journal + '</dd>'
            + '<dt>DOI</dt><dd>' + info.doi + '</dd>'
            + '<dt>Citations</dt><dd>' + info.citation_count + '</dd>'
            + '<dt>Abstract</dt><dd>' + info.abstract + '</dd>'
            + '</dl>';
    } catch (err) {
        panel.innerHTML = '<strong>Lookup failed</strong>';
    }
});
"#;

// ============================================================================
// Pages
// ============================================================================

/// Wrap page content in the common HTML shell.
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="container">
{content}
</div>
<div id="citation-detail"></div>
<script>{js}</script>
</body>
</html>"#,
        title = title,
        style = STYLE,
        content = content,
        js = DETAIL_JS,
    )
}

/// The index page: upload form, optional error banner, and — after a
/// successful upload — the annotated document.
pub fn index_page(error: Option<&str>, annotated: Option<&str>) -> String {
    let mut content = String::from("<h1>Citation Explorer</h1>\n");

    if let Some(msg) = error {
        content.push_str(&format!("<p class=\"error\">{}</p>\n", msg));
    }

    content.push_str(
        r#"<form class="upload-form" method="post" action="/" enctype="multipart/form-data">
<label>Bibliography (.bib) <input type="file" name="bib_file" accept=".bib"></label>
<label>Document (.tex) <input type="file" name="tex_file" accept=".tex"></label>
<button type="submit">Annotate</button>
</form>
"#,
    );

    if let Some(tex) = annotated {
        content.push_str("<div class=\"tex-content\">");
        content.push_str(tex);
        content.push_str("</div>\n");
    }

    base_html("Citation Explorer", &content)
}
