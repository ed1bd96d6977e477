//! Landing page.

use axum::{
    response::Html,
    routing::{get, MethodRouter},
};

use crate::handlers::types::{Declared, MountFn};
use crate::http::server::AppState;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Highlight service</title>
</head>
<body>
  <h1>Highlight service</h1>
  <p>Syntax highlighting over HTTP.</p>
  <h2>Formatter endpoints</h2>
  <p>
    <code>POST /as/{formatter}</code> with the form fields <code>code</code>,
    <code>lexer</code>, <code>options</code> (JSON object) and
    <code>get_style_defs</code> (JSON list of selectors).
  </p>
  <h2>API</h2>
  <ul>
    <li><code>GET /api/supported/formatters</code></li>
    <li>
      <code>POST /api/formatter/{formatter}</code> with the form fields
      <code>code</code>, <code>lexer</code>, <code>options</code> and
      <code>styles</code>
    </li>
  </ul>
</body>
</html>
"#;

/// Serves the landing page.
pub struct IndexHandler;

impl Declared for IndexHandler {
    const IDENT: &'static str = "IndexHandler";

    fn mount() -> Option<MountFn> {
        Some(mount)
    }
}

fn mount() -> MethodRouter<AppState> {
    get(index)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
