//! API endpoints over a real listener.

mod common;

use common::TestServer;
use highlight_sdk::{HighlightClient, SdkError};
use highlight_service::AppConfig;
use serde_json::json;

#[tokio::test]
async fn test_supported_formatters() {
    let server = TestServer::start(AppConfig::default()).await;
    let client = HighlightClient::new(&server.url);

    let formatters = client.supported_formatters().await.unwrap();

    assert_eq!(
        formatters.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["html", "latex", "rtf", "terminal"]
    );
    assert_eq!(formatters["latex"].also_known_as, vec!["tex"]);
    assert_eq!(formatters["latex"].content_type, "application/x-latex");
    assert!(formatters["html"].supports_style_defs);
    assert!(!formatters["terminal"].supports_style_defs);
}

#[tokio::test]
async fn test_highlight_by_alias_with_unknown_lexer() {
    let server = TestServer::start(AppConfig::default()).await;
    let client = HighlightClient::new(&server.url);

    let out = client
        .highlight("htm", "x > 1", Some("brainfudge"), None, None)
        .await
        .unwrap();

    assert_eq!(out.content_type.as_deref(), Some("text/html"));
    assert_eq!(out.body, "<div class=\"highlight\"><pre>x &gt; 1\n</pre></div>\n");
}

#[tokio::test]
async fn test_highlight_with_styles() {
    let server = TestServer::start(AppConfig::default()).await;
    let client = HighlightClient::new(&server.url);

    let out = client
        .highlight(
            "html",
            "x",
            None,
            Some(&json!({"cssclass": "syntax"})),
            Some(&json!(".syntax")),
        )
        .await
        .unwrap();

    assert!(out.body.starts_with("<div class=\"syntax\"><pre>x\n</pre></div>\n"));
    assert!(out.body.contains(".syntax"));
    assert!(out.body.len() > "<div class=\"syntax\"><pre>x\n</pre></div>\n".len());
}

#[tokio::test]
async fn test_styles_ignored_without_style_defs() {
    let server = TestServer::start(AppConfig::default()).await;
    let client = HighlightClient::new(&server.url);

    let out = client
        .highlight("console", "plain", None, None, Some(&json!(["pre"])))
        .await
        .unwrap();

    assert_eq!(out.body, "plain\n");
}

#[tokio::test]
async fn test_api_errors() {
    let server = TestServer::start(AppConfig::default()).await;
    let client = HighlightClient::new(&server.url);

    let err = client.highlight("svg", "x", None, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Status { status: 400, ref body } if body == "Unsupported formatter"
    ));

    let err = client
        .highlight("html", "x", None, Some(&json!({"nowrap": "yes"})), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Status { status: 400, .. }));

    let (status, body) = client
        .post_form("/api/formatter/html", &[("lexer", "text")])
        .await
        .unwrap();
    assert_eq!(status, 400);
    assert_eq!(body, "Missing argument code");

    let (status, _) = client
        .post_form("/api/formatter/html", &[("code", "x"), ("options", "[1]")])
        .await
        .unwrap();
    assert_eq!(status, 400);
}
