//! JSON/plain API handlers.
//!
//! # Endpoints
//! - `GET /api/supported/formatters` - registered formatters and what they support
//! - `POST /api/formatter/{formatter}` - highlight with a formatter named by
//!   name or alias; `code` required, `lexer`, `options` and `styles` optional
//!
//! # Design Decisions
//! - Formatters are listed from the registry on every request
//! - An unknown lexer falls back to plain text instead of failing

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::handlers::base::{ApiError, Arguments};
use crate::handlers::formatters::{registered_formatters, FormatterInfo};
use crate::handlers::types::{Declared, MountFn};
use crate::highlight::{lexer_by_name, FormatterOptions};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteOptions;

/// One formatter in the supported formatters listing.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedFormatter {
    pub also_known_as: Vec<String>,
    pub supports_style_defs: bool,
    pub content_type: String,
}

impl From<FormatterInfo> for SupportedFormatter {
    fn from(info: FormatterInfo) -> Self {
        Self {
            also_known_as: info.also_known_as,
            supports_style_defs: info.supports_style_defs,
            content_type: info.content_type,
        }
    }
}

/// Lists the registered formatters.
pub struct SupportedFormattersHandler;

impl Declared for SupportedFormattersHandler {
    const IDENT: &'static str = "SupportedFormattersHandler";

    fn mount() -> Option<MountFn> {
        Some(mount_supported_formatters)
    }
}

fn mount_supported_formatters() -> MethodRouter<AppState> {
    get(supported_formatters)
}

async fn supported_formatters(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, SupportedFormatter>>, ApiError> {
    let formatters = registered_formatters(&state.registry)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Json(
        formatters
            .into_iter()
            .map(|info| (info.name.clone(), info.into()))
            .collect(),
    ))
}

/// Highlights with the formatter named in the path.
pub struct FormatterApiHandler;

impl Declared for FormatterApiHandler {
    const IDENT: &'static str = "FormatterApiHandler";

    fn mount() -> Option<MountFn> {
        Some(mount_formatter_api)
    }
}

fn mount_formatter_api() -> MethodRouter<AppState> {
    post(highlight_with)
}

async fn highlight_with(
    State(state): State<AppState>,
    Path(formatter): Path<String>,
    Extension(route_options): Extension<RouteOptions>,
    args: Arguments,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let info = resolve_formatter(&state, &formatter)?;

    let result = render(&state, &info, route_options, &args);
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request(&info.name, status, start);

    let body = result?;
    Ok(([(header::CONTENT_TYPE, info.content_type)], body).into_response())
}

fn resolve_formatter(state: &AppState, name: &str) -> Result<FormatterInfo, ApiError> {
    registered_formatters(&state.registry)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .into_iter()
        .find(|info| info.answers_to(name))
        .ok_or_else(|| ApiError::UnsupportedFormatter(name.to_string()))
}

fn render(
    state: &AppState,
    info: &FormatterInfo,
    route_options: RouteOptions,
    args: &Arguments,
) -> Result<String, ApiError> {
    let code = args.required("code")?;
    let requested = args.optional("lexer").unwrap_or_default();
    let lexer = lexer_by_name(
        state.highlighter.as_ref(),
        requested,
        &state.highlight.fallback_lexer,
    );
    let mut options = route_options;
    options.extend(args.json::<FormatterOptions>("options", "{}")?);
    let styles: Value = args.json("styles", "null")?;

    let mut body = state
        .highlighter
        .highlight(code, lexer, &info.name, &options)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if info.supports_style_defs && is_truthy(&styles) {
        let defs = state
            .highlighter
            .style_defs(&info.name, &selectors(styles), &options)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        body.push_str(&defs);
    }

    Ok(body)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Selectors named by a `styles` value; `true` means the default selector.
fn selectors(styles: Value) -> Vec<String> {
    match styles {
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(".syntax")));
        assert!(is_truthy(&json!(["pre"])));
    }

    #[test]
    fn test_selectors() {
        assert_eq!(selectors(json!(".syntax")), vec![".syntax"]);
        assert_eq!(selectors(json!(["pre", 1, "code"])), vec!["pre", "code"]);
        assert!(selectors(json!(true)).is_empty());
    }

    #[test]
    fn test_api_handlers_are_handlers() {
        use crate::handlers::types::TypeRef;

        assert!(TypeRef::of::<SupportedFormattersHandler>().is_handler());
        assert!(TypeRef::of::<FormatterApiHandler>().is_handler());
    }
}
