//! Formatter handlers.
//!
//! # Responsibilities
//! - One request handler per output format (HTML, LaTeX, RTF, terminal)
//! - The `FormatterHandler` registry kind they all register into
//! - Routing them through the formatter autoroute
//!
//! # Request
//! `POST` with form arguments:
//! - `code` - the code to highlight (required)
//! - `lexer` - name of the lexer (required)
//! - `options` - JSON object of formatter options (optional)
//! - `get_style_defs` - JSON array of selectors for the style definitions;
//!   ignored by formatters without style definitions (optional)

use std::time::Instant;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{post, MethodRouter},
    Extension,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::handlers::base::{ApiError, Arguments};
use crate::handlers::types::{Declared, MountFn, TypeRef};
use crate::highlight::FormatterOptions;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::registry::{Registrable, Registry, RegistryError};
use crate::routing::{AutoRouter, Autoroute, RouteOptions, RoutingError};

/// Registry kind of every formatter handler.
pub struct FormatterHandler;

impl Declared for FormatterHandler {
    const IDENT: &'static str = "FormatterHandler";
}

impl Registrable for FormatterHandler {}

/// Capabilities of a formatter, as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatterInfo {
    pub name: String,
    pub also_known_as: Vec<String>,
    pub supports_style_defs: bool,
    pub content_type: String,
}

impl FormatterInfo {
    /// Read the info a formatter handler describes itself with.
    pub fn from_type(handler: &TypeRef) -> Option<Self> {
        serde_json::from_value(handler.describe()).ok()
    }

    /// Returns `true` for the formatter's name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.also_known_as.iter().any(|alias| alias == name)
    }
}

/// Infos of every registered formatter handler, in registration order.
pub fn registered_formatters(registry: &Registry) -> Result<Vec<FormatterInfo>, RegistryError> {
    Ok(FormatterHandler::entries(registry)?
        .iter()
        .filter_map(FormatterInfo::from_type)
        .collect())
}

/// Code, lexer and options of a highlight about to happen.
#[derive(Debug, Clone)]
pub struct HighlightRequest {
    pub code: String,
    pub lexer: String,
    pub options: FormatterOptions,
}

/// A handler rendering one output format.
pub trait Formatter: Declared {
    /// Backend formatter name.
    const FORMATTER: &'static str;

    const CONTENT_TYPE: &'static str;

    const SUPPORTS_STYLE_DEFS: bool = false;

    const ALIASES: &'static [&'static str] = &[];

    /// Called before highlighting.
    fn pre_highlight(request: HighlightRequest) -> HighlightRequest {
        request
    }

    /// Called with the highlighted output.
    fn post_highlight(highlighted: String) -> String {
        highlighted
    }

    /// Called with the selectors before fetching style definitions.
    fn pre_get_style_defs(selectors: Vec<String>) -> Vec<String> {
        selectors
    }

    /// Called with the fetched style definitions.
    fn post_get_style_defs(defs: String) -> String {
        defs
    }
}

fn formatter_bases() -> Vec<TypeRef> {
    vec![TypeRef::of::<FormatterHandler>()]
}

fn describe<F: Formatter>() -> Value {
    serde_json::to_value(FormatterInfo {
        name: F::FORMATTER.to_string(),
        also_known_as: F::ALIASES.iter().map(|a| a.to_string()).collect(),
        supports_style_defs: F::SUPPORTS_STYLE_DEFS,
        content_type: F::CONTENT_TYPE.to_string(),
    })
    .unwrap_or(Value::Null)
}

fn mount<F: Formatter>() -> MethodRouter<AppState> {
    post(handle::<F>)
}

/// Selectors from a `get_style_defs` argument: a JSON array or string, or
/// the raw text when it is not JSON.
pub(crate) fn parse_selectors(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(Value::String(s)) => vec![s],
        Ok(_) => Vec::new(),
        Err(_) => vec![raw.to_string()],
    }
}

async fn handle<F: Formatter>(
    State(state): State<AppState>,
    Extension(route_options): Extension<RouteOptions>,
    args: Arguments,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let result = highlight::<F>(&state, route_options, &args);
    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request(F::FORMATTER, status, start);

    let body = result?;
    Ok(([(header::CONTENT_TYPE, F::CONTENT_TYPE)], body).into_response())
}

fn highlight<F: Formatter>(
    state: &AppState,
    route_options: RouteOptions,
    args: &Arguments,
) -> Result<String, ApiError> {
    let code = args.required("code")?;
    let lexer = args.required("lexer")?;
    let mut options = route_options;
    options.extend(args.json::<FormatterOptions>("options", "{}")?);

    if !state.highlighter.has_lexer(lexer) {
        return Err(ApiError::NotFound(format!("no lexer for alias '{}' found", lexer)));
    }

    let request = F::pre_highlight(HighlightRequest {
        code: code.to_string(),
        lexer: lexer.to_string(),
        options,
    });

    let highlighted = state
        .highlighter
        .highlight(&request.code, &request.lexer, F::FORMATTER, &request.options)
        .map_err(|e| ApiError::NotFound(e.to_string()))?;
    let mut body = F::post_highlight(highlighted);

    if F::SUPPORTS_STYLE_DEFS {
        if let Some(raw) = args.optional("get_style_defs") {
            let selectors = F::pre_get_style_defs(parse_selectors(raw));
            let defs = state
                .highlighter
                .style_defs(F::FORMATTER, &selectors, &request.options)
                .map_err(|e| ApiError::NotFound(e.to_string()))?;
            body.push_str(&F::post_get_style_defs(defs));
        }
    }

    Ok(body)
}

/// HTML output.
pub struct HtmlHandler;

impl Declared for HtmlHandler {
    const IDENT: &'static str = "HtmlHandler";

    fn bases() -> Vec<TypeRef> {
        formatter_bases()
    }

    fn describe() -> Value {
        describe::<Self>()
    }

    fn mount() -> Option<MountFn> {
        Some(mount::<Self>)
    }
}

impl Formatter for HtmlHandler {
    const FORMATTER: &'static str = "html";
    const CONTENT_TYPE: &'static str = "text/html";
    const SUPPORTS_STYLE_DEFS: bool = true;
    const ALIASES: &'static [&'static str] = &["htm"];
}

impl Registrable for HtmlHandler {}

/// LaTeX output.
pub struct LatexHandler;

impl Declared for LatexHandler {
    const IDENT: &'static str = "LatexHandler";

    fn bases() -> Vec<TypeRef> {
        formatter_bases()
    }

    fn describe() -> Value {
        describe::<Self>()
    }

    fn mount() -> Option<MountFn> {
        Some(mount::<Self>)
    }
}

impl Formatter for LatexHandler {
    const FORMATTER: &'static str = "latex";
    const CONTENT_TYPE: &'static str = "application/x-latex";
    const ALIASES: &'static [&'static str] = &["tex"];
}

impl Registrable for LatexHandler {}

/// RTF output.
pub struct RtfHandler;

impl Declared for RtfHandler {
    const IDENT: &'static str = "RtfHandler";

    fn bases() -> Vec<TypeRef> {
        formatter_bases()
    }

    fn describe() -> Value {
        describe::<Self>()
    }

    fn mount() -> Option<MountFn> {
        Some(mount::<Self>)
    }
}

impl Formatter for RtfHandler {
    const FORMATTER: &'static str = "rtf";
    const CONTENT_TYPE: &'static str = "application/msword";
}

impl Registrable for RtfHandler {}

/// Terminal escape output.
pub struct TerminalHandler;

impl Declared for TerminalHandler {
    const IDENT: &'static str = "TerminalHandler";

    fn bases() -> Vec<TypeRef> {
        formatter_bases()
    }

    fn describe() -> Value {
        describe::<Self>()
    }

    fn mount() -> Option<MountFn> {
        Some(mount::<Self>)
    }
}

impl Formatter for TerminalHandler {
    const FORMATTER: &'static str = "terminal";
    const CONTENT_TYPE: &'static str = "text/plain";
    const ALIASES: &'static [&'static str] = &["console"];
}

impl Registrable for TerminalHandler {}

/// Promote the formatter kind and register every formatter handler.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    FormatterHandler::make_registry(registry)?;
    HtmlHandler::register(registry)?;
    LatexHandler::register(registry)?;
    RtfHandler::register(registry)?;
    TerminalHandler::register(registry)?;
    Ok(())
}

/// Route every formatter handler through `autoroute`.
pub fn declare(autoroute: &Autoroute, router: &mut AutoRouter) -> Result<(), RoutingError> {
    autoroute.route::<HtmlHandler>(router)?;
    autoroute.route::<LatexHandler>(router)?;
    autoroute.route::<RtfHandler>(router)?;
    autoroute.route::<TerminalHandler>(router)?;
    Ok(())
}
