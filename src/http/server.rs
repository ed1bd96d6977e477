//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Turn the collected route table into an Axum Router
//! - Attach each route's options to its handler
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Serve on a listener until shutdown is signalled

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, Extension, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AppConfig, HighlightConfig};
use crate::highlight::Highlighter;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::startup::Application;
use crate::registry::Registry;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub highlighter: Arc<dyn Highlighter>,
    pub registry: Arc<Registry>,
    pub highlight: HighlightConfig,
}

/// Errors turning a route table into a router.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("route '{pattern}': expected a request handler; got: {handler}")]
    NotAHandler {
        pattern: String,
        handler: &'static str,
    },

    #[error("route '{0}' must start with '/'")]
    RelativePattern(String),

    #[error("route '{0}' has a segment starting with ':' or '*'")]
    InvalidPattern(String),

    #[error("route '{0}' has a malformed capture")]
    InvalidCapture(String),

    #[error("route '{pattern}' conflicts with '{existing}'")]
    ConflictingPattern { pattern: String, existing: String },
}

/// HTTP server for the highlighting service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving the application's routes.
    pub fn new(
        config: &AppConfig,
        application: Application,
        highlighter: Arc<dyn Highlighter>,
    ) -> Result<Self, ServerError> {
        let state = AppState {
            highlighter,
            registry: Arc::new(application.registry),
            highlight: config.highlight.clone(),
        };

        let router = Self::build_router(config, &application.routes, state)?;
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &AppConfig,
        routes: &RouteTable,
        state: AppState,
    ) -> Result<Router, ServerError> {
        let mut router = Router::new();
        let mut shapes: HashMap<String, &str> = HashMap::new();

        for entry in routes {
            let pattern = entry.pattern();
            check_pattern(pattern)?;
            if let Some(existing) = shapes.insert(route_shape(pattern), pattern) {
                return Err(ServerError::ConflictingPattern {
                    pattern: pattern.to_string(),
                    existing: existing.to_string(),
                });
            }

            let handler = entry.handler();
            let method_router = handler.mount().ok_or_else(|| ServerError::NotAHandler {
                pattern: pattern.to_string(),
                handler: handler.ident(),
            })?;
            let options = entry.options().cloned().unwrap_or_default();

            tracing::debug!(pattern = %pattern, handler = %handler, "Mounting route");
            router = router.route(pattern, method_router.layer(Extension(options)));
        }

        Ok(router
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer()))
    }

    /// The assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn check_pattern(pattern: &str) -> Result<(), ServerError> {
    if !pattern.starts_with('/') {
        return Err(ServerError::RelativePattern(pattern.to_string()));
    }
    if pattern
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(ServerError::InvalidPattern(pattern.to_string()));
    }

    let segments: Vec<&str> = pattern.split('/').collect();
    for (index, segment) in segments.iter().enumerate() {
        if !segment.contains(['{', '}']) {
            continue;
        }
        let name = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| ServerError::InvalidCapture(pattern.to_string()))?;
        let (catch_all, name) = match name.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, name),
        };
        let last = index + 1 == segments.len();
        if name.is_empty() || name.contains(['{', '}', '*']) || (catch_all && !last) {
            return Err(ServerError::InvalidCapture(pattern.to_string()));
        }
    }
    Ok(())
}

/// `pattern` with every capture name erased; patterns of equal shape clash.
fn route_shape(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with("{*") {
                "{*}"
            } else if segment.starts_with('{') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
