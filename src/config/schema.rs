//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::RouteOptions;

/// Root configuration for the highlighting service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route conventions and extra routes.
    pub routing: RoutingConfig,

    /// Highlighting defaults.
    pub highlight: HighlightConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Routing conventions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Prefix of the formatter autoroutes.
    pub formatter_prefix: String,

    /// Suffix of the formatter autoroutes.
    pub formatter_suffix: String,

    /// Extra routes applied after collection; they override everything.
    pub routes: Vec<RouteConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            formatter_prefix: "/as/".to_string(),
            formatter_suffix: String::new(),
            routes: Vec::new(),
        }
    }
}

/// An extra route bound to a registered formatter handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Pattern to bind.
    pub pattern: String,

    /// Handler name, as produced by the lowered-name rule (e.g. "html").
    pub handler: String,

    /// Options attached to the route.
    #[serde(default)]
    pub options: RouteOptions,
}

/// Highlighting defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Lexer used when the requested one is missing or unknown.
    pub fallback_lexer: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            fallback_lexer: crate::highlight::FALLBACK.to_string(),
        }
    }
}
