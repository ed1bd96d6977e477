//! Syntax highlighting HTTP service.
//!
//! Handlers are declared once at startup: formatter handlers join the
//! `FormatterHandler` registry and get autorouted under a prefix, the landing
//! page and API handlers are routed explicitly. The collected route table is
//! then mounted on an Axum router.

pub mod config;
pub mod handlers;
pub mod highlight;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{bootstrap, Application, Shutdown};
