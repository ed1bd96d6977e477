//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Handler declarations (at startup):
//!     explicit.rs  → ExplicitRouter table   (pattern given verbatim)
//!     auto.rs      → AutoRouter table       (pattern = prefix + rule + suffix)
//!
//! Route Collection (once):
//!     RouteTable::collect([auto, explicit])
//!     → later tables override identical patterns
//!     → final RouteTable handed to http::server
//! ```
//!
//! # Design Decisions
//! - Tables are filled once, before serving; no locking, no hot reload
//! - Patterns are unique per table; a duplicate rebinds in place
//! - Explicit routes win over autoroutes only because they are collected last
//! - Every failure is a startup error; nothing here reaches an HTTP client

pub mod auto;
pub mod explicit;
pub mod rules;
pub mod table;

pub use auto::{AutoRouter, Autoroute, AutorouteBuilder};
pub use explicit::ExplicitRouter;
pub use rules::{lowered_name, NamingRule};
pub use table::{RouteEntry, RouteOptions, RouteTable};

/// Configuration errors raised while declaring routes.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The route target does not implement a request handler.
    #[error("expected a request handler; got: {0}")]
    NotAHandler(&'static str),

    /// An autoroute was built without a naming rule.
    #[error("an autoroute must specify a naming rule")]
    MissingRule,
}
