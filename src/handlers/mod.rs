//! Request handlers.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     formatters.rs → Registry (FormatterHandler kind) + formatter autoroute
//!     frontends.rs, api.rs → explicit routes
//!
//! Request:
//!     axum route → base.rs (Arguments, ApiError)
//!     → formatter/API handler → highlight::Highlighter
//! ```
//!
//! # Design Decisions
//! - Handler types are zero-sized markers; behaviour lives in their mount fn
//! - Route options reach handlers as `Extension<RouteOptions>`
//! - Errors are plain text bodies with a 400 or 404 status

pub mod api;
pub mod base;
pub mod formatters;
pub mod frontends;
pub mod types;

pub use api::{FormatterApiHandler, SupportedFormattersHandler};
pub use base::{ApiError, Arguments};
pub use formatters::{
    Formatter, FormatterHandler, FormatterInfo, HtmlHandler, LatexHandler, RtfHandler,
    TerminalHandler,
};
pub use frontends::IndexHandler;
pub use types::{Declared, MountFn, TypeRef};
