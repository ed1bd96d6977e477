//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Registry → Route declarations → Collected route table
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Broadcast → Server stops accepting → Drain → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: registry first, then routes, then listeners
//! - Fail fast: any declaration error aborts startup

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, Application, StartupError};
