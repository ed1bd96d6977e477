//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with fields, not formatted strings
//! - Request ID flows through the HTTP layer
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
