//! Client for the highlight service.

mod client;

pub use client::{HighlightClient, Highlighted, SdkError, SupportedFormatter};
