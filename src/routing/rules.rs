//! Naming rules used by autoroutes.
//!
//! A rule maps a handler type to the bare name that an autoroute wraps in
//! its prefix and suffix.

use std::sync::Arc;

use crate::handlers::types::TypeRef;

/// Maps a handler type to a bare route name.
pub type NamingRule = Arc<dyn Fn(&TypeRef) -> String + Send + Sync>;

/// Conventional suffix stripped by [`lowered_name`].
pub const HANDLER_SUFFIX: &str = "Handler";

/// The explicit `NAME` of the handler if it has one, otherwise its
/// identifier with one trailing `Handler` removed. Either way lowercased.
pub fn lowered_name(handler: &TypeRef) -> String {
    let name = match handler.name() {
        Some(name) => name,
        None => {
            let ident = handler.ident();
            ident.strip_suffix(HANDLER_SUFFIX).unwrap_or(ident)
        }
    };

    name.to_lowercase()
}
