//! Explicit routes.
//!
//! # Responsibilities
//! - Bind a handler to a pattern given verbatim
//! - Reject targets that cannot serve requests
//!
//! # Design Decisions
//! - One table per router; the bootstrap owns the router
//! - Re-declaring a pattern rebinds it (last declaration wins)
//! - Explicit routes are merged after autoroutes, so they take precedence

use crate::handlers::types::{Declared, TypeRef};
use crate::routing::table::{RouteEntry, RouteOptions, RouteTable};
use crate::routing::RoutingError;

/// Router fed by direct pattern -> handler declarations.
#[derive(Debug, Default)]
pub struct ExplicitRouter {
    table: RouteTable,
}

impl ExplicitRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `target` to `pattern`.
    pub fn declare(
        &mut self,
        target: TypeRef,
        pattern: impl Into<String>,
        options: Option<RouteOptions>,
    ) -> Result<&mut Self, RoutingError> {
        if !target.is_handler() {
            return Err(RoutingError::NotAHandler(target.ident()));
        }

        let pattern = pattern.into();
        tracing::debug!(pattern = %pattern, handler = %target, "Declaring explicit route");

        let entry = match options {
            Some(options) => RouteEntry::with_options(pattern, target, options),
            None => RouteEntry::new(pattern, target),
        };
        self.table.push(entry);

        Ok(self)
    }

    /// Route the handler type `H` to `pattern`.
    pub fn route<H: Declared>(&mut self, pattern: impl Into<String>) -> Result<&mut Self, RoutingError> {
        self.declare(TypeRef::of::<H>(), pattern, None)
    }

    /// Route `H` to `pattern` with extra options for the mounted handler.
    pub fn route_with<H: Declared>(
        &mut self,
        pattern: impl Into<String>,
        options: RouteOptions,
    ) -> Result<&mut Self, RoutingError> {
        self.declare(TypeRef::of::<H>(), pattern, Some(options))
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RouteTable {
        &mut self.table
    }
}
