//! Convention-based routes.
//!
//! # Responsibilities
//! - Synthesize a pattern as `prefix + rule(handler) + suffix`
//! - Write the resulting entry into the shared autoroute table
//!
//! # Design Decisions
//! - Every `Autoroute` writes into the same `AutoRouter` table; an autoroute
//!   is only a differently parameterized writer
//! - Colliding synthesized patterns follow last-write-wins, like explicit
//!   routes; no collision is reported
//! - Autoroutes are merged before explicit routes (lower precedence)

use std::fmt;
use std::sync::Arc;

use crate::handlers::types::{Declared, TypeRef};
use crate::routing::rules::NamingRule;
use crate::routing::table::{RouteEntry, RouteOptions, RouteTable};
use crate::routing::RoutingError;

/// Holder of the table shared by all autoroutes.
#[derive(Debug, Default)]
pub struct AutoRouter {
    table: RouteTable,
}

impl AutoRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RouteTable {
        &mut self.table
    }
}

/// A routing convention: prefix, naming rule and suffix.
#[derive(Clone)]
pub struct Autoroute {
    prefix: String,
    rule: NamingRule,
    suffix: String,
}

impl Autoroute {
    pub fn builder() -> AutorouteBuilder {
        AutorouteBuilder::default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_prefixed(&self) -> bool {
        !self.prefix.is_empty()
    }

    pub fn is_suffixed(&self) -> bool {
        !self.suffix.is_empty()
    }

    /// The pattern this autoroute assigns to `target`.
    pub fn pattern_for(&self, target: &TypeRef) -> String {
        format!("{}{}{}", self.prefix, (self.rule)(target), self.suffix)
    }

    /// Route `target` through this convention into `router`.
    pub fn declare(
        &self,
        router: &mut AutoRouter,
        target: TypeRef,
        options: Option<RouteOptions>,
    ) -> Result<TypeRef, RoutingError> {
        if !target.is_handler() {
            return Err(RoutingError::NotAHandler(target.ident()));
        }

        let pattern = self.pattern_for(&target);
        tracing::debug!(pattern = %pattern, handler = %target, "Declaring autoroute");

        let entry = match options {
            Some(options) => RouteEntry::with_options(pattern, target, options),
            None => RouteEntry::new(pattern, target),
        };
        router.table.push(entry);

        Ok(target)
    }

    /// Route the handler type `H`.
    pub fn route<H: Declared>(&self, router: &mut AutoRouter) -> Result<TypeRef, RoutingError> {
        self.declare(router, TypeRef::of::<H>(), None)
    }

    /// Route `H` with extra options for the mounted handler.
    pub fn route_with<H: Declared>(
        &self,
        router: &mut AutoRouter,
        options: RouteOptions,
    ) -> Result<TypeRef, RoutingError> {
        self.declare(router, TypeRef::of::<H>(), Some(options))
    }
}

impl fmt::Debug for Autoroute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autoroute")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Autoroute`]; the rule is mandatory.
#[derive(Default)]
pub struct AutorouteBuilder {
    prefix: Option<String>,
    rule: Option<NamingRule>,
    suffix: Option<String>,
}

impl AutorouteBuilder {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&TypeRef) -> String + Send + Sync + 'static,
    {
        self.rule = Some(Arc::new(rule));
        self
    }

    /// Use an already shared rule.
    pub fn shared_rule(mut self, rule: NamingRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn build(self) -> Result<Autoroute, RoutingError> {
        let rule = self.rule.ok_or(RoutingError::MissingRule)?;

        Ok(Autoroute {
            prefix: self.prefix.unwrap_or_default(),
            rule,
            suffix: self.suffix.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::types::MountFn;
    use crate::http::server::AppState;
    use crate::routing::rules::lowered_name;
    use axum::routing::{post, MethodRouter};
    use serde_json::json;

    fn serve() -> MethodRouter<AppState> {
        post(|| async { "ok" })
    }

    struct MethodHandler;
    impl Declared for MethodHandler {
        const IDENT: &'static str = "MethodHandler";

        fn mount() -> Option<MountFn> {
            Some(serve)
        }
    }

    struct KwargsHandler;
    impl Declared for KwargsHandler {
        const IDENT: &'static str = "KwargsHandler";

        fn mount() -> Option<MountFn> {
            Some(serve)
        }
    }

    struct PlainType;
    impl Declared for PlainType {
        const IDENT: &'static str = "PlainType";
    }

    fn api_autoroute() -> Autoroute {
        Autoroute::builder().prefix("/api/").rule(lowered_name).build().unwrap()
    }

    #[test]
    fn test_missing_rule_is_rejected() {
        let err = Autoroute::builder().prefix("/api/").build().unwrap_err();
        assert!(matches!(err, RoutingError::MissingRule));
    }

    #[test]
    fn test_defaults_to_empty_prefix_and_suffix() {
        let autoroute = Autoroute::builder().rule(lowered_name).build().unwrap();

        assert!(!autoroute.is_prefixed());
        assert!(!autoroute.is_suffixed());
        assert_eq!(autoroute.pattern_for(&TypeRef::of::<MethodHandler>()), "method");
    }

    #[test]
    fn test_autorouting_from_prefix() {
        let mut router = AutoRouter::new();
        api_autoroute().route::<MethodHandler>(&mut router).unwrap();

        assert!(router.table().handlers().contains(&TypeRef::of::<MethodHandler>()));
        assert!(router.table().urls().contains(&"/api/method"));
    }

    #[test]
    fn test_autorouting_with_suffix() {
        let autoroute = Autoroute::builder()
            .prefix("/api/")
            .rule(lowered_name)
            .suffix(".json")
            .build()
            .unwrap();
        assert!(autoroute.is_prefixed());
        assert!(autoroute.is_suffixed());

        let mut router = AutoRouter::new();
        autoroute.route::<MethodHandler>(&mut router).unwrap();

        assert_eq!(router.table().urls(), vec!["/api/method.json"]);
    }

    #[test]
    fn test_autorouting_with_kwargs() {
        let mut options = RouteOptions::new();
        options.insert("custom".into(), json!("settings"));

        let mut router = AutoRouter::new();
        api_autoroute()
            .route_with::<KwargsHandler>(&mut router, options.clone())
            .unwrap();

        assert!(router.table().handlers().contains(&TypeRef::of::<KwargsHandler>()));
        assert!(router.table().urls().contains(&"/api/kwargs"));
        assert!(router.table().kwargs().contains(&&options));
    }

    #[test]
    fn test_custom_closure_rule() {
        let autoroute = Autoroute::builder()
            .prefix("/v1/")
            .rule(|handler: &TypeRef| handler.ident().to_uppercase())
            .build()
            .unwrap();

        assert_eq!(autoroute.pattern_for(&TypeRef::of::<MethodHandler>()), "/v1/METHODHANDLER");
    }

    #[test]
    fn test_rejects_non_handler() {
        let mut router = AutoRouter::new();
        let err = api_autoroute().route::<PlainType>(&mut router).unwrap_err();

        assert!(matches!(err, RoutingError::NotAHandler("PlainType")));
        assert!(router.table().is_empty());
    }

    #[test]
    fn test_instances_share_one_table() {
        let mut router = AutoRouter::new();
        api_autoroute().route::<MethodHandler>(&mut router).unwrap();

        let other = Autoroute::builder().prefix("/other/").rule(lowered_name).build().unwrap();
        other.route::<KwargsHandler>(&mut router).unwrap();

        assert_eq!(router.table().urls(), vec!["/api/method", "/other/kwargs"]);
    }

    #[test]
    fn test_colliding_autoroutes_last_write_wins() {
        let mut router = AutoRouter::new();
        let by_name = Autoroute::builder().prefix("/x/").rule(|_: &TypeRef| "same".to_string()).build().unwrap();
        let also = Autoroute::builder().prefix("/x/s").rule(|_: &TypeRef| "ame".to_string()).build().unwrap();

        by_name.route::<MethodHandler>(&mut router).unwrap();
        also.route::<KwargsHandler>(&mut router).unwrap();

        assert_eq!(router.table().len(), 1);
        assert_eq!(
            router.table().get("/x/same").map(RouteEntry::handler),
            Some(TypeRef::of::<KwargsHandler>())
        );
    }
}
