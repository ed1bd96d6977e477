//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the handler registry
//! - Declare explicit routes and formatter autoroutes
//! - Collect them into the final route table, then apply configured routes
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Explicit routes are collected after autoroutes, so they win
//! - Configured routes are applied last and override everything

use crate::config::AppConfig;
use crate::handlers::formatters::{self, FormatterHandler};
use crate::handlers::{FormatterApiHandler, IndexHandler, SupportedFormattersHandler};
use crate::registry::{Registrable, Registry, RegistryError};
use crate::routing::{
    lowered_name, AutoRouter, Autoroute, ExplicitRouter, RouteEntry, RouteTable, RoutingError,
};

/// Everything the HTTP layer needs to serve.
#[derive(Debug)]
pub struct Application {
    pub routes: RouteTable,
    pub registry: Registry,
}

/// Errors aborting startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("route '{pattern}': no registered formatter named '{handler}'")]
    UnknownHandler { pattern: String, handler: String },
}

/// Build the registry and the final route table.
pub fn bootstrap(config: &AppConfig) -> Result<Application, StartupError> {
    let mut registry = Registry::new();
    formatters::register(&mut registry)?;
    tracing::debug!(
        formatters = FormatterHandler::entries(&registry)?.len(),
        "Formatter handlers registered"
    );

    let mut explicit = ExplicitRouter::new();
    explicit
        .route::<IndexHandler>("/")?
        .route::<SupportedFormattersHandler>("/api/supported/formatters")?
        .route::<FormatterApiHandler>("/api/formatter/{formatter}")?;

    let autoroute = Autoroute::builder()
        .prefix(config.routing.formatter_prefix.as_str())
        .suffix(config.routing.formatter_suffix.as_str())
        .rule(lowered_name)
        .build()?;
    let mut auto = AutoRouter::new();
    formatters::declare(&autoroute, &mut auto)?;

    let mut routes = RouteTable::collect([auto.table(), explicit.table()]);
    apply_configured_routes(config, &registry, &mut routes)?;

    for entry in &routes {
        tracing::info!(pattern = %entry.pattern(), handler = %entry.handler(), "Route");
    }

    Ok(Application { routes, registry })
}

fn apply_configured_routes(
    config: &AppConfig,
    registry: &Registry,
    routes: &mut RouteTable,
) -> Result<(), StartupError> {
    let formatters = FormatterHandler::entries(registry)?;

    for route in &config.routing.routes {
        let handler = formatters
            .iter()
            .find(|handler| lowered_name(handler) == route.handler)
            .ok_or_else(|| StartupError::UnknownHandler {
                pattern: route.pattern.clone(),
                handler: route.handler.clone(),
            })?;

        tracing::debug!(pattern = %route.pattern, handler = %handler, "Configured route");
        routes.push(RouteEntry::with_options(
            route.pattern.clone(),
            *handler,
            route.options.clone(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::handlers::{HtmlHandler, LatexHandler, TypeRef};
    use crate::routing::RouteOptions;

    fn configured(pattern: &str, handler: &str) -> RouteConfig {
        RouteConfig {
            pattern: pattern.to_string(),
            handler: handler.to_string(),
            options: RouteOptions::new(),
        }
    }

    #[test]
    fn test_default_routes() {
        let application = bootstrap(&AppConfig::default()).unwrap();

        assert_eq!(
            application.routes.urls(),
            vec![
                "/as/html",
                "/as/latex",
                "/as/rtf",
                "/as/terminal",
                "/",
                "/api/supported/formatters",
                "/api/formatter/{formatter}",
            ]
        );
        assert_eq!(
            application
                .registry
                .entries_for(&TypeRef::of::<FormatterHandler>())
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_configured_prefix_and_suffix() {
        let mut config = AppConfig::default();
        config.routing.formatter_prefix = "/".to_string();
        config.routing.formatter_suffix = ".out".to_string();

        let application = bootstrap(&config).unwrap();
        assert_eq!(
            application.routes.get("/html.out").unwrap().handler(),
            TypeRef::of::<HtmlHandler>()
        );
    }

    #[test]
    fn test_configured_route_overrides() {
        let mut config = AppConfig::default();
        config.routing.routes.push(configured("/html", "html"));
        config.routing.routes.push(configured("/", "terminal"));

        let application = bootstrap(&config).unwrap();
        let routes = &application.routes;

        assert_eq!(routes.get("/html").unwrap().handler(), TypeRef::of::<HtmlHandler>());
        assert_eq!(routes.get("/as/html").unwrap().handler(), TypeRef::of::<HtmlHandler>());
        assert_eq!(routes.get("/").unwrap().handler().ident(), "TerminalHandler");
        assert_eq!(routes.urls()[4], "/");
        assert_eq!(routes.len(), 8);
    }

    #[test]
    fn test_collected_autoroutes_and_explicit_routes() {
        let autoroute = Autoroute::builder().prefix("/as/").rule(lowered_name).build().unwrap();
        let mut auto = AutoRouter::new();
        autoroute.route::<HtmlHandler>(&mut auto).unwrap();
        autoroute.route::<LatexHandler>(&mut auto).unwrap();

        let mut explicit = ExplicitRouter::new();
        explicit
            .route::<HtmlHandler>("/html")
            .unwrap()
            .route::<HtmlHandler>("/as/latex")
            .unwrap();

        let routes = RouteTable::collect([auto.table(), explicit.table()]);

        assert_eq!(routes.urls(), vec!["/as/html", "/as/latex", "/html"]);
        assert_eq!(routes.get("/as/html").unwrap().handler(), TypeRef::of::<HtmlHandler>());
        assert_eq!(routes.get("/html").unwrap().handler(), TypeRef::of::<HtmlHandler>());
        assert_eq!(
            routes.get("/as/latex").unwrap().handler(),
            TypeRef::of::<HtmlHandler>()
        );
    }

    #[test]
    fn test_unknown_configured_handler() {
        let mut config = AppConfig::default();
        config.routing.routes.push(configured("/svg", "svg"));

        let err = bootstrap(&config).unwrap_err();
        assert!(matches!(err, StartupError::UnknownHandler { ref handler, .. } if handler == "svg"));
    }
}
