//! Handler type descriptors.
//!
//! # Responsibilities
//! - Describe a handler (or handler kind) type at runtime: identifier,
//!   optional explicit name, immediate ancestors
//! - Carry the "is a request handler" capability as an optional mount function
//! - Provide identity (by `TypeId`) for route tables and registries
//!
//! # Design Decisions
//! - Ancestry is declared explicitly through `Declared::bases`, not discovered
//! - `TypeRef` is `Copy`; it is a bag of `'static` data and fn pointers
//! - Only types that override `Declared::mount` are request handlers

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use axum::routing::MethodRouter;
use serde_json::Value;

use crate::http::server::AppState;

/// Builds the axum method router serving a handler type.
pub type MountFn = fn() -> MethodRouter<AppState>;

/// Implemented by every type that takes part in routing or registries.
pub trait Declared: 'static {
    /// Type identifier, as written in the source.
    const IDENT: &'static str;

    /// Explicit name used by naming rules instead of the identifier.
    const NAME: Option<&'static str> = None;

    /// Immediate ancestors, nearest first.
    fn bases() -> Vec<TypeRef> {
        Vec::new()
    }

    /// Self description exposed through capability listings.
    fn describe() -> Value {
        Value::Null
    }

    /// Mount function; `Some` only for request handlers.
    fn mount() -> Option<MountFn> {
        None
    }
}

/// Runtime reference to a declared type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    ident: &'static str,
    name: Option<&'static str>,
    bases: fn() -> Vec<TypeRef>,
    describe: fn() -> Value,
    mount: Option<MountFn>,
}

impl TypeRef {
    /// Reference the declared type `T`.
    pub fn of<T: Declared>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            ident: T::IDENT,
            name: T::NAME,
            bases: T::bases,
            describe: T::describe,
            mount: T::mount(),
        }
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Immediate ancestors in declaration order.
    pub fn bases(&self) -> Vec<TypeRef> {
        (self.bases)()
    }

    pub fn describe(&self) -> Value {
        (self.describe)()
    }

    /// Returns `true` when the type can serve requests.
    pub fn is_handler(&self) -> bool {
        self.mount.is_some()
    }

    /// Build the method router for this type, if it is a handler.
    pub fn mount(&self) -> Option<MethodRouter<AppState>> {
        self.mount.map(|mount| mount())
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ident)
    }
}
