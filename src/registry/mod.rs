//! Type registries.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Kind::make_registry(&mut registry)      (kind becomes a registry)
//!     Member::register(&mut registry)         (joins nearest registry base)
//!     → Registry frozen behind Arc in AppState
//!
//! Serving:
//!     registry.entries_for(&kind)             (capability listings)
//! ```
//!
//! # Design Decisions
//! - The registry is owned by the bootstrap and passed by reference
//! - Membership is resolved through declared immediate bases
//! - Registration errors abort startup; lookups on non-registries are errors

pub mod kinds;
pub mod registrable;

pub use kinds::Registry;
pub use registrable::Registrable;

/// Errors raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Neither immediate base of the member is a registry.
    #[error("no registry ancestor found for {0}")]
    NoRegistryAncestor(&'static str),

    /// A registry kind tried to register as a member.
    #[error("can not register a registry: {0}")]
    RegistryNotRegistrable(&'static str),

    /// A registered member tried to become a registry.
    #[error("{kind} is already registered in {registry}")]
    AlreadyMember {
        kind: &'static str,
        registry: &'static str,
    },

    /// Lookup on a kind that is not a registry.
    #[error("not a registry: {0}")]
    NotARegistry(&'static str),
}

impl RegistryError {
    /// Returns `true` for lookup errors, `false` for configuration errors.
    pub fn is_lookup(&self) -> bool {
        matches!(self, RegistryError::NotARegistry(_))
    }
}
