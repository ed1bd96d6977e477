//! Registry table: kinds and their members.
//!
//! # Responsibilities
//! - Promote a kind to a registry
//! - Register a member into the nearest registry among its immediate bases
//! - Enumerate and clear members
//!
//! # Design Decisions
//! - Only immediate bases are searched, in declaration order
//! - Members are kept in registration order; duplicates are kept
//! - Clearing a kind keeps it a registry; clearing everything un-promotes all

use std::collections::HashMap;

use crate::handlers::types::TypeRef;
use crate::registry::RegistryError;

/// Mapping from registry kinds to their ordered members.
#[derive(Debug, Default)]
pub struct Registry {
    kinds: HashMap<TypeRef, Vec<TypeRef>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `kind` has been promoted to a registry.
    pub fn is_registry(&self, kind: &TypeRef) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Promote `kind` to a registry with an empty member list.
    ///
    /// Fails when `kind` is already a member of another registry. Promoting
    /// an existing registry again resets its members.
    pub fn make_registry(&mut self, kind: TypeRef) -> Result<(), RegistryError> {
        if let Some(owner) = self.owner_of(&kind) {
            return Err(RegistryError::AlreadyMember {
                kind: kind.ident(),
                registry: owner.ident(),
            });
        }

        tracing::debug!(kind = %kind, "Promoting to registry");
        self.kinds.insert(kind, Vec::new());
        Ok(())
    }

    /// Register `member` into the first of its immediate bases that is a
    /// registry. Returns the kind it was registered into.
    pub fn register(&mut self, member: TypeRef) -> Result<TypeRef, RegistryError> {
        if self.is_registry(&member) {
            return Err(RegistryError::RegistryNotRegistrable(member.ident()));
        }

        let kind = member
            .bases()
            .into_iter()
            .find(|base| self.is_registry(base))
            .ok_or(RegistryError::NoRegistryAncestor(member.ident()))?;

        tracing::debug!(member = %member, kind = %kind, "Registering");
        self.kinds.entry(kind).or_default().push(member);
        Ok(kind)
    }

    /// Members of `kind`, in registration order.
    pub fn entries_for(&self, kind: &TypeRef) -> Result<&[TypeRef], RegistryError> {
        self.kinds
            .get(kind)
            .map(Vec::as_slice)
            .ok_or(RegistryError::NotARegistry(kind.ident()))
    }

    /// With a kind, empty its members; without, forget every registry.
    pub fn clear(&mut self, kind: Option<&TypeRef>) -> Result<(), RegistryError> {
        match kind {
            Some(kind) => {
                let members = self
                    .kinds
                    .get_mut(kind)
                    .ok_or(RegistryError::NotARegistry(kind.ident()))?;
                members.clear();
            }
            None => self.kinds.clear(),
        }
        Ok(())
    }

    fn owner_of(&self, member: &TypeRef) -> Option<TypeRef> {
        self.kinds
            .iter()
            .find(|(_, members)| members.contains(member))
            .map(|(kind, _)| *kind)
    }
}
