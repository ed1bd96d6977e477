//! Opt-in registration capability for declared types.

use crate::handlers::types::{Declared, TypeRef};
use crate::registry::{Registry, RegistryError};

/// Lets a type promote itself to a registry or join the registry of one of
/// its immediate bases.
pub trait Registrable: Declared + Sized {
    /// Make `Self` a registry kind.
    fn make_registry(registry: &mut Registry) -> Result<(), RegistryError> {
        registry.make_registry(TypeRef::of::<Self>())
    }

    /// Register `Self` into its nearest registry base.
    fn register(registry: &mut Registry) -> Result<TypeRef, RegistryError> {
        registry.register(TypeRef::of::<Self>())
    }

    /// Members registered under `Self`.
    fn entries(registry: &Registry) -> Result<&[TypeRef], RegistryError> {
        registry.entries_for(&TypeRef::of::<Self>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Formatters;
    impl Declared for Formatters {
        const IDENT: &'static str = "Formatters";
    }
    impl Registrable for Formatters {}

    struct Html;
    impl Declared for Html {
        const IDENT: &'static str = "Html";

        fn bases() -> Vec<TypeRef> {
            vec![TypeRef::of::<Formatters>()]
        }
    }
    impl Registrable for Html {}

    #[test]
    fn test_make_registry_then_register_member() {
        let mut registry = Registry::new();
        Formatters::make_registry(&mut registry).unwrap();
        Html::register(&mut registry).unwrap();

        assert_eq!(Formatters::entries(&registry).unwrap(), &[TypeRef::of::<Html>()]);
    }

    #[test]
    fn test_registry_cannot_register_itself() {
        let mut registry = Registry::new();
        Formatters::make_registry(&mut registry).unwrap();

        assert!(matches!(
            Formatters::register(&mut registry),
            Err(RegistryError::RegistryNotRegistrable("Formatters"))
        ));
    }
}
