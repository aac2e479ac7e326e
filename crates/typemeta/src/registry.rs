// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: single source of truth mapping a type to its descriptor.
//!
//! Lookups never fail loudly: a missing type yields `None` and the caller
//! decides. Only [`TypeRegistry::get_checked`] treats a miss as a contract
//! violation.
//!
//! # Example
//!
//! ```rust
//! use typemeta::{TypeIdentity, TypeLibraryBuilder};
//!
//! let registry = TypeLibraryBuilder::with_builtins().build().unwrap();
//!
//! let int32 = registry.get::<i32>().unwrap();
//! assert_eq!(int32.name(), "int32");
//! assert!(registry.get_by_name("int32").is_some());
//! assert!(registry.get_by_hash(TypeIdentity::compute_hash("int32")).is_some());
//! assert!(registry.get::<std::net::Ipv4Addr>().is_none());
//! ```

use crate::descriptor::TypeDescriptor;
use crate::identity::TypeIdentity;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Rust type `{rust_type}` is already registered as `{existing}`")]
    DuplicateType { rust_type: String, existing: String },

    #[error("Type name `{0}` is already registered")]
    DuplicateName(String),

    #[error("Type hash {hash:016x} of `{name}` collides with `{existing}`")]
    DuplicateHash {
        name: String,
        existing: String,
        hash: u64,
    },

    #[error("Member `{owner}.{member}` has unregistered type `{rust_type}`")]
    UnknownMemberType {
        owner: String,
        member: String,
        rust_type: String,
    },

    #[error("Method `{owner}.{method}` uses unregistered type `{rust_type}`")]
    UnknownMethodType {
        owner: String,
        method: String,
        rust_type: String,
    },

    #[error("Method `{owner}.{method}` takes {arity} parameters but {names} names were given")]
    ParameterCountMismatch {
        owner: String,
        method: String,
        arity: usize,
        names: usize,
    },

    #[error("Parent `{rust_type}` of `{owner}` is not registered")]
    UnknownParent { owner: String, rust_type: String },

    #[error("`{owner}` declares {kind} `{name}` twice")]
    DuplicateFeature {
        owner: String,
        kind: &'static str,
        name: String,
    },
}

/// Catalog of registered type descriptors.
///
/// Read-only once built; concurrent lookups from several threads are safe.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptors: Vec<Arc<TypeDescriptor>>,
    by_type_id: HashMap<TypeId, usize>,
    by_hash: HashMap<u64, usize>,
    by_name: HashMap<String, usize>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Fails if its Rust type, name or hash is already present.
    pub fn register(&mut self, descriptor: Arc<TypeDescriptor>) -> Result<(), RegistryError> {
        if let Some(existing) = self.get_by_type_id(descriptor.rust_type_id()) {
            return Err(RegistryError::DuplicateType {
                rust_type: descriptor.rust_name().to_string(),
                existing: existing.name().to_string(),
            });
        }
        if self.by_name.contains_key(descriptor.name()) {
            return Err(RegistryError::DuplicateName(descriptor.name().to_string()));
        }
        if let Some(existing) = self.get_by_hash(descriptor.hash()) {
            return Err(RegistryError::DuplicateHash {
                name: descriptor.name().to_string(),
                existing: existing.name().to_string(),
                hash: descriptor.hash(),
            });
        }

        let index = self.descriptors.len();
        self.by_type_id.insert(descriptor.rust_type_id(), index);
        self.by_hash.insert(descriptor.hash(), index);
        self.by_name.insert(descriptor.name().to_string(), index);
        log::debug!(
            "[registry] registered {} ({:016x}) as {}",
            descriptor.name(),
            descriptor.hash(),
            descriptor.rust_name()
        );
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Descriptor of `T`.
    pub fn get<T: Any + ?Sized>(&self) -> Option<&Arc<TypeDescriptor>> {
        self.get_by_type_id(TypeId::of::<T>())
    }

    /// Descriptor of `T`; a missing registration is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn get_checked<T: Any + ?Sized>(&self) -> &Arc<TypeDescriptor> {
        match self.get::<T>() {
            Some(descriptor) => descriptor,
            None => panic!(
                "type `{}` used before registration",
                std::any::type_name::<T>()
            ),
        }
    }

    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<&Arc<TypeDescriptor>> {
        self.by_type_id
            .get(&type_id)
            .map(|&index| &self.descriptors[index])
    }

    pub fn get_by_hash(&self, hash: u64) -> Option<&Arc<TypeDescriptor>> {
        self.by_hash.get(&hash).map(|&index| &self.descriptors[index])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.by_name.get(name).map(|&index| &self.descriptors[index])
    }

    /// Identity under which `T` is registered.
    pub fn identity_of<T: Any + ?Sized>(&self) -> Option<&TypeIdentity> {
        self.get::<T>().map(|d| d.identity())
    }

    /// Check whether `T` is registered.
    pub fn contains<T: Any + ?Sized>(&self) -> bool {
        self.by_type_id.contains_key(&TypeId::of::<T>())
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.descriptors.iter()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ConstructorDescriptor, TypeToken};

    fn leaf<T: Any + Default>(name: &str) -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::leaf(
            TypeIdentity::new(name),
            TypeToken::of::<T>(),
            Some(ConstructorDescriptor::of::<T>()),
        ))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TypeRegistry::new();
        registry.register(leaf::<i32>("int32")).expect("int32");
        registry.register(leaf::<String>("string")).expect("string");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get::<i32>().map(|d| d.name()), Some("int32"));
        assert_eq!(
            registry.get_by_name("string").map(|d| d.rust_type_id()),
            Some(TypeId::of::<String>())
        );
        let hash = TypeIdentity::compute_hash("int32");
        assert_eq!(registry.get_by_hash(hash).map(|d| d.name()), Some("int32"));
        assert_eq!(
            registry.iter().map(|d| d.name()).collect::<Vec<_>>(),
            vec!["int32", "string"]
        );
    }

    #[test]
    fn test_descriptors_keyed_by_described_type() {
        let mut registry = TypeRegistry::new();
        registry.register(leaf::<()>("void")).expect("void");
        registry.register(leaf::<bool>("bool")).expect("bool");
        registry.register(leaf::<u64>("uint64")).expect("uint64");

        assert_eq!(registry.get_by_type_id(TypeId::of::<bool>()).map(|d| d.name()), Some("bool"));
        assert_eq!(registry.get::<u64>().map(|d| d.name()), Some("uint64"));
        assert!(registry.get::<Arc<TypeDescriptor>>().is_none());
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get::<u8>().is_none());
        assert!(registry.get_by_name("uint8").is_none());
        assert!(registry.get_by_hash(0).is_none());
        assert!(registry.identity_of::<u8>().is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register(leaf::<i32>("int32")).expect("first");

        let err = registry.register(leaf::<i32>("other")).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { .. }));

        let err = registry.register(leaf::<i64>("int32")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("int32".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "used before registration")]
    fn test_get_checked_panics_on_miss() {
        let registry = TypeRegistry::new();
        let _ = registry.get_checked::<f64>();
    }
}
