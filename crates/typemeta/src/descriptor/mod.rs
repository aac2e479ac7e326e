// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor model: immutable metadata records describing registered types.
//!
//! # Features
//!
//! - **TypeDescriptor**: a type's constructor, members, methods, named values
//!   and optional parent
//! - **MemberDescriptor**: a field, reached through a type-erased accessor
//! - **MethodDescriptor**: a callable, stored as a signature-checked thunk
//! - **ValueDescriptor**: a named constant of an enumeration
//! - **Builder API**: fluent registration ([`TypeLibraryBuilder`])
//!
//! # Example
//!
//! ```rust
//! use typemeta::TypeLibraryBuilder;
//!
//! #[derive(Default)]
//! struct Sensor {
//!     id: u32,
//!     reading: f64,
//! }
//!
//! impl Sensor {
//!     fn scaled(&self, factor: f64) -> f64 {
//!         self.reading * factor
//!     }
//! }
//!
//! let registry = TypeLibraryBuilder::with_builtins()
//!     .begin_type::<Sensor>("Sensor")
//!     .member("id", |s| &s.id, |s| &mut s.id)
//!     .member("reading", |s| &s.reading, |s| &mut s.reading)
//!     .method("scaled", Sensor::scaled, &["factor"])
//!     .end_type()
//!     .build()
//!     .unwrap();
//!
//! let sensor = registry.get::<Sensor>().unwrap();
//! assert_eq!(sensor.members().len(), 2);
//! assert_eq!(sensor.get_method_by_name("scaled").unwrap().arity(), 1);
//! ```

mod builder;
mod constructor;
mod member;
mod method;
mod type_descriptor;
mod value;

pub use builder::{TypeBuilder, TypeLibraryBuilder};
pub use constructor::ConstructorDescriptor;
pub use member::{MemberAccess, MemberDescriptor, Upcast};
pub use method::{
    Arguments, IntoMethod, MethodDescriptor, MethodThunk, ParameterDescriptor, Signature,
};
pub use type_descriptor::{ParentLink, TypeDescriptor};
pub use value::{EnumRepr, ValueDescriptor};

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime type token: `TypeId` plus the Rust type name for diagnostics.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    rust_name: &'static str,
}

impl TypeToken {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name)
    }
}

#[cfg(test)]
mod tests;
