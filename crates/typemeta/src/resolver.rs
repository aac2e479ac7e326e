// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-based access to the members and methods of a live instance.
//!
//! A [`Resolver`] pairs a [`TypeDescriptor`] with the Rust type it describes.
//! Every lookup checks both the name (recursively through the parent chain)
//! and the declared type; either mismatch yields `None`.
//!
//! # Example
//!
//! ```rust
//! use typemeta::{Resolver, TypeLibraryBuilder};
//!
//! #[derive(Default)]
//! struct Gauge {
//!     level: i32,
//! }
//!
//! impl Gauge {
//!     fn bump(&mut self, by: i32) -> i32 {
//!         self.level += by;
//!         self.level
//!     }
//! }
//!
//! let registry = TypeLibraryBuilder::with_builtins()
//!     .begin_type::<Gauge>("Gauge")
//!     .member("level", |g| &g.level, |g| &mut g.level)
//!     .method("bump", Gauge::bump, &["by"])
//!     .end_type()
//!     .build()
//!     .unwrap();
//!
//! let resolver = Resolver::<Gauge>::new(registry.get_checked::<Gauge>());
//! let mut gauge = Gauge::default();
//!
//! *resolver.resolve_member_mut::<i32>(&mut gauge, "level").unwrap() = 3;
//! let mut bump = resolver.resolve_method::<i32, (i32,)>(&mut gauge, "bump").unwrap();
//! assert_eq!(bump.call((4,)), Some(7));
//! assert!(resolver.resolve_member::<i64>(&gauge, "level").is_none());
//! ```

use crate::descriptor::{Arguments, MemberDescriptor, MethodDescriptor, TypeDescriptor};
use crate::registry::TypeRegistry;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// Typed view of a [`TypeDescriptor`] for instances of `T`.
pub struct Resolver<'d, T> {
    descriptor: &'d TypeDescriptor,
    _marker: PhantomData<fn(&T)>,
}

impl<'d, T: Any> Resolver<'d, T> {
    /// Create a resolver.
    ///
    /// # Panics
    ///
    /// Panics if `descriptor` does not describe `T`.
    pub fn new(descriptor: &'d TypeDescriptor) -> Self {
        match Self::try_new(descriptor) {
            Some(resolver) => resolver,
            None => panic!(
                "descriptor `{}` does not describe `{}`",
                descriptor.name(),
                std::any::type_name::<T>()
            ),
        }
    }

    /// Create a resolver, `None` if `descriptor` does not describe `T`.
    pub fn try_new(descriptor: &'d TypeDescriptor) -> Option<Self> {
        (descriptor.rust_type_id() == TypeId::of::<T>()).then_some(Self {
            descriptor,
            _marker: PhantomData,
        })
    }

    /// Resolver for `T` as registered in `registry`.
    pub fn from_registry(registry: &'d TypeRegistry) -> Option<Self> {
        registry.get::<T>().and_then(|d| Self::try_new(d))
    }

    pub fn descriptor(&self) -> &'d TypeDescriptor {
        self.descriptor
    }

    /// Member descriptor by name, searching the parent chain.
    pub fn member(&self, name: &str) -> Option<&'d MemberDescriptor> {
        self.descriptor.get_member_by_name_recursive(name)
    }

    /// Method descriptor by name, searching the parent chain.
    pub fn method(&self, name: &str) -> Option<&'d MethodDescriptor> {
        self.descriptor.get_method_by_name_recursive(name)
    }

    /// Borrow member `name` of `instance` as an `M`.
    pub fn resolve_member<'a, M: Any>(&self, instance: &'a T, name: &str) -> Option<&'a M> {
        let member = self.member(name)?;
        let value = member.get_as::<M>(instance);
        if value.is_none() {
            log::debug!(
                "[resolver] {}.{} is `{}`, not `{}`",
                self.descriptor.name(),
                name,
                member.member_type(),
                std::any::type_name::<M>()
            );
        }
        value
    }

    /// Mutably borrow member `name` of `instance` as an `M`.
    pub fn resolve_member_mut<'a, M: Any>(&self, instance: &'a mut T, name: &str) -> Option<&'a mut M> {
        let member = self.member(name)?;
        if member.member_type_id() != TypeId::of::<M>() {
            log::debug!(
                "[resolver] {}.{} is `{}`, not `{}`",
                self.descriptor.name(),
                name,
                member.member_type(),
                std::any::type_name::<M>()
            );
            return None;
        }
        member.get_as_mut::<M>(instance)
    }

    /// Bind method `name` to `instance`.
    ///
    /// Returns `None` if the method is unknown or its registered signature
    /// is not `R(A..)`.
    pub fn resolve_method<'a, R: Any, A: Arguments>(
        &self,
        instance: &'a mut T,
        name: &str,
    ) -> Option<BoundMethod<'a, R, A>>
    where
        'd: 'a,
    {
        let method = self.method(name)?;
        if !method.matches::<R, A>() {
            log::debug!(
                "[resolver] {}.{} does not have signature {}{}",
                self.descriptor.name(),
                name,
                std::any::type_name::<R>(),
                std::any::type_name::<A>()
            );
            return None;
        }
        Some(BoundMethod {
            method,
            instance,
            _marker: PhantomData,
        })
    }

    /// New default instance through the registered constructor.
    pub fn instantiate(&self) -> Option<Box<T>> {
        self.descriptor.instantiate()?.downcast::<T>().ok()
    }

    /// Names of all reachable members, ancestors first.
    pub fn member_names(&self) -> Vec<&'d str> {
        self.descriptor
            .visible_members()
            .into_iter()
            .map(MemberDescriptor::name)
            .collect()
    }

    /// Names of all reachable methods, ancestors first, without duplicates.
    pub fn method_names(&self) -> Vec<&'d str> {
        let mut names: Vec<&'d str> = Vec::new();
        for method in self.descriptor.fetch_methods_recursive() {
            if !names.contains(&method.name()) {
                names.push(method.name());
            }
        }
        names
    }
}

impl<T> Clone for Resolver<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resolver<'_, T> {}

impl<T> fmt::Debug for Resolver<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolver").field(&self.descriptor.name()).finish()
    }
}

/// A method bound to one instance, callable with typed arguments.
pub struct BoundMethod<'a, R, A> {
    method: &'a MethodDescriptor,
    instance: &'a mut dyn Any,
    _marker: PhantomData<fn(A) -> R>,
}

impl<R: Any, A: Arguments> BoundMethod<'_, R, A> {
    pub fn descriptor(&self) -> &MethodDescriptor {
        self.method
    }

    /// Invoke the method.
    pub fn call(&mut self, args: A) -> Option<R> {
        let ret = self.method.invoke(&mut *self.instance, args.into_boxed())?;
        ret.downcast::<R>().ok().map(|boxed| *boxed)
    }
}

impl<R, A> fmt::Debug for BoundMethod<'_, R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundMethod").field(&self.method.name()).finish()
    }
}
