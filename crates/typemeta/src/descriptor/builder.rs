// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for the type library.
//!
//! Registration is append-only: types are added in dependency order (a
//! member, parameter, return or parent type must be registered before it is
//! referenced) and the first error is reported by
//! [`TypeLibraryBuilder::build`].

use crate::descriptor::member::{BaseAccess, FieldAccess};
use crate::descriptor::{
    ConstructorDescriptor, EnumRepr, IntoMethod, MemberDescriptor, MethodDescriptor,
    ParameterDescriptor, ParentLink, TypeDescriptor, TypeToken, ValueDescriptor,
};
use crate::identity::TypeIdentity;
use crate::registry::{RegistryError, TypeRegistry};
use std::any::Any;
use std::sync::Arc;

/// Builder for a [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct TypeLibraryBuilder {
    registry: TypeRegistry,
    error: Option<RegistryError>,
}

impl TypeLibraryBuilder {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library with the builtin scalar types registered.
    ///
    /// | Name | Rust type |
    /// |------|-----------|
    /// | `void` | `()` |
    /// | `bool` | `bool` |
    /// | `int8` .. `int64` | `i8` .. `i64` |
    /// | `uint8` .. `uint64` | `u8` .. `u64` |
    /// | `float` / `double` | `f32` / `f64` |
    /// | `char` | `char` |
    /// | `string` | `String` |
    pub fn with_builtins() -> Self {
        Self::new()
            .add::<()>("void")
            .add::<bool>("bool")
            .add::<i8>("int8")
            .add::<i16>("int16")
            .add::<i32>("int32")
            .add::<i64>("int64")
            .add::<u8>("uint8")
            .add::<u16>("uint16")
            .add::<u32>("uint32")
            .add::<u64>("uint64")
            .add::<f32>("float")
            .add::<f64>("double")
            .add::<char>("char")
            .add::<String>("string")
    }

    /// Register a leaf type (no members) with a default constructor.
    pub fn add<T: Any + Default>(mut self, name: impl Into<String>) -> Self {
        self.register(TypeDescriptor::leaf(
            TypeIdentity::new(name),
            TypeToken::of::<T>(),
            Some(ConstructorDescriptor::of::<T>()),
        ));
        self
    }

    /// Register a leaf type that cannot be instantiated.
    pub fn add_opaque<T: Any>(mut self, name: impl Into<String>) -> Self {
        self.register(TypeDescriptor::leaf(
            TypeIdentity::new(name),
            TypeToken::of::<T>(),
            None,
        ));
        self
    }

    /// Start describing `T`.
    pub fn begin_type<T: Any + Default>(self, name: impl Into<String>) -> TypeBuilder<T> {
        TypeBuilder::new(self, TypeIdentity::new(name))
    }

    /// Start describing `T`, which embeds the already registered base `P`.
    ///
    /// `upcast`/`upcast_mut` project a `T` onto its embedded `P`. Members and
    /// methods of `P` (and of its own ancestors) become reachable through `T`.
    pub fn begin_derived_type<T: Any + Default, P: Any>(
        self,
        name: impl Into<String>,
        upcast: fn(&T) -> &P,
        upcast_mut: fn(&mut T) -> &mut P,
    ) -> TypeBuilder<T> {
        let mut builder = TypeBuilder::new(self, TypeIdentity::new(name));
        match builder.library.registry.get::<P>() {
            Some(parent) => {
                let offset = offset_of(&builder.sample, upcast(&builder.sample));
                builder.parent = Some(ParentLink::new(
                    Arc::clone(parent),
                    Arc::new(BaseAccess::new(upcast, upcast_mut)),
                    offset,
                ));
            }
            None => {
                let error = RegistryError::UnknownParent {
                    owner: builder.identity.name().to_string(),
                    rust_type: std::any::type_name::<P>().to_string(),
                };
                builder.library.fail(error);
            }
        }
        builder
    }

    /// Types registered so far.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Freeze the library.
    ///
    /// Returns the first registration error, if any.
    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.registry),
        }
    }

    fn register(&mut self, descriptor: TypeDescriptor) {
        if let Err(error) = self.registry.register(Arc::new(descriptor)) {
            self.fail(error);
        }
    }

    fn fail(&mut self, error: RegistryError) {
        log::debug!("[registry] registration failed: {}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// Byte distance from `base` to `field`, both inside the same object.
fn offset_of<T, M>(base: &T, field: &M) -> usize {
    let base = base as *const T as usize;
    let field = field as *const M as usize;
    field.wrapping_sub(base)
}

/// Builder for one [`TypeDescriptor`].
///
/// Obtained from [`TypeLibraryBuilder::begin_type`]; [`end_type`] freezes the
/// descriptor and hands the library back.
///
/// [`end_type`]: TypeBuilder::end_type
#[derive(Debug)]
pub struct TypeBuilder<T> {
    library: TypeLibraryBuilder,
    identity: TypeIdentity,
    sample: T,
    parent: Option<ParentLink>,
    members: Vec<MemberDescriptor>,
    methods: Vec<MethodDescriptor>,
    values: Vec<ValueDescriptor>,
}

impl<T: Any + Default> TypeBuilder<T> {
    fn new(library: TypeLibraryBuilder, identity: TypeIdentity) -> Self {
        Self {
            library,
            identity,
            sample: T::default(),
            parent: None,
            members: Vec::new(),
            methods: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Register field `name` of type `M`.
    ///
    /// `M` must already be registered.
    pub fn member<M: Any>(
        mut self,
        name: impl Into<String>,
        get: fn(&T) -> &M,
        get_mut: fn(&mut T) -> &mut M,
    ) -> Self {
        let name = name.into();
        if self.members.iter().any(|m| m.name() == name) {
            self.duplicate("member", name);
            return self;
        }
        let Some(member_type) = self.library.registry.identity_of::<M>().cloned() else {
            let error = RegistryError::UnknownMemberType {
                owner: self.identity.name().to_string(),
                member: name,
                rust_type: std::any::type_name::<M>().to_string(),
            };
            self.library.fail(error);
            return self;
        };

        let offset = offset_of(&self.sample, get(&self.sample));
        self.members.push(MemberDescriptor::new(
            name,
            member_type,
            TypeToken::of::<M>(),
            self.identity.clone(),
            offset,
            Arc::new(FieldAccess::new(get, get_mut)),
        ));
        self
    }

    /// Register method `name`.
    ///
    /// `param_names` is either empty (unnamed parameters) or holds exactly
    /// one name per parameter. The return type and all parameter types must
    /// already be registered.
    pub fn method<F, Marker>(mut self, name: impl Into<String>, method: F, param_names: &[&str]) -> Self
    where
        F: IntoMethod<T, Marker>,
    {
        let name = name.into();
        if self.methods.iter().any(|m| m.name() == name) {
            self.duplicate("method", name);
            return self;
        }

        let signature = F::signature();
        if !param_names.is_empty() && param_names.len() != signature.arity() {
            let error = RegistryError::ParameterCountMismatch {
                owner: self.identity.name().to_string(),
                method: name,
                arity: signature.arity(),
                names: param_names.len(),
            };
            self.library.fail(error);
            return self;
        }

        let Some(return_type) = self.lookup_method_type(&name, signature.return_type()) else {
            return self;
        };
        let mut parameters = Vec::with_capacity(signature.arity());
        for (index, token) in signature.params().iter().enumerate() {
            let Some(param_type) = self.lookup_method_type(&name, *token) else {
                return self;
            };
            let param_name = param_names.get(index).copied().unwrap_or_default();
            parameters.push(ParameterDescriptor::new(param_name, param_type, *token));
        }

        self.methods.push(MethodDescriptor::new(
            name,
            self.identity.clone(),
            return_type,
            parameters,
            signature,
            method.into_thunk(),
        ));
        self
    }

    /// Register `constant` as the named value `name`.
    pub fn value(mut self, constant: T, name: impl Into<String>) -> Self
    where
        T: EnumRepr,
    {
        let name = name.into();
        if self.values.iter().any(|v| v.name() == name) {
            self.duplicate("value", name);
            return self;
        }
        self.values
            .push(ValueDescriptor::new(self.identity.clone(), name, constant));
        self
    }

    /// Freeze the descriptor and register it.
    pub fn end_type(self) -> TypeLibraryBuilder {
        let Self {
            mut library,
            identity,
            parent,
            members,
            methods,
            values,
            ..
        } = self;

        library.register(TypeDescriptor::composite(
            identity,
            TypeToken::of::<T>(),
            Some(ConstructorDescriptor::of::<T>()),
            members,
            methods,
            values,
            parent,
        ));
        library
    }

    fn lookup_method_type(&mut self, method: &str, token: TypeToken) -> Option<TypeIdentity> {
        if let Some(descriptor) = self.library.registry.get_by_type_id(token.id()) {
            return Some(descriptor.identity().clone());
        }
        let error = RegistryError::UnknownMethodType {
            owner: self.identity.name().to_string(),
            method: method.to_string(),
            rust_type: token.rust_name().to_string(),
        };
        self.library.fail(error);
        None
    }

    fn duplicate(&mut self, kind: &'static str, name: String) {
        let error = RegistryError::DuplicateFeature {
            owner: self.identity.name().to_string(),
            kind,
            name,
        };
        self.library.fail(error);
    }
}
