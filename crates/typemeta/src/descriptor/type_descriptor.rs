// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use crate::descriptor::member::Upcast;
use crate::descriptor::{
    ConstructorDescriptor, MemberDescriptor, MethodDescriptor, TypeToken, ValueDescriptor,
};
use crate::identity::TypeIdentity;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Link from a derived type to the base it embeds.
#[derive(Clone)]
pub struct ParentLink {
    descriptor: Arc<TypeDescriptor>,
    upcast: Arc<dyn Upcast>,
    offset: usize,
}

impl ParentLink {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor>, upcast: Arc<dyn Upcast>, offset: usize) -> Self {
        Self {
            descriptor,
            upcast,
            offset,
        }
    }

    /// Descriptor of the base type.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Byte offset of the base inside the derived type.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Project a derived instance onto its base.
    pub fn upcast<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.upcast.upcast(object)
    }

    pub fn upcast_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.upcast.upcast_mut(object)
    }

    pub(crate) fn projection(&self) -> Arc<dyn Upcast> {
        Arc::clone(&self.upcast)
    }
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentLink")
            .field("parent", &self.descriptor.name())
            .field("offset", &self.offset)
            .finish()
    }
}

/// A complete type descriptor.
///
/// Built once by [`TypeBuilder`](crate::TypeBuilder) and frozen afterwards.
/// Inherited members and methods are stored already rebased onto this type,
/// so every descriptor returned by the recursive lookups accepts an instance
/// of *this* type.
///
/// # Lookup precedence
///
/// Recursive lookups are derived-first: the type's own declarations shadow
/// those of its parent, which shadow those of the grandparent, and so on.
#[derive(Clone)]
pub struct TypeDescriptor {
    identity: TypeIdentity,
    token: TypeToken,
    constructor: Option<ConstructorDescriptor>,
    members: Vec<MemberDescriptor>,
    methods: Vec<MethodDescriptor>,
    values: Vec<ValueDescriptor>,
    parent: Option<ParentLink>,
    /// Ancestor members, root ancestor first, rebased onto this type.
    inherited_members: Vec<MemberDescriptor>,
    inherited_methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Descriptor of a type without members, methods or values.
    pub fn leaf(
        identity: TypeIdentity,
        token: TypeToken,
        constructor: Option<ConstructorDescriptor>,
    ) -> Self {
        Self {
            identity,
            token,
            constructor,
            members: Vec::new(),
            methods: Vec::new(),
            values: Vec::new(),
            parent: None,
            inherited_members: Vec::new(),
            inherited_methods: Vec::new(),
        }
    }

    pub(crate) fn composite(
        identity: TypeIdentity,
        token: TypeToken,
        constructor: Option<ConstructorDescriptor>,
        members: Vec<MemberDescriptor>,
        methods: Vec<MethodDescriptor>,
        values: Vec<ValueDescriptor>,
        parent: Option<ParentLink>,
    ) -> Self {
        let (inherited_members, inherited_methods) = match &parent {
            Some(link) => {
                let base = link.descriptor();
                let members = base
                    .fetch_members_recursive()
                    .into_iter()
                    .map(|m| m.rebased(link.projection(), link.offset()))
                    .collect();
                let methods = base
                    .fetch_methods_recursive()
                    .into_iter()
                    .map(|m| m.rebased(link.projection()))
                    .collect();
                (members, methods)
            }
            None => (Vec::new(), Vec::new()),
        };

        Self {
            identity,
            token,
            constructor,
            members,
            methods,
            values,
            parent,
            inherited_members,
            inherited_methods,
        }
    }

    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// Type name.
    pub fn name(&self) -> &str {
        self.identity.name()
    }

    /// Identity hash.
    pub fn hash(&self) -> u64 {
        self.identity.hash()
    }

    /// Runtime type token of the described Rust type.
    pub fn rust_type_id(&self) -> TypeId {
        self.token.id()
    }

    /// Rust type name (`std::any::type_name`), for diagnostics.
    pub fn rust_name(&self) -> &'static str {
        self.token.rust_name()
    }

    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub fn constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructor.as_ref()
    }

    /// Create a default instance through the constructor.
    pub fn instantiate(&self) -> Option<Box<dyn Any>> {
        self.constructor.as_ref().map(ConstructorDescriptor::construct)
    }

    /// Own members, in registration order.
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Own methods, in registration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Named values, in registration order.
    pub fn values(&self) -> &[ValueDescriptor] {
        &self.values
    }

    /// Own member by name (no inheritance).
    pub fn get_member_by_name(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Own method by name (no inheritance).
    pub fn get_method_by_name(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Member by name, searching this type then its ancestors.
    pub fn get_member_by_name_recursive(&self, name: &str) -> Option<&MemberDescriptor> {
        self.get_member_by_name(name).or_else(|| {
            // Nearest ancestor wins: ancestors are stored root first.
            self.inherited_members.iter().rev().find(|m| m.name() == name)
        })
    }

    /// Method by name, searching this type then its ancestors.
    pub fn get_method_by_name_recursive(&self, name: &str) -> Option<&MethodDescriptor> {
        self.get_method_by_name(name)
            .or_else(|| self.inherited_methods.iter().rev().find(|m| m.name() == name))
    }

    /// All members, root ancestor first, then this type's own.
    ///
    /// Shadowed ancestor members are included.
    pub fn fetch_members_recursive(&self) -> Vec<&MemberDescriptor> {
        self.inherited_members.iter().chain(&self.members).collect()
    }

    /// All methods, root ancestor first, then this type's own.
    pub fn fetch_methods_recursive(&self) -> Vec<&MethodDescriptor> {
        self.inherited_methods.iter().chain(&self.methods).collect()
    }

    /// Members reachable by name: like [`fetch_members_recursive`] without
    /// the shadowed ones.
    ///
    /// [`fetch_members_recursive`]: Self::fetch_members_recursive
    pub fn visible_members(&self) -> Vec<&MemberDescriptor> {
        self.fetch_members_recursive()
            .into_iter()
            .filter(|m| {
                self.get_member_by_name_recursive(m.name())
                    .is_some_and(|visible| std::ptr::eq(visible, *m))
            })
            .collect()
    }

    pub fn get_value_by_name(&self, name: &str) -> Option<&ValueDescriptor> {
        self.values.iter().find(|v| v.name() == name)
    }

    pub fn get_value_by_value(&self, value: i64) -> Option<&ValueDescriptor> {
        self.values.iter().find(|v| v.value() == value)
    }

    /// Check whether `ancestor` appears in the parent chain.
    pub fn is_derived_from(&self, ancestor: &TypeIdentity) -> bool {
        let mut current = self.parent.as_ref();
        while let Some(link) = current {
            if link.descriptor().identity() == ancestor {
                return true;
            }
            current = link.descriptor().parent();
        }
        false
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.token == other.token
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("identity", &self.identity)
            .field("members", &self.members)
            .field("methods", &self.methods)
            .field("values", &self.values)
            .field("parent", &self.parent)
            .finish()
    }
}
