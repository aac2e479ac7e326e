// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Member descriptors and type-erased field accessors.

use crate::descriptor::TypeToken;
use crate::identity::TypeIdentity;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased projection from an owning object to one of its fields.
///
/// Implementations downcast the object to the concrete owner type and return
/// `None` when the object is of another type.
pub trait MemberAccess: Send + Sync {
    /// Borrow the field.
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any>;

    /// Borrow the field mutably.
    fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any>;

    /// Replace the field with `value`; `false` if the object or the value
    /// has the wrong type.
    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> bool;
}

/// Type-erased projection from a derived object to its embedded base.
pub trait Upcast: Send + Sync {
    fn upcast<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any>;

    fn upcast_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

/// Getter/setter pair for field `M` of owner `T`.
pub(crate) struct FieldAccess<T, M> {
    get: fn(&T) -> &M,
    get_mut: fn(&mut T) -> &mut M,
}

impl<T, M> FieldAccess<T, M> {
    pub(crate) fn new(get: fn(&T) -> &M, get_mut: fn(&mut T) -> &mut M) -> Self {
        Self { get, get_mut }
    }
}

impl<T: Any, M: Any> MemberAccess for FieldAccess<T, M> {
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        let owner = object.downcast_ref::<T>()?;
        let field: &dyn Any = (self.get)(owner);
        Some(field)
    }

    fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let owner = object.downcast_mut::<T>()?;
        let field: &mut dyn Any = (self.get_mut)(owner);
        Some(field)
    }

    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> bool {
        let Some(owner) = object.downcast_mut::<T>() else {
            return false;
        };
        match value.downcast::<M>() {
            Ok(value) => {
                *(self.get_mut)(owner) = *value;
                true
            }
            Err(_) => false,
        }
    }
}

/// Projection from derived `D` to embedded base `B`.
pub(crate) struct BaseAccess<D, B> {
    up: fn(&D) -> &B,
    up_mut: fn(&mut D) -> &mut B,
}

impl<D, B> BaseAccess<D, B> {
    pub(crate) fn new(up: fn(&D) -> &B, up_mut: fn(&mut D) -> &mut B) -> Self {
        Self { up, up_mut }
    }
}

impl<D: Any, B: Any> Upcast for BaseAccess<D, B> {
    fn upcast<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        let derived = object.downcast_ref::<D>()?;
        let base: &dyn Any = (self.up)(derived);
        Some(base)
    }

    fn upcast_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let derived = object.downcast_mut::<D>()?;
        let base: &mut dyn Any = (self.up_mut)(derived);
        Some(base)
    }
}

/// Accessor of an inherited member: upcast first, then the base accessor.
struct RebasedAccess {
    upcast: Arc<dyn Upcast>,
    inner: Arc<dyn MemberAccess>,
}

impl MemberAccess for RebasedAccess {
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.inner.get(self.upcast.upcast(object)?)
    }

    fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.inner.get_mut(self.upcast.upcast_mut(object)?)
    }

    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> bool {
        match self.upcast.upcast_mut(object) {
            Some(base) => self.inner.set(base, value),
            None => false,
        }
    }
}

/// Describes one registered field of a type.
///
/// `offset` is the byte offset of the field inside the owner, measured on a
/// default-constructed sample at registration time. It is layout metadata
/// only; all access goes through the registered accessor.
#[derive(Clone)]
pub struct MemberDescriptor {
    name: String,
    member_type: TypeIdentity,
    member_token: TypeToken,
    owner: TypeIdentity,
    offset: usize,
    access: Arc<dyn MemberAccess>,
}

impl MemberDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        member_type: TypeIdentity,
        member_token: TypeToken,
        owner: TypeIdentity,
        offset: usize,
        access: Arc<dyn MemberAccess>,
    ) -> Self {
        Self {
            name: name.into(),
            member_type,
            member_token,
            owner,
            offset,
            access,
        }
    }

    /// Member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type of the member.
    pub fn member_type(&self) -> &TypeIdentity {
        &self.member_type
    }

    /// Runtime token of the declared type.
    pub fn member_type_id(&self) -> TypeId {
        self.member_token.id()
    }

    /// Type that declared the member (differs from the resolving type for
    /// inherited members).
    pub fn owner(&self) -> &TypeIdentity {
        &self.owner
    }

    /// Byte offset of the member inside the resolving type.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Borrow the member of `object`, `None` if `object` is not an owner.
    pub fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.access.get(object)
    }

    /// Mutably borrow the member of `object`.
    pub fn get_mut<'a>(&self, object: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.access.get_mut(object)
    }

    /// Move `value` into the member of `object`.
    ///
    /// Returns `false`, dropping `value`, when `object` is not an owner or
    /// `value` is not of the declared type.
    pub fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> bool {
        self.access.set(object, value)
    }

    /// Typed borrow; `None` when `M` is not the declared type.
    pub fn get_as<'a, M: Any>(&self, object: &'a dyn Any) -> Option<&'a M> {
        if self.member_type_id() != TypeId::of::<M>() {
            return None;
        }
        self.get(object)?.downcast_ref::<M>()
    }

    /// Typed mutable borrow; `None` when `M` is not the declared type.
    pub fn get_as_mut<'a, M: Any>(&self, object: &'a mut dyn Any) -> Option<&'a mut M> {
        if self.member_type_id() != TypeId::of::<M>() {
            return None;
        }
        self.get_mut(object)?.downcast_mut::<M>()
    }

    /// Same member seen through a derived type that embeds the owner at
    /// `base_offset`.
    pub(crate) fn rebased(&self, upcast: Arc<dyn Upcast>, base_offset: usize) -> Self {
        Self {
            name: self.name.clone(),
            member_type: self.member_type.clone(),
            member_token: self.member_token,
            owner: self.owner.clone(),
            offset: base_offset + self.offset,
            access: Arc::new(RebasedAccess {
                upcast,
                inner: Arc::clone(&self.access),
            }),
        }
    }
}

impl PartialEq for MemberDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.member_type == other.member_type
            && self.name == other.name
            && self.offset == other.offset
    }
}

impl Eq for MemberDescriptor {}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("member_type", &self.member_type.name())
            .field("owner", &self.owner.name())
            .field("offset", &self.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Default)]
    struct Labeled {
        label: String,
        point: Point,
    }

    fn x_member() -> MemberDescriptor {
        MemberDescriptor::new(
            "x",
            TypeIdentity::new("int32"),
            TypeToken::of::<i32>(),
            TypeIdentity::new("Point"),
            0,
            Arc::new(FieldAccess::<Point, i32>::new(|p| &p.x, |p| &mut p.x)),
        )
    }

    #[test]
    fn test_get_and_set_through_accessor() {
        let member = x_member();
        let mut point = Point { x: 3, y: 4 };

        assert_eq!(member.get_as::<i32>(&point), Some(&3));
        *member.get_as_mut::<i32>(&mut point).expect("x") = 7;
        assert_eq!(point.x, 7);
        assert_eq!(point.y, 4);
    }

    #[test]
    fn test_wrong_owner_or_type_is_absent() {
        let member = x_member();
        let point = Point::default();
        assert!(member.get_as::<i64>(&point).is_none());
        assert!(member.get(&"not a point".to_string()).is_none());
    }

    #[test]
    fn test_rebased_member_reads_embedded_base() {
        let member = x_member();
        let upcast: Arc<dyn Upcast> =
            Arc::new(BaseAccess::<Labeled, Point>::new(|l| &l.point, |l| &mut l.point));
        let rebased = member.rebased(upcast, 24);

        let mut labeled = Labeled {
            label: "origin".into(),
            point: Point { x: 1, y: 2 },
        };
        assert_eq!(rebased.get_as::<i32>(&labeled), Some(&1));
        *rebased.get_as_mut::<i32>(&mut labeled).expect("x") = 10;
        assert_eq!(labeled.point.x, 10);
        assert_eq!(labeled.label, "origin");
        assert_eq!(rebased.offset(), 24);
        assert_eq!(rebased.owner().name(), "Point");
    }

    #[test]
    fn test_set_moves_boxed_value() {
        let member = x_member();
        let mut point = Point { x: 3, y: 4 };

        assert!(member.set(&mut point, Box::new(11i32)));
        assert_eq!(point.x, 11);
        assert!(!member.set(&mut point, Box::new(12i64)));
        assert!(!member.set(&mut 0u8, Box::new(13i32)));
        assert_eq!(point.x, 11);

        let upcast: Arc<dyn Upcast> =
            Arc::new(BaseAccess::<Labeled, Point>::new(|l| &l.point, |l| &mut l.point));
        let rebased = member.rebased(upcast, 24);
        let mut labeled = Labeled::default();
        assert!(rebased.set(&mut labeled, Box::new(-1i32)));
        assert_eq!(labeled.point.x, -1);
        assert!(!rebased.set(&mut point, Box::new(0i32)));
    }

    #[test]
    fn test_equality_ignores_owner() {
        let a = x_member();
        let mut b = x_member();
        b.owner = TypeIdentity::new("Other");
        assert_eq!(a, b);
        b.offset = 4;
        assert_ne!(a, b);
    }
}
