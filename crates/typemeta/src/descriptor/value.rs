// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named constants of enumerated types.

use crate::identity::TypeIdentity;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Fieldless enumeration that can be registered with named values.
///
/// Implement it with [`enum_repr!`](crate::enum_repr) for `#[repr]`-style
/// enums whose variants convert with `as i64`.
pub trait EnumRepr: Copy + PartialEq + Any + Send + Sync {
    /// Underlying 64-bit value of the constant.
    fn to_repr(self) -> i64;
}

/// Implement [`EnumRepr`] for fieldless enums through an `as i64` cast.
///
/// ```rust
/// #[derive(Debug, Clone, Copy, PartialEq, Default)]
/// enum Color {
///     #[default]
///     Red,
///     Green = 5,
/// }
/// typemeta::enum_repr!(Color);
///
/// use typemeta::EnumRepr;
/// assert_eq!(Color::Green.to_repr(), 5);
/// ```
#[macro_export]
macro_rules! enum_repr {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::EnumRepr for $ty {
                fn to_repr(self) -> i64 {
                    self as i64
                }
            }
        )+
    };
}

/// One named constant of an enumerated type.
#[derive(Clone)]
pub struct ValueDescriptor {
    owner: TypeIdentity,
    name: String,
    value: i64,
    constant: Arc<dyn Any + Send + Sync>,
}

impl ValueDescriptor {
    pub(crate) fn new<E: EnumRepr>(owner: TypeIdentity, name: impl Into<String>, constant: E) -> Self {
        Self {
            owner,
            name: name.into(),
            value: constant.to_repr(),
            constant: Arc::new(constant),
        }
    }

    /// Enclosing enumeration.
    pub fn owner(&self) -> &TypeIdentity {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The constant itself, `None` if `E` is not the enclosing type.
    pub fn constant<E: EnumRepr>(&self) -> Option<E> {
        self.constant.downcast_ref::<E>().copied()
    }
}

impl PartialEq for ValueDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name && self.value == other.value
    }
}

impl Eq for ValueDescriptor {}

impl fmt::Debug for ValueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueDescriptor({}::{} = {})", self.owner, self.name, self.value)
    }
}
