// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategy for `Option<T>`.

use super::{Serializer, Strategy};
use crate::descriptor::TypeDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// `None` writes nothing, so an optional member is omitted from its object.
/// `Some` writes the bare payload of the inner value.
///
/// On read, `null` yields `None`; an absent property leaves the slot as is.
pub struct OptionalStrategy<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> OptionalStrategy<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Any> Default for OptionalStrategy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OptionalStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionalStrategy<{}>", std::any::type_name::<T>())
    }
}

impl<T: Any> Strategy for OptionalStrategy<T> {
    fn serialize(
        &self,
        serializer: &Serializer<'_>,
        _descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        match value.downcast_ref::<Option<T>>() {
            Some(Some(inner)) => serializer.serialize_payload_dyn(TypeId::of::<T>(), inner, writer),
            Some(None) => true,
            None => false,
        }
    }

    fn deserialize(
        &self,
        serializer: &Serializer<'_>,
        _descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(slot) = slot.downcast_mut::<Option<T>>() else {
            return false;
        };
        if reader.is_null() {
            *slot = None;
            return reader.read_null();
        }

        let Some(mut inner) = serializer.instantiate::<T>() else {
            return false;
        };
        if !serializer.deserialize_payload_dyn(TypeId::of::<T>(), inner.as_mut(), reader) {
            return false;
        }
        *slot = Some(*inner);
        true
    }
}
