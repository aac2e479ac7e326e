// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategy for enumerations registered with named values.

use super::{Serializer, Strategy};
use crate::descriptor::{EnumRepr, TypeDescriptor};
use crate::document::{DocumentReader, DocumentWriter};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Writes the symbolic name of the constant, as registered with
/// [`TypeBuilder::value`](crate::TypeBuilder::value).
pub struct EnumStrategy<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E: EnumRepr> EnumStrategy<E> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E: EnumRepr> Default for EnumStrategy<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EnumStrategy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumStrategy<{}>", std::any::type_name::<E>())
    }
}

impl<E: EnumRepr> Strategy for EnumStrategy<E> {
    fn serialize(
        &self,
        _serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        let Some(&constant) = value.downcast_ref::<E>() else {
            return false;
        };
        match descriptor
            .values()
            .iter()
            .find(|v| v.constant::<E>() == Some(constant))
        {
            Some(named) => writer.write_str(named.name()),
            None => {
                log::debug!(
                    "[serializer] {} value {} has no registered name",
                    descriptor.name(),
                    constant.to_repr()
                );
                false
            }
        }
    }

    fn deserialize(
        &self,
        _serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(slot) = slot.downcast_mut::<E>() else {
            return false;
        };
        let Some(name) = reader.read_string() else {
            return false;
        };
        match descriptor
            .get_value_by_name(&name)
            .and_then(|v| v.constant::<E>())
        {
            Some(constant) => {
                *slot = constant;
                true
            }
            None => {
                log::debug!("[serializer] {} has no value {}", descriptor.name(), name);
                false
            }
        }
    }
}
