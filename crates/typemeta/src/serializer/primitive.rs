// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategies for scalar builtins.

use super::{Serializer, Strategy};
use crate::descriptor::TypeDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Scalar written as a single document node.
pub trait Primitive: Any + Copy + Send + Sync {
    fn write(self, writer: &mut dyn DocumentWriter) -> bool;

    fn read(reader: &mut dyn DocumentReader) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $write:ident($wide:ty), $read:ident;)*) => {
        $(
            impl Primitive for $ty {
                fn write(self, writer: &mut dyn DocumentWriter) -> bool {
                    writer.$write(<$wide>::from(self))
                }

                fn read(reader: &mut dyn DocumentReader) -> Option<Self> {
                    reader.$read().and_then(|wide| <$ty>::try_from(wide).ok())
                }
            }
        )*
    };
}

impl_primitive! {
    i8 => write_i32(i32), read_i32;
    i16 => write_i32(i32), read_i32;
    i32 => write_i32(i32), read_i32;
    i64 => write_i64(i64), read_i64;
    u8 => write_u64(u64), read_u64;
    u16 => write_u64(u64), read_u64;
    u32 => write_u64(u64), read_u64;
    u64 => write_u64(u64), read_u64;
}

impl Primitive for f32 {
    fn write(self, writer: &mut dyn DocumentWriter) -> bool {
        writer.write_f32(self)
    }

    fn read(reader: &mut dyn DocumentReader) -> Option<Self> {
        reader.read_f32()
    }
}

impl Primitive for f64 {
    fn write(self, writer: &mut dyn DocumentWriter) -> bool {
        writer.write_f64(self)
    }

    fn read(reader: &mut dyn DocumentReader) -> Option<Self> {
        reader.read_f64()
    }
}

impl Primitive for bool {
    fn write(self, writer: &mut dyn DocumentWriter) -> bool {
        writer.write_bool(self)
    }

    fn read(reader: &mut dyn DocumentReader) -> Option<Self> {
        reader.read_bool()
    }
}

/// Written as a one-character string.
impl Primitive for char {
    fn write(self, writer: &mut dyn DocumentWriter) -> bool {
        let mut buf = [0u8; 4];
        writer.write_str(self.encode_utf8(&mut buf))
    }

    fn read(reader: &mut dyn DocumentReader) -> Option<Self> {
        let text = reader.read_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// `void`, written as `null`.
impl Primitive for () {
    fn write(self, writer: &mut dyn DocumentWriter) -> bool {
        writer.write_null()
    }

    fn read(reader: &mut dyn DocumentReader) -> Option<Self> {
        reader.read_null().then_some(())
    }
}

/// Strategy for any [`Primitive`].
pub struct PrimitiveStrategy<P> {
    _marker: PhantomData<fn() -> P>,
}

impl<P: Primitive> PrimitiveStrategy<P> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<P: Primitive> Default for PrimitiveStrategy<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for PrimitiveStrategy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveStrategy<{}>", std::any::type_name::<P>())
    }
}

impl<P: Primitive> Strategy for PrimitiveStrategy<P> {
    fn serialize(
        &self,
        _serializer: &Serializer<'_>,
        _descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        match value.downcast_ref::<P>() {
            Some(&value) => value.write(writer),
            None => false,
        }
    }

    fn deserialize(
        &self,
        _serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(slot) = slot.downcast_mut::<P>() else {
            return false;
        };
        match P::read(reader) {
            Some(value) => {
                *slot = value;
                true
            }
            None => {
                log::debug!("[serializer] node is not a valid {}", descriptor.name());
                false
            }
        }
    }
}

/// Strategy for `String`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringStrategy;

impl Strategy for StringStrategy {
    fn serialize(
        &self,
        _serializer: &Serializer<'_>,
        _descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        value
            .downcast_ref::<String>()
            .is_some_and(|value| writer.write_str(value))
    }

    fn deserialize(
        &self,
        _serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(slot) = slot.downcast_mut::<String>() else {
            return false;
        };
        match reader.read_string() {
            Some(value) => {
                *slot = value;
                true
            }
            None => {
                log::debug!("[serializer] node is not a valid {}", descriptor.name());
                false
            }
        }
    }
}
