// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metadata-driven serialization.
//!
//! The [`Serializer`] binds registered types to [`Strategy`] objects and
//! walks values through the [`DocumentWriter`]/[`DocumentReader`] protocol.
//! Strategies recurse back into the serializer for nested values.
//!
//! # Wire format
//!
//! | Value | Full | Short |
//! |-------|------|-------|
//! | `42i32` | `{"type":"int32","value":42}` | `42` |
//! | object | `{"type":"T","value":{"member":payload,..}}` | `{"member":payload,..}` |
//! | sequence | `{"type":"T","value":[element,..]}` | `[element,..]` |
//! | map | `{"type":"T","value":[{"key":k,"value":v},..]}` | `[{"key":k,"value":v},..]` |
//!
//! Object members are written as bare payloads because the descriptor
//! declares their type. Sequence elements, map keys and map values go
//! through [`Serializer::serialize_dyn`] and carry the envelope in Full
//! format.
//!
//! Results are AND-accumulated: a failing sub-operation fails the whole
//! call, and the writer keeps whatever was emitted before the failure.

mod collection;
mod enumeration;
mod json;
mod object;
mod optional;
mod primitive;

pub use collection::{Collection, CollectionStrategy, KeyValueMap, MapStrategy};
pub use enumeration::EnumStrategy;
pub use json::JsonError;
pub use object::ObjectStrategy;
pub use optional::OptionalStrategy;
pub use primitive::{Primitive, PrimitiveStrategy, StringStrategy};

use crate::config::{Format, SerializerConfig, UnknownPropertyPolicy, TYPE_KEY, VALUE_KEY};
use crate::descriptor::TypeDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use crate::registry::TypeRegistry;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Serialize/deserialize pair specialized for one type.
///
/// `value` and `slot` are instances of the type described by `descriptor`;
/// implementations downcast them and fail on a mismatch.
pub trait Strategy: Send + Sync {
    fn serialize(
        &self,
        serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool;

    fn deserialize(
        &self,
        serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool;
}

#[derive(Clone)]
struct Binding {
    descriptor: Arc<TypeDescriptor>,
    strategy: Arc<dyn Strategy>,
}

/// Strategy table plus format settings over a [`TypeRegistry`].
#[derive(Clone)]
pub struct Serializer<'r> {
    registry: &'r TypeRegistry,
    bindings: HashMap<TypeId, Binding>,
    config: SerializerConfig,
}

impl<'r> Serializer<'r> {
    /// Serializer with the default configuration and no learned types.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, SerializerConfig::default())
    }

    pub fn with_config(registry: &'r TypeRegistry, config: SerializerConfig) -> Self {
        Self {
            registry,
            bindings: HashMap::new(),
            config,
        }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn config(&self) -> SerializerConfig {
        self.config
    }

    pub fn format(&self) -> Format {
        self.config.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.config.format = format;
    }

    pub fn unknown_properties(&self) -> UnknownPropertyPolicy {
        self.config.unknown_properties
    }

    pub fn set_unknown_properties(&mut self, policy: UnknownPropertyPolicy) {
        self.config.unknown_properties = policy;
    }

    /// Copy of this serializer using `format`.
    pub fn reformatted(&self, format: Format) -> Self {
        let mut copy = self.clone();
        copy.set_format(format);
        copy
    }

    /// Bind `T` to a default-constructed `S`.
    ///
    /// Returns `false` if `T` is not registered.
    pub fn learn_type<T: Any, S: Strategy + Default + 'static>(&mut self) -> bool {
        self.learn_type_with::<T>(S::default())
    }

    /// Bind `T` to `strategy`, replacing any previous binding.
    pub fn learn_type_with<T: Any>(&mut self, strategy: impl Strategy + 'static) -> bool {
        self.learn_type_id(TypeId::of::<T>(), Arc::new(strategy))
    }

    fn learn_type_id(&mut self, type_id: TypeId, strategy: Arc<dyn Strategy>) -> bool {
        let Some(descriptor) = self.registry.get_by_type_id(type_id) else {
            log::warn!("[serializer] cannot learn an unregistered type");
            return false;
        };
        log::debug!("[serializer] learned {}", descriptor.name());
        self.bindings.insert(
            type_id,
            Binding {
                descriptor: Arc::clone(descriptor),
                strategy,
            },
        );
        true
    }

    /// Bind every builtin scalar type present in the registry.
    ///
    /// Returns the number of types learned.
    pub fn learn_builtins(&mut self) -> usize {
        let builtins: [(TypeId, Arc<dyn Strategy>); 14] = [
            (TypeId::of::<()>(), Arc::new(PrimitiveStrategy::<()>::new())),
            (TypeId::of::<bool>(), Arc::new(PrimitiveStrategy::<bool>::new())),
            (TypeId::of::<i8>(), Arc::new(PrimitiveStrategy::<i8>::new())),
            (TypeId::of::<i16>(), Arc::new(PrimitiveStrategy::<i16>::new())),
            (TypeId::of::<i32>(), Arc::new(PrimitiveStrategy::<i32>::new())),
            (TypeId::of::<i64>(), Arc::new(PrimitiveStrategy::<i64>::new())),
            (TypeId::of::<u8>(), Arc::new(PrimitiveStrategy::<u8>::new())),
            (TypeId::of::<u16>(), Arc::new(PrimitiveStrategy::<u16>::new())),
            (TypeId::of::<u32>(), Arc::new(PrimitiveStrategy::<u32>::new())),
            (TypeId::of::<u64>(), Arc::new(PrimitiveStrategy::<u64>::new())),
            (TypeId::of::<f32>(), Arc::new(PrimitiveStrategy::<f32>::new())),
            (TypeId::of::<f64>(), Arc::new(PrimitiveStrategy::<f64>::new())),
            (TypeId::of::<char>(), Arc::new(PrimitiveStrategy::<char>::new())),
            (TypeId::of::<String>(), Arc::new(StringStrategy)),
        ];

        let mut learned = 0;
        for (type_id, strategy) in builtins {
            if self.registry.get_by_type_id(type_id).is_some() && self.learn_type_id(type_id, strategy) {
                learned += 1;
            }
        }
        learned
    }

    /// Check whether `T` has a strategy.
    pub fn knows<T: Any>(&self) -> bool {
        self.knows_type_id(TypeId::of::<T>())
    }

    pub fn knows_type_id(&self, type_id: TypeId) -> bool {
        self.bindings.contains_key(&type_id)
    }

    /// Fresh instance of `T` through its registered constructor.
    pub fn instantiate<T: Any>(&self) -> Option<Box<T>> {
        self.instantiate_dyn(TypeId::of::<T>())?.downcast::<T>().ok()
    }

    /// Fresh instance of type `type_id` through its registered constructor.
    pub fn instantiate_dyn(&self, type_id: TypeId) -> Option<Box<dyn Any>> {
        let descriptor = self.registry.get_by_type_id(type_id)?;
        let instance = descriptor.instantiate();
        if instance.is_none() {
            log::debug!("[serializer] {} has no constructor", descriptor.name());
        }
        instance
    }

    fn binding(&self, type_id: TypeId) -> Option<&Binding> {
        let binding = self.bindings.get(&type_id);
        if binding.is_none() {
            let name = self
                .registry
                .get_by_type_id(type_id)
                .map_or("<unregistered>", |d| d.name());
            log::debug!("[serializer] no strategy for type {}", name);
        }
        binding
    }

    /// Serialize `value` in the configured format.
    pub fn serialize<T: Any>(&self, value: &T, writer: &mut dyn DocumentWriter) -> bool {
        self.serialize_dyn(TypeId::of::<T>(), value, writer)
    }

    /// Serialize an erased `value` of type `type_id` in the configured format.
    pub fn serialize_dyn(
        &self,
        type_id: TypeId,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        let Some(binding) = self.binding(type_id) else {
            return false;
        };
        let strategy = &binding.strategy;
        let descriptor = &binding.descriptor;

        match self.config.format {
            Format::Short => strategy.serialize(self, descriptor, value, writer),
            Format::Full => {
                let mut ok = writer.write_begin_object();
                ok &= writer.write_begin_object_property(TYPE_KEY);
                ok &= writer.write_str(descriptor.name());
                ok &= writer.write_end_object_property();
                ok &= writer.write_begin_object_property(VALUE_KEY);
                ok &= strategy.serialize(self, descriptor, value, writer);
                ok &= writer.write_end_object_property();
                ok &= writer.write_end_object();
                ok
            }
        }
    }

    /// Serialize the bare payload of `value`, whatever the format.
    pub fn serialize_payload_dyn(
        &self,
        type_id: TypeId,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        match self.binding(type_id) {
            Some(binding) => binding
                .strategy
                .serialize(self, &binding.descriptor, value, writer),
            None => false,
        }
    }

    /// Deserialize into `slot` in the configured format.
    pub fn deserialize<T: Any>(&self, slot: &mut T, reader: &mut dyn DocumentReader) -> bool {
        self.deserialize_dyn(TypeId::of::<T>(), slot, reader)
    }

    /// Deserialize into an erased `slot` of type `type_id`.
    ///
    /// In Full format the envelope must name the expected type. An envelope
    /// without `value` leaves the slot untouched.
    pub fn deserialize_dyn(
        &self,
        type_id: TypeId,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(binding) = self.binding(type_id) else {
            return false;
        };
        let strategy = &binding.strategy;
        let descriptor = &binding.descriptor;

        if self.config.format == Format::Short {
            return strategy.deserialize(self, descriptor, slot, reader);
        }

        if !reader.read_begin_object() {
            log::debug!("[serializer] expected a {} envelope", descriptor.name());
            return false;
        }
        let mut ok = true;
        let mut type_matched = false;
        while ok && reader.has_object_property_remaining() {
            let Some(name) = reader.read_begin_object_property() else {
                return false;
            };
            match name.as_str() {
                TYPE_KEY => match reader.read_string() {
                    Some(found) if found == descriptor.name() => type_matched = true,
                    found => {
                        log::debug!(
                            "[serializer] envelope names {:?}, expected {}",
                            found,
                            descriptor.name()
                        );
                        ok = false;
                    }
                },
                VALUE_KEY => ok &= strategy.deserialize(self, descriptor, slot, reader),
                other => {
                    log::debug!("[serializer] unexpected envelope property {}", other);
                    ok = false;
                }
            }
            ok &= reader.read_end_object_property();
        }
        ok &= reader.read_end_object();
        if ok && !type_matched {
            log::debug!("[serializer] {} envelope without type", descriptor.name());
        }
        ok && type_matched
    }

    /// Deserialize a bare payload into `slot`, whatever the format.
    pub fn deserialize_payload_dyn(
        &self,
        type_id: TypeId,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        match self.binding(type_id) {
            Some(binding) => binding
                .strategy
                .deserialize(self, &binding.descriptor, slot, reader),
            None => false,
        }
    }
}

impl fmt::Debug for Serializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut learned: Vec<&str> = self
            .bindings
            .values()
            .map(|b| b.descriptor.name())
            .collect();
        learned.sort_unstable();
        f.debug_struct("Serializer")
            .field("config", &self.config)
            .field("learned", &learned)
            .finish()
    }
}
