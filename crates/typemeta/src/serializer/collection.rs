// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategies for sequences, sets and maps.
//!
//! Elements are written with [`Serializer::serialize_dyn`], so each carries
//! its own envelope in Full format. Fresh elements are created through the
//! element type's registered constructor; the target container is only
//! replaced once the whole array has been read.

use super::{Serializer, Strategy};
use crate::config::{MAP_KEY, MAP_VALUE};
use crate::descriptor::TypeDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Container written as an array of its items.
pub trait Collection: Any + Default + Send + Sync {
    type Item: Any;

    /// Items in iteration order.
    fn items(&self) -> Box<dyn Iterator<Item = &Self::Item> + '_>;

    fn insert_item(&mut self, item: Self::Item);
}

impl<T: Any + Send + Sync> Collection for Vec<T> {
    type Item = T;

    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }

    fn insert_item(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Any + Send + Sync> Collection for VecDeque<T> {
    type Item = T;

    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }

    fn insert_item(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T: Any + Ord + Send + Sync> Collection for BTreeSet<T> {
    type Item = T;

    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }

    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: Any + Eq + Hash + Send + Sync> Collection for HashSet<T> {
    type Item = T;

    fn items(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }

    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }
}

/// Associative container written as an array of `{"key","value"}` objects.
pub trait KeyValueMap: Any + Default + Send + Sync {
    type Key: Any;
    type Value: Any;

    fn entries(&self) -> Box<dyn Iterator<Item = (&Self::Key, &Self::Value)> + '_>;

    fn insert_entry(&mut self, key: Self::Key, value: Self::Value);
}

impl<K, V> KeyValueMap for BTreeMap<K, V>
where
    K: Any + Ord + Send + Sync,
    V: Any + Send + Sync,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

impl<K, V> KeyValueMap for HashMap<K, V>
where
    K: Any + Eq + Hash + Send + Sync,
    V: Any + Send + Sync,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Strategy for any [`Collection`].
pub struct CollectionStrategy<C> {
    _marker: PhantomData<fn() -> C>,
}

impl<C: Collection> CollectionStrategy<C> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C: Collection> Default for CollectionStrategy<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for CollectionStrategy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionStrategy<{}>", std::any::type_name::<C>())
    }
}

impl<C: Collection> Strategy for CollectionStrategy<C> {
    fn serialize(
        &self,
        serializer: &Serializer<'_>,
        _descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        let Some(collection) = value.downcast_ref::<C>() else {
            return false;
        };
        let item_type = TypeId::of::<C::Item>();

        let mut ok = writer.write_begin_array();
        for item in collection.items() {
            ok &= writer.write_begin_array_element();
            ok &= serializer.serialize_dyn(item_type, item, writer);
            ok &= writer.write_end_array_element();
        }
        ok &= writer.write_end_array();
        ok
    }

    fn deserialize(
        &self,
        serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(slot) = slot.downcast_mut::<C>() else {
            return false;
        };
        if !reader.read_begin_array() {
            log::debug!("[serializer] expected a {} array", descriptor.name());
            return false;
        }
        let item_type = TypeId::of::<C::Item>();

        let mut collection = C::default();
        let mut ok = true;
        while ok && reader.has_array_element_remaining() {
            if reader.read_begin_array_element().is_none() {
                return false;
            }
            match serializer.instantiate::<C::Item>() {
                Some(mut item) => {
                    ok &= serializer.deserialize_dyn(item_type, item.as_mut(), reader);
                    if ok {
                        collection.insert_item(*item);
                    }
                }
                None => ok = false,
            }
            ok &= reader.read_end_array_element();
        }
        ok &= reader.read_end_array();

        if ok {
            *slot = collection;
        }
        ok
    }
}

/// Strategy for any [`KeyValueMap`].
pub struct MapStrategy<M> {
    _marker: PhantomData<fn() -> M>,
}

impl<M: KeyValueMap> MapStrategy<M> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<M: KeyValueMap> Default for MapStrategy<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MapStrategy<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapStrategy<{}>", std::any::type_name::<M>())
    }
}

impl<M: KeyValueMap> MapStrategy<M> {
    /// Read one `{"key","value"}` entry; the key is required.
    fn read_entry(
        serializer: &Serializer<'_>,
        reader: &mut dyn DocumentReader,
    ) -> Option<(M::Key, M::Value)> {
        if !reader.read_begin_object() {
            return None;
        }
        let mut key: Option<Box<M::Key>> = None;
        let mut value = serializer.instantiate::<M::Value>()?;

        let mut ok = true;
        while ok && reader.has_object_property_remaining() {
            let name = reader.read_begin_object_property()?;
            match name.as_str() {
                MAP_KEY => match serializer.instantiate::<M::Key>() {
                    Some(mut fresh) => {
                        ok &= serializer.deserialize_dyn(
                            TypeId::of::<M::Key>(),
                            fresh.as_mut(),
                            reader,
                        );
                        key = Some(fresh);
                    }
                    None => ok = false,
                },
                MAP_VALUE => {
                    ok &= serializer.deserialize_dyn(
                        TypeId::of::<M::Value>(),
                        value.as_mut(),
                        reader,
                    );
                }
                other => {
                    log::debug!("[serializer] unexpected map entry property {}", other);
                    ok = false;
                }
            }
            ok &= reader.read_end_object_property();
        }
        ok &= reader.read_end_object();

        match key {
            Some(key) if ok => Some((*key, *value)),
            _ => None,
        }
    }
}

impl<M: KeyValueMap> Strategy for MapStrategy<M> {
    fn serialize(
        &self,
        serializer: &Serializer<'_>,
        _descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        let Some(map) = value.downcast_ref::<M>() else {
            return false;
        };
        let key_type = TypeId::of::<M::Key>();
        let value_type = TypeId::of::<M::Value>();

        let mut ok = writer.write_begin_array();
        for (key, value) in map.entries() {
            ok &= writer.write_begin_array_element();
            ok &= writer.write_begin_object();
            ok &= writer.write_begin_object_property(MAP_KEY);
            ok &= serializer.serialize_dyn(key_type, key, writer);
            ok &= writer.write_end_object_property();
            ok &= writer.write_begin_object_property(MAP_VALUE);
            ok &= serializer.serialize_dyn(value_type, value, writer);
            ok &= writer.write_end_object_property();
            ok &= writer.write_end_object();
            ok &= writer.write_end_array_element();
        }
        ok &= writer.write_end_array();
        ok
    }

    fn deserialize(
        &self,
        serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        let Some(slot) = slot.downcast_mut::<M>() else {
            return false;
        };
        if !reader.read_begin_array() {
            log::debug!("[serializer] expected a {} array", descriptor.name());
            return false;
        }

        let mut map = M::default();
        let mut ok = true;
        while ok && reader.has_array_element_remaining() {
            if reader.read_begin_array_element().is_none() {
                return false;
            }
            match Self::read_entry(serializer, reader) {
                Some((key, value)) => map.insert_entry(key, value),
                None => {
                    log::debug!("[serializer] invalid {} entry", descriptor.name());
                    ok = false;
                }
            }
            ok &= reader.read_end_array_element();
        }
        ok &= reader.read_end_array();

        if ok {
            *slot = map;
        }
        ok
    }
}
