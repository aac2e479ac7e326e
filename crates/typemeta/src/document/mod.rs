// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stack-based reader/writer protocol over tree-shaped documents.
//!
//! A document is made of scalars, objects (named properties) and arrays
//! (ordered elements). Writers and readers are driven by matched
//! begin/end calls; every call reports success, and misuse (ending a
//! container that is not on top of the stack, a property outside an
//! object, two values in one slot, ...) is reported as failure without
//! touching the document.
//!
//! The protocol is format agnostic; [`json`] provides the JSON adapter.

pub mod json;

pub use json::{JsonDocument, JsonReader, JsonWriter};

/// Emits a document.
///
/// Scalar writes fill the pending slot: the root, the current property or
/// the current array element.
pub trait DocumentWriter {
    fn write_begin_object(&mut self) -> bool;
    fn write_end_object(&mut self) -> bool;
    fn write_begin_object_property(&mut self, name: &str) -> bool;
    fn write_end_object_property(&mut self) -> bool;

    fn write_begin_array(&mut self) -> bool;
    fn write_end_array(&mut self) -> bool;
    fn write_begin_array_element(&mut self) -> bool;
    fn write_end_array_element(&mut self) -> bool;

    fn write_i32(&mut self, value: i32) -> bool;
    fn write_i64(&mut self, value: i64) -> bool;
    fn write_u64(&mut self, value: u64) -> bool;
    fn write_f32(&mut self, value: f32) -> bool;
    fn write_f64(&mut self, value: f64) -> bool;
    fn write_str(&mut self, value: &str) -> bool;
    fn write_bool(&mut self, value: bool) -> bool;
    fn write_null(&mut self) -> bool;
}

/// Walks a document.
///
/// Every property of an object is yielded exactly once; array elements are
/// yielded in order with 0-based indices. Scalar reads return `None` when
/// the current node is missing or has another kind.
pub trait DocumentReader {
    fn read_begin_object(&mut self) -> bool;
    fn read_end_object(&mut self) -> bool;
    fn has_object_property_remaining(&self) -> bool;
    /// Enter the next property and return its name.
    fn read_begin_object_property(&mut self) -> Option<String>;
    fn read_end_object_property(&mut self) -> bool;

    fn read_begin_array(&mut self) -> bool;
    fn read_end_array(&mut self) -> bool;
    fn has_array_element_remaining(&self) -> bool;
    /// Enter the next element and return its index.
    fn read_begin_array_element(&mut self) -> Option<usize>;
    fn read_end_array_element(&mut self) -> bool;

    fn read_i32(&mut self) -> Option<i32>;
    fn read_i64(&mut self) -> Option<i64>;
    fn read_u64(&mut self) -> Option<u64>;
    fn read_f32(&mut self) -> Option<f32>;
    fn read_f64(&mut self) -> Option<f64>;
    fn read_string(&mut self) -> Option<String>;
    fn read_bool(&mut self) -> Option<bool>;
    /// Consume a `null` node.
    fn read_null(&mut self) -> bool;
    /// Check whether the current node is `null`, without consuming it.
    fn is_null(&self) -> bool;
}
