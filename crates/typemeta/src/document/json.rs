// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON adapter for the document protocol, backed by `serde_json::Value`.

use super::{DocumentReader, DocumentWriter};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

#[derive(Debug)]
enum SlotKind {
    Root,
    Property(String),
    Element,
}

/// One open construct of the writer.
#[derive(Debug)]
enum Frame {
    /// Place expecting exactly one value.
    Slot {
        kind: SlotKind,
        value: Option<Value>,
    },
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

/// Builds a `serde_json::Value` through the [`DocumentWriter`] protocol.
///
/// ```rust
/// use typemeta::document::{DocumentWriter, JsonWriter};
///
/// let mut writer = JsonWriter::new();
/// assert!(writer.write_begin_object());
/// assert!(writer.write_begin_object_property("answer"));
/// assert!(writer.write_i32(42));
/// assert!(writer.write_end_object_property());
/// assert!(writer.write_end_object());
/// assert_eq!(writer.to_json_string().as_deref(), Some(r#"{"answer":42}"#));
/// ```
#[derive(Debug)]
pub struct JsonWriter {
    stack: Vec<Frame>,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::Slot {
                kind: SlotKind::Root,
                value: None,
            }],
        }
    }

    /// Number of open properties, elements and containers.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Check whether every opened construct has been closed.
    pub fn is_complete(&self) -> bool {
        self.stack.len() == 1
    }

    /// Root value written so far, `None` while constructs are still open.
    pub fn value(&self) -> Option<&Value> {
        static NULL: Value = Value::Null;
        match self.stack.as_slice() {
            [Frame::Slot { value, .. }] => Some(value.as_ref().unwrap_or(&NULL)),
            _ => None,
        }
    }

    /// Finished document; an empty writer yields `null`.
    pub fn into_value(mut self) -> Option<Value> {
        if !self.is_complete() {
            return None;
        }
        match self.stack.pop() {
            Some(Frame::Slot { value, .. }) => Some(value.unwrap_or(Value::Null)),
            _ => None,
        }
    }

    /// Compact JSON text of the finished document.
    pub fn to_json_string(&self) -> Option<String> {
        self.value().map(Value::to_string)
    }

    fn top(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    fn fill(&mut self, new_value: Value) -> bool {
        match self.top() {
            Some(Frame::Slot { value, .. }) if value.is_none() => {
                *value = Some(new_value);
                true
            }
            _ => {
                log::debug!("[json] value written outside an empty slot");
                false
            }
        }
    }

    fn open(&mut self, frame: Frame) -> bool {
        match self.top() {
            Some(Frame::Slot { value: None, .. }) => {
                self.stack.push(frame);
                true
            }
            _ => {
                log::debug!("[json] container opened outside an empty slot");
                false
            }
        }
    }
}

impl DocumentWriter for JsonWriter {
    fn write_begin_object(&mut self) -> bool {
        self.open(Frame::Object(Map::new()))
    }

    fn write_end_object(&mut self) -> bool {
        if !matches!(self.top(), Some(Frame::Object(_))) {
            return false;
        }
        match self.stack.pop() {
            Some(Frame::Object(map)) => self.fill(Value::Object(map)),
            _ => false,
        }
    }

    fn write_begin_object_property(&mut self, name: &str) -> bool {
        if !matches!(self.top(), Some(Frame::Object(map)) if !map.contains_key(name)) {
            return false;
        }
        self.stack.push(Frame::Slot {
            kind: SlotKind::Property(name.to_string()),
            value: None,
        });
        true
    }

    fn write_end_object_property(&mut self) -> bool {
        let has_object_below = self.stack.len() >= 2
            && matches!(self.stack[self.stack.len() - 2], Frame::Object(_));
        if !has_object_below
            || !matches!(
                self.top(),
                Some(Frame::Slot {
                    kind: SlotKind::Property(_),
                    ..
                })
            )
        {
            return false;
        }
        let Some(Frame::Slot {
            kind: SlotKind::Property(name),
            value,
        }) = self.stack.pop()
        else {
            return false;
        };
        if let (Some(Frame::Object(map)), Some(value)) = (self.top(), value) {
            map.insert(name, value);
        }
        true
    }

    fn write_begin_array(&mut self) -> bool {
        self.open(Frame::Array(Vec::new()))
    }

    fn write_end_array(&mut self) -> bool {
        if !matches!(self.top(), Some(Frame::Array(_))) {
            return false;
        }
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.fill(Value::Array(items)),
            _ => false,
        }
    }

    fn write_begin_array_element(&mut self) -> bool {
        match self.top() {
            Some(Frame::Array(_)) => {
                self.stack.push(Frame::Slot {
                    kind: SlotKind::Element,
                    value: None,
                });
                true
            }
            _ => false,
        }
    }

    fn write_end_array_element(&mut self) -> bool {
        let has_array_below = self.stack.len() >= 2
            && matches!(self.stack[self.stack.len() - 2], Frame::Array(_));
        if !has_array_below
            || !matches!(
                self.top(),
                Some(Frame::Slot {
                    kind: SlotKind::Element,
                    ..
                })
            )
        {
            return false;
        }
        let Some(Frame::Slot { value, .. }) = self.stack.pop() else {
            return false;
        };
        if let Some(Frame::Array(items)) = self.top() {
            items.push(value.unwrap_or(Value::Null));
        }
        true
    }

    fn write_i32(&mut self, value: i32) -> bool {
        self.fill(Value::from(value))
    }

    fn write_i64(&mut self, value: i64) -> bool {
        self.fill(Value::from(value))
    }

    fn write_u64(&mut self, value: u64) -> bool {
        self.fill(Value::from(value))
    }

    fn write_f32(&mut self, value: f32) -> bool {
        // Shortest decimal form, so 0.1f32 is written as 0.1.
        let widened = value.to_string().parse().unwrap_or(f64::from(value));
        self.write_f64(widened)
    }

    fn write_f64(&mut self, value: f64) -> bool {
        match Number::from_f64(value) {
            Some(number) => self.fill(Value::Number(number)),
            None => {
                log::debug!("[json] non-finite number {} cannot be written", value);
                false
            }
        }
    }

    fn write_str(&mut self, value: &str) -> bool {
        self.fill(Value::from(value))
    }

    fn write_bool(&mut self, value: bool) -> bool {
        self.fill(Value::Bool(value))
    }

    fn write_null(&mut self) -> bool {
        self.fill(Value::Null)
    }
}

/// One open construct of the reader.
#[derive(Debug)]
enum Cursor<'a> {
    /// Current node: the root, a property value or an element.
    Node(&'a Value),
    Object {
        entries: Vec<(&'a String, &'a Value)>,
        next: usize,
    },
    Array {
        items: &'a [Value],
        next: usize,
    },
}

/// Walks a borrowed `serde_json::Value` through the [`DocumentReader`]
/// protocol.
#[derive(Debug)]
pub struct JsonReader<'a> {
    stack: Vec<Cursor<'a>>,
}

impl<'a> JsonReader<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            stack: vec![Cursor::Node(root)],
        }
    }

    /// Number of open properties, elements and containers.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn node(&self) -> Option<&'a Value> {
        match self.stack.last() {
            Some(&Cursor::Node(value)) => Some(value),
            _ => None,
        }
    }

    fn below_top(&self) -> Option<&Cursor<'a>> {
        self.stack.len().checked_sub(2).map(|index| &self.stack[index])
    }
}

impl<'a> DocumentReader for JsonReader<'a> {
    fn read_begin_object(&mut self) -> bool {
        match self.node() {
            Some(Value::Object(map)) => {
                self.stack.push(Cursor::Object {
                    entries: map.iter().collect(),
                    next: 0,
                });
                true
            }
            _ => false,
        }
    }

    fn read_end_object(&mut self) -> bool {
        if matches!(self.stack.last(), Some(Cursor::Object { .. })) {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    fn has_object_property_remaining(&self) -> bool {
        matches!(self.stack.last(), Some(Cursor::Object { entries, next }) if *next < entries.len())
    }

    fn read_begin_object_property(&mut self) -> Option<String> {
        let (name, value) = match self.stack.last_mut() {
            Some(Cursor::Object { entries, next }) if *next < entries.len() => {
                let entry = entries[*next];
                *next += 1;
                entry
            }
            _ => return None,
        };
        self.stack.push(Cursor::Node(value));
        Some(name.clone())
    }

    fn read_end_object_property(&mut self) -> bool {
        if matches!(self.stack.last(), Some(Cursor::Node(_)))
            && matches!(self.below_top(), Some(Cursor::Object { .. }))
        {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    fn read_begin_array(&mut self) -> bool {
        match self.node() {
            Some(Value::Array(items)) => {
                self.stack.push(Cursor::Array { items, next: 0 });
                true
            }
            _ => false,
        }
    }

    fn read_end_array(&mut self) -> bool {
        if matches!(self.stack.last(), Some(Cursor::Array { .. })) {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    fn has_array_element_remaining(&self) -> bool {
        matches!(self.stack.last(), Some(Cursor::Array { items, next }) if *next < items.len())
    }

    fn read_begin_array_element(&mut self) -> Option<usize> {
        let (index, value) = match self.stack.last_mut() {
            Some(Cursor::Array { items, next }) if *next < items.len() => {
                let items: &'a [Value] = items;
                let index = *next;
                *next += 1;
                (index, &items[index])
            }
            _ => return None,
        };
        self.stack.push(Cursor::Node(value));
        Some(index)
    }

    fn read_end_array_element(&mut self) -> bool {
        if matches!(self.stack.last(), Some(Cursor::Node(_)))
            && matches!(self.below_top(), Some(Cursor::Array { .. }))
        {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.read_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn read_i64(&mut self) -> Option<i64> {
        self.node()?.as_i64()
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.node()?.as_u64()
    }

    fn read_f32(&mut self) -> Option<f32> {
        let wide = self.read_f64()?;
        let narrow = wide as f32;
        // Out of f32 range.
        if narrow.is_finite() || !wide.is_finite() {
            Some(narrow)
        } else {
            None
        }
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.node()?.as_f64()
    }

    fn read_string(&mut self) -> Option<String> {
        self.node()?.as_str().map(str::to_string)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.node()?.as_bool()
    }

    fn read_null(&mut self) -> bool {
        self.is_null()
    }

    fn is_null(&self) -> bool {
        self.node().is_some_and(Value::is_null)
    }
}

/// Parsed JSON document that hands out readers.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    root: Value,
}

impl JsonDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse JSON text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self::new)
    }

    pub fn reader(&self) -> JsonReader<'_> {
        JsonReader::new(&self.root)
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

impl FromStr for JsonDocument {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Value> for JsonDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}
