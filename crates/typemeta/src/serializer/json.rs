// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON entry points over [`JsonWriter`] and [`JsonReader`].

use super::Serializer;
use crate::document::{JsonReader, JsonWriter};
use serde_json::Value;
use std::any::Any;
use thiserror::Error;

/// JSON conversion errors.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No serialization strategy for `{0}`")]
    UnknownType(String),

    #[error("Failed to serialize `{0}`")]
    Serialize(String),

    #[error("Document is not a valid `{0}`")]
    Deserialize(String),
}

impl Serializer<'_> {
    fn type_label<T: Any>(&self) -> String {
        self.registry()
            .get::<T>()
            .map_or_else(|| std::any::type_name::<T>().to_string(), |d| d.name().to_string())
    }

    /// Serialize `value` into a JSON tree.
    pub fn to_json_value<T: Any>(&self, value: &T) -> Result<Value, JsonError> {
        if !self.knows::<T>() {
            return Err(JsonError::UnknownType(self.type_label::<T>()));
        }
        let mut writer = JsonWriter::new();
        if !self.serialize(value, &mut writer) {
            return Err(JsonError::Serialize(self.type_label::<T>()));
        }
        writer
            .into_value()
            .ok_or_else(|| JsonError::Serialize(self.type_label::<T>()))
    }

    /// Serialize `value` into compact JSON text.
    pub fn to_json_string<T: Any>(&self, value: &T) -> Result<String, JsonError> {
        self.to_json_value(value).map(|v| v.to_string())
    }

    /// Deserialize a JSON tree into `slot`.
    pub fn from_json_value_into<T: Any>(&self, value: &Value, slot: &mut T) -> Result<(), JsonError> {
        if !self.knows::<T>() {
            return Err(JsonError::UnknownType(self.type_label::<T>()));
        }
        let mut reader = JsonReader::new(value);
        if self.deserialize(slot, &mut reader) {
            Ok(())
        } else {
            Err(JsonError::Deserialize(self.type_label::<T>()))
        }
    }

    /// Deserialize a JSON tree into a default `T`.
    pub fn from_json_value<T: Any + Default>(&self, value: &Value) -> Result<T, JsonError> {
        let mut slot = T::default();
        self.from_json_value_into(value, &mut slot)?;
        Ok(slot)
    }

    /// Parse JSON text and deserialize it into a default `T`.
    pub fn from_json_str<T: Any + Default>(&self, text: &str) -> Result<T, JsonError> {
        let value: Value = serde_json::from_str(text)?;
        self.from_json_value(&value)
    }
}
