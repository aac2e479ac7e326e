// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategy for composite types described by their members.

use super::{Serializer, Strategy};
use crate::config::UnknownPropertyPolicy;
use crate::descriptor::TypeDescriptor;
use crate::document::{DocumentReader, DocumentWriter};
use std::any::Any;

/// Writes an object with one property per reachable member.
///
/// Inherited members are included; a member shadowed by a derived
/// declaration is written once, under the derived declaration. On read,
/// members absent from the document keep their current value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectStrategy;

impl Strategy for ObjectStrategy {
    fn serialize(
        &self,
        serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        value: &dyn Any,
        writer: &mut dyn DocumentWriter,
    ) -> bool {
        let mut ok = writer.write_begin_object();
        for member in descriptor.visible_members() {
            let Some(field) = member.get(value) else {
                log::debug!(
                    "[serializer] value is not a {} (member {})",
                    descriptor.name(),
                    member.name()
                );
                return false;
            };
            ok &= writer.write_begin_object_property(member.name());
            ok &= serializer.serialize_payload_dyn(member.member_type_id(), field, writer);
            ok &= writer.write_end_object_property();
        }
        ok &= writer.write_end_object();
        ok
    }

    fn deserialize(
        &self,
        serializer: &Serializer<'_>,
        descriptor: &TypeDescriptor,
        slot: &mut dyn Any,
        reader: &mut dyn DocumentReader,
    ) -> bool {
        if !reader.read_begin_object() {
            log::debug!("[serializer] expected a {} object", descriptor.name());
            return false;
        }

        let mut ok = true;
        while ok && reader.has_object_property_remaining() {
            let Some(name) = reader.read_begin_object_property() else {
                return false;
            };
            match descriptor.get_member_by_name_recursive(&name) {
                Some(member) => match member.get_mut(slot) {
                    Some(field) => {
                        ok &= serializer.deserialize_payload_dyn(
                            member.member_type_id(),
                            field,
                            reader,
                        );
                    }
                    None => ok = false,
                },
                None => match serializer.unknown_properties() {
                    UnknownPropertyPolicy::Strict => {
                        log::warn!(
                            "[serializer] {} has no member {}",
                            descriptor.name(),
                            name
                        );
                        ok = false;
                    }
                    UnknownPropertyPolicy::Skip => {
                        log::debug!(
                            "[serializer] skipping unknown property {}.{}",
                            descriptor.name(),
                            name
                        );
                    }
                },
            }
            ok &= reader.read_end_object_property();
        }
        ok &= reader.read_end_object();
        ok
    }
}
