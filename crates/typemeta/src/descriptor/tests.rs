// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::registry::{RegistryError, TypeRegistry};
use std::mem::offset_of;

#[derive(Debug, Default, Clone, PartialEq)]
struct Vehicle {
    id: u32,
    label: String,
    wheels: u8,
}

impl Vehicle {
    fn describe(&self) -> String {
        format!("{}#{}", self.label, self.id)
    }

    fn rename(&mut self, label: String) {
        self.label = label;
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Truck {
    vehicle: Vehicle,
    label: String,
    payload: f64,
}

impl Truck {
    fn describe(&self) -> String {
        format!("truck {}", self.label)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Tanker {
    truck: Truck,
    volume: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Fuel {
    #[default]
    Diesel = 1,
    Electric = 2,
}
crate::enum_repr!(Fuel);

fn fleet_registry() -> TypeRegistry {
    TypeLibraryBuilder::with_builtins()
        .begin_type::<Vehicle>("Vehicle")
        .member("id", |v| &v.id, |v| &mut v.id)
        .member("label", |v| &v.label, |v| &mut v.label)
        .member("wheels", |v| &v.wheels, |v| &mut v.wheels)
        .method("describe", Vehicle::describe, &[])
        .method("rename", Vehicle::rename, &["label"])
        .end_type()
        .begin_derived_type::<Truck, Vehicle>("Truck", |t| &t.vehicle, |t| &mut t.vehicle)
        .member("label", |t| &t.label, |t| &mut t.label)
        .member("payload", |t| &t.payload, |t| &mut t.payload)
        .method("describe", Truck::describe, &[])
        .end_type()
        .begin_derived_type::<Tanker, Truck>("Tanker", |t| &t.truck, |t| &mut t.truck)
        .member("volume", |t| &t.volume, |t| &mut t.volume)
        .end_type()
        .begin_type::<Fuel>("Fuel")
        .value(Fuel::Diesel, "Diesel")
        .value(Fuel::Electric, "Electric")
        .end_type()
        .build()
        .expect("fleet registry should build")
}

#[test]
fn test_builtins_registered() {
    let registry = TypeLibraryBuilder::with_builtins().build().expect("builtins");
    assert_eq!(registry.len(), 14);
    assert_eq!(registry.get::<()>().map(|d| d.name()), Some("void"));
    assert_eq!(registry.get::<f32>().map(|d| d.name()), Some("float"));
    assert_eq!(registry.get::<f64>().map(|d| d.name()), Some("double"));
    assert_eq!(registry.get::<String>().map(|d| d.name()), Some("string"));

    let int32 = registry.get::<i32>().expect("int32");
    assert!(int32.members().is_empty());
    let instance = int32.instantiate().expect("int32 is constructible");
    assert_eq!(instance.downcast_ref::<i32>(), Some(&0));
}

#[test]
fn test_member_offsets_match_layout() {
    let registry = fleet_registry();
    let vehicle = registry.get_checked::<Vehicle>();

    let offsets: Vec<usize> = vehicle.members().iter().map(|m| m.offset()).collect();
    assert_eq!(
        offsets,
        vec![
            offset_of!(Vehicle, id),
            offset_of!(Vehicle, label),
            offset_of!(Vehicle, wheels)
        ]
    );
    let mut distinct = offsets.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), offsets.len());
}

#[test]
fn test_inherited_member_offsets_are_rebased() {
    let registry = fleet_registry();
    let tanker = registry.get_checked::<Tanker>();

    let id = tanker.get_member_by_name_recursive("id").expect("id");
    assert_eq!(id.owner().name(), "Vehicle");
    assert_eq!(
        id.offset(),
        offset_of!(Tanker, truck) + offset_of!(Truck, vehicle) + offset_of!(Vehicle, id)
    );
    assert_eq!(
        tanker.parent().map(ParentLink::offset),
        Some(offset_of!(Tanker, truck))
    );
}

#[test]
fn test_recursive_lookup_reaches_ancestors() {
    let registry = fleet_registry();
    let tanker = registry.get_checked::<Tanker>();

    assert!(tanker.get_member_by_name("id").is_none());
    let wheels = tanker.get_member_by_name_recursive("wheels").expect("wheels");

    let mut value = Tanker::default();
    value.truck.vehicle.wheels = 18;
    assert_eq!(wheels.get_as::<u8>(&value), Some(&18));
    *wheels.get_as_mut::<u8>(&mut value).expect("wheels") = 22;
    assert_eq!(value.truck.vehicle.wheels, 22);

    let vehicle = registry.get_checked::<Vehicle>();
    assert!(vehicle.get_member_by_name_recursive("volume").is_none());
    assert!(vehicle.get_member_by_name_recursive("payload").is_none());
}

#[test]
fn test_derived_declarations_shadow_ancestors() {
    let registry = fleet_registry();
    let truck = registry.get_checked::<Truck>();

    let label = truck.get_member_by_name_recursive("label").expect("label");
    assert_eq!(label.owner().name(), "Truck");

    let tanker = registry.get_checked::<Tanker>();
    let label = tanker.get_member_by_name_recursive("label").expect("label");
    assert_eq!(label.owner().name(), "Truck");

    let mut value = Tanker::default();
    value.truck.label = "near".into();
    value.truck.vehicle.label = "far".into();
    assert_eq!(label.get_as::<String>(&value).map(String::as_str), Some("near"));

    let describe = tanker.get_method_by_name_recursive("describe").expect("describe");
    let ret = describe.invoke(&mut value, Vec::new()).expect("describe");
    assert_eq!(ret.downcast_ref::<String>().map(String::as_str), Some("truck near"));
}

#[test]
fn test_fetch_and_visible_members() {
    let registry = fleet_registry();
    let truck = registry.get_checked::<Truck>();

    let all: Vec<(&str, &str)> = truck
        .fetch_members_recursive()
        .into_iter()
        .map(|m| (m.owner().name(), m.name()))
        .collect();
    assert_eq!(
        all,
        vec![
            ("Vehicle", "id"),
            ("Vehicle", "label"),
            ("Vehicle", "wheels"),
            ("Truck", "label"),
            ("Truck", "payload"),
        ]
    );

    let visible: Vec<(&str, &str)> = truck
        .visible_members()
        .into_iter()
        .map(|m| (m.owner().name(), m.name()))
        .collect();
    assert_eq!(
        visible,
        vec![
            ("Vehicle", "id"),
            ("Vehicle", "wheels"),
            ("Truck", "label"),
            ("Truck", "payload"),
        ]
    );

    let methods: Vec<&str> = truck
        .fetch_methods_recursive()
        .into_iter()
        .map(|m| m.name())
        .collect();
    assert_eq!(methods, vec!["describe", "rename", "describe"]);
}

#[test]
fn test_inherited_method_invocation() {
    let registry = fleet_registry();
    let tanker = registry.get_checked::<Tanker>();
    let rename = tanker.get_method_by_name_recursive("rename").expect("rename");

    assert_eq!(rename.owner().name(), "Vehicle");
    assert_eq!(rename.parameters()[0].name(), "label");
    assert_eq!(rename.parameters()[0].param_type().name(), "string");
    assert!(rename.matches::<(), (String,)>());

    let mut value = Tanker::default();
    rename
        .invoke(&mut value, vec![Box::new("bus".to_string())])
        .expect("rename");
    assert_eq!(value.truck.vehicle.label, "bus");

    // A plain Vehicle is not a Tanker receiver.
    let mut other = Vehicle::default();
    assert!(rename
        .invoke(&mut other, vec![Box::new("x".to_string())])
        .is_none());
}

#[test]
fn test_is_derived_from() {
    let registry = fleet_registry();
    let vehicle = registry.get_checked::<Vehicle>().identity().clone();
    let truck = registry.get_checked::<Truck>().identity().clone();
    let tanker = registry.get_checked::<Tanker>();

    assert!(tanker.is_derived_from(&vehicle));
    assert!(tanker.is_derived_from(&truck));
    assert!(!tanker.is_derived_from(tanker.identity()));
    assert!(!registry.get_checked::<Vehicle>().is_derived_from(&truck));
}

#[test]
fn test_named_values() {
    let registry = fleet_registry();
    let fuel = registry.get_checked::<Fuel>();

    assert_eq!(fuel.values().len(), 2);
    let electric = fuel.get_value_by_name("Electric").expect("Electric");
    assert_eq!(electric.value(), 2);
    assert_eq!(electric.constant::<Fuel>(), Some(Fuel::Electric));
    assert_eq!(fuel.get_value_by_value(1).map(|v| v.name()), Some("Diesel"));
    assert!(fuel.get_value_by_value(3).is_none());
}

#[test]
fn test_unknown_member_type_fails_build() {
    #[derive(Default)]
    struct Address(u32);

    #[derive(Default)]
    struct Holder {
        addr: Address,
    }

    let err = TypeLibraryBuilder::with_builtins()
        .begin_type::<Holder>("Holder")
        .member("addr", |h| &h.addr, |h| &mut h.addr)
        .end_type()
        .build()
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownMemberType { ref member, .. } if member == "addr"));
}

#[test]
fn test_parameter_name_count_mismatch_fails_build() {
    let err = TypeLibraryBuilder::with_builtins()
        .begin_type::<Vehicle>("Vehicle")
        .method("rename", Vehicle::rename, &["a", "b"])
        .end_type()
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::ParameterCountMismatch {
            owner: "Vehicle".into(),
            method: "rename".into(),
            arity: 1,
            names: 2,
        }
    );
}

#[test]
fn test_unknown_parent_fails_build() {
    let err = TypeLibraryBuilder::with_builtins()
        .begin_derived_type::<Truck, Vehicle>("Truck", |t| &t.vehicle, |t| &mut t.vehicle)
        .end_type()
        .build()
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownParent { .. }));
}

#[test]
fn test_duplicate_member_fails_build() {
    let err = TypeLibraryBuilder::with_builtins()
        .begin_type::<Vehicle>("Vehicle")
        .member("id", |v| &v.id, |v| &mut v.id)
        .member("id", |v| &v.id, |v| &mut v.id)
        .end_type()
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateFeature {
            owner: "Vehicle".into(),
            kind: "member",
            name: "id".into(),
        }
    );
}

#[test]
fn test_first_error_wins() {
    let err = TypeLibraryBuilder::with_builtins()
        .add::<i32>("int32-again")
        .begin_derived_type::<Truck, Vehicle>("Truck", |t| &t.vehicle, |t| &mut t.vehicle)
        .end_type()
        .build()
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateType { .. }));
}

#[test]
fn test_opaque_type_has_no_constructor() {
    struct Handle;

    let registry = TypeLibraryBuilder::new()
        .add_opaque::<Handle>("Handle")
        .build()
        .expect("opaque");
    let handle = registry.get_checked::<Handle>();
    assert!(handle.constructor().is_none());
    assert!(handle.instantiate().is_none());
}
