// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typemeta - runtime reflection and metadata-driven serialization
//!
//! Types opt into reflection by registering their members, methods and
//! named values with a [`TypeLibraryBuilder`]. The resulting
//! [`TypeRegistry`] drives name-based access on live instances
//! ([`Resolver`]) and a strategy-dispatched [`Serializer`] over a
//! format-agnostic document protocol (JSON adapter included).
//!
//! ## Quick Start
//!
//! ```rust
//! use typemeta::{Format, ObjectStrategy, Serializer, TypeLibraryBuilder};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct TestPerson {
//!     name: String,
//!     age: i32,
//! }
//!
//! let registry = TypeLibraryBuilder::with_builtins()
//!     .begin_type::<TestPerson>("TestPerson")
//!     .member("Name", |p| &p.name, |p| &mut p.name)
//!     .member("Age", |p| &p.age, |p| &mut p.age)
//!     .end_type()
//!     .build()
//!     .unwrap();
//!
//! let mut serializer = Serializer::new(&registry);
//! serializer.learn_builtins();
//! serializer.learn_type::<TestPerson, ObjectStrategy>();
//!
//! let george = TestPerson { name: "George".into(), age: 1 };
//! assert_eq!(
//!     serializer.to_json_string(&george).unwrap(),
//!     r#"{"type":"TestPerson","value":{"Age":1,"Name":"George"}}"#
//! );
//!
//! serializer.set_format(Format::Short);
//! let back: TestPerson = serializer.from_json_str(r#"{"Age":1,"Name":"George"}"#).unwrap();
//! assert_eq!(back, george);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Console          member=value | member | method(args)         |
//! +---------------------------------------------------------------+
//! |  Resolver         typed member handles, bound method calls     |
//! |  Serializer       strategy table, Full/Short envelope          |
//! +---------------------------------------------------------------+
//! |  Descriptors      TypeDescriptor, members, methods, values     |
//! |  TypeRegistry     TypeId / hash / name -> descriptor           |
//! +---------------------------------------------------------------+
//! |  Document         DocumentWriter / DocumentReader, JSON        |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeLibraryBuilder`] | Fluent registration of types |
//! | [`TypeRegistry`] | Frozen catalog of descriptors |
//! | [`TypeDescriptor`] | Members, methods, values and parent of one type |
//! | [`Resolver`] | Name-based access on an instance |
//! | [`Serializer`] | Strategy table and document walk |
//! | [`Console`] | Line-oriented instance explorer |

/// Interactive instruction console over a reflected instance.
pub mod console;
/// Serializer configuration (format, unknown-property policy).
pub mod config;
/// Descriptor model and registration builders.
pub mod descriptor;
/// Reader/writer document protocol and its JSON adapter.
pub mod document;
/// Stable type identities.
pub mod identity;
/// Type registry.
pub mod registry;
/// Typed, name-based member and method access.
pub mod resolver;
/// Metadata-driven serialization.
pub mod serializer;

pub use config::{ConfigError, Format, SerializerConfig, UnknownPropertyPolicy};
pub use console::{Console, Response, Status};
pub use descriptor::{
    ConstructorDescriptor, EnumRepr, MemberDescriptor, MethodDescriptor, ParameterDescriptor,
    TypeBuilder, TypeDescriptor, TypeLibraryBuilder, ValueDescriptor,
};
pub use identity::TypeIdentity;
pub use registry::{RegistryError, TypeRegistry};
pub use resolver::{BoundMethod, Resolver};
pub use serializer::{
    CollectionStrategy, EnumStrategy, JsonError, MapStrategy, ObjectStrategy, OptionalStrategy,
    PrimitiveStrategy, Serializer, Strategy, StringStrategy,
};

/// typemeta version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
