// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Line-oriented console over one reflected instance.
//!
//! The console owns an instance of a registered type and executes textual
//! instructions against it (see [`instruction`] for the grammar). Values are
//! exchanged as JSON: assignments and call arguments are read in Short
//! format, results are printed in the console's current format.
//!
//! # Example
//!
//! ```rust
//! use typemeta::{Console, Format, ObjectStrategy, Serializer, Status, TypeLibraryBuilder};
//!
//! #[derive(Default)]
//! struct Lamp {
//!     watts: u32,
//! }
//!
//! impl Lamp {
//!     fn dim(&mut self, by: u32) -> u32 {
//!         self.watts = self.watts.saturating_sub(by);
//!         self.watts
//!     }
//! }
//!
//! let registry = TypeLibraryBuilder::with_builtins()
//!     .begin_type::<Lamp>("Lamp")
//!     .member("watts", |l| &l.watts, |l| &mut l.watts)
//!     .method("dim", Lamp::dim, &["by"])
//!     .end_type()
//!     .build()
//!     .unwrap();
//! let mut serializer = Serializer::new(&registry);
//! serializer.learn_builtins();
//! serializer.learn_type::<Lamp, ObjectStrategy>();
//! serializer.set_format(Format::Short);
//!
//! let mut console = Console::for_type::<Lamp>(&serializer).unwrap();
//! assert_eq!(console.execute("watts=60").status, Status::Ok);
//! assert_eq!(console.execute("dim(15)").output.as_deref(), Some("45"));
//! assert_eq!(console.execute("quit").status, Status::Leave);
//! ```

pub mod instruction;

pub use instruction::{Instruction, InstructionError};

use crate::config::Format;
use crate::descriptor::TypeDescriptor;
use crate::document::{JsonReader, JsonWriter};
use crate::serializer::Serializer;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Outcome of one console instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// The involved type has no strategy or no constructor.
    UnsupportedType,
    /// A registered accessor, strategy or method failed.
    InternalError,
    /// The line does not parse or does not fit the type.
    BadInstruction,
    /// The user asked to leave.
    Leave,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ok => "ok",
            Self::UnsupportedType => "unsupported type",
            Self::InternalError => "internal error",
            Self::BadInstruction => "bad instruction",
            Self::Leave => "leave",
        };
        f.write_str(text)
    }
}

/// Status plus the text to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub output: Option<String>,
}

impl Response {
    fn ok(output: Option<String>) -> Self {
        Self {
            status: Status::Ok,
            output,
        }
    }

    fn fail(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            output: Some(message.into()),
        }
    }
}

const HELP: &str = "\
member=value        assign a JSON value (bare words are strings)
member              print a member
method(a, b, ...)   call a method with JSON arguments
:print              print the whole instance
:members            list members
:methods            list methods
:format full|short  switch the output format
:help               show this help
:quit               leave";

/// Interactive explorer of one instance.
pub struct Console<'r> {
    serializer: Serializer<'r>,
    descriptor: Arc<TypeDescriptor>,
    instance: Box<dyn Any>,
}

impl<'r> Console<'r> {
    /// Console over `instance`, `None` if it is not a `descriptor` instance.
    pub fn new(
        serializer: &Serializer<'r>,
        descriptor: Arc<TypeDescriptor>,
        instance: Box<dyn Any>,
    ) -> Option<Self> {
        if (*instance).type_id() != descriptor.rust_type_id() {
            log::debug!(
                "[console] instance is not a {} ({})",
                descriptor.name(),
                descriptor.rust_name()
            );
            return None;
        }
        Some(Self {
            serializer: serializer.clone(),
            descriptor,
            instance,
        })
    }

    /// Console over a fresh default `T`.
    pub fn for_type<T: Any>(serializer: &Serializer<'r>) -> Option<Self> {
        let descriptor = serializer.registry().get::<T>()?;
        Self::for_descriptor(serializer, Arc::clone(descriptor))
    }

    /// Console over a fresh instance of the type registered as `name`.
    pub fn for_type_name(serializer: &Serializer<'r>, name: &str) -> Option<Self> {
        let descriptor = serializer.registry().get_by_name(name)?;
        Self::for_descriptor(serializer, Arc::clone(descriptor))
    }

    fn for_descriptor(serializer: &Serializer<'r>, descriptor: Arc<TypeDescriptor>) -> Option<Self> {
        let instance = descriptor.instantiate()?;
        Self::new(serializer, descriptor, instance)
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn format(&self) -> Format {
        self.serializer.format()
    }

    pub fn instance(&self) -> &dyn Any {
        self.instance.as_ref()
    }

    pub fn into_instance(self) -> Box<dyn Any> {
        self.instance
    }

    /// Parse and execute one line.
    pub fn execute(&mut self, line: &str) -> Response {
        let instruction = match instruction::parse(line) {
            Ok(instruction) => instruction,
            Err(err) => return Response::fail(Status::BadInstruction, err.to_string()),
        };
        log::debug!("[console] {:?}", instruction);

        match instruction {
            Instruction::Empty => Response::ok(None),
            Instruction::Assign { member, value } => self.assign(&member, &value),
            Instruction::Inspect { member } => self.inspect(&member),
            Instruction::Call { method, args } => self.call(&method, &args),
            Instruction::Print => self.print(),
            Instruction::Members => Response::ok(Some(self.list_members())),
            Instruction::Methods => Response::ok(Some(self.list_methods())),
            Instruction::Help => Response::ok(Some(HELP.to_string())),
            Instruction::SetFormat(format) => {
                self.serializer.set_format(format);
                Response::ok(None)
            }
            Instruction::Quit => Response {
                status: Status::Leave,
                output: None,
            },
        }
    }

    fn render(&self, type_id: TypeId, value: &dyn Any) -> Response {
        let mut writer = JsonWriter::new();
        if !self.serializer.serialize_dyn(type_id, value, &mut writer) {
            return Response::fail(Status::InternalError, "serialization failed");
        }
        match writer.to_json_string() {
            Some(text) => Response::ok(Some(text)),
            None => Response::fail(Status::InternalError, "incomplete document"),
        }
    }

    fn unsupported(&self, type_id: TypeId) -> Option<Response> {
        if self.serializer.knows_type_id(type_id) {
            return None;
        }
        let name = self
            .serializer
            .registry()
            .get_by_type_id(type_id)
            .map_or("<unregistered>", |d| d.name());
        Some(Response::fail(
            Status::UnsupportedType,
            format!("type `{}` has no serialization strategy", name),
        ))
    }

    fn print(&self) -> Response {
        let type_id = self.descriptor.rust_type_id();
        if let Some(response) = self.unsupported(type_id) {
            return response;
        }
        self.render(type_id, self.instance.as_ref())
    }

    fn inspect(&self, name: &str) -> Response {
        let Some(member) = self.descriptor.get_member_by_name_recursive(name) else {
            return Response::fail(Status::BadInstruction, format!("unknown member `{}`", name));
        };
        if let Some(response) = self.unsupported(member.member_type_id()) {
            return response;
        }
        match member.get(self.instance.as_ref()) {
            Some(field) => self.render(member.member_type_id(), field),
            None => Response::fail(Status::InternalError, "member accessor failed"),
        }
    }

    fn assign(&mut self, name: &str, value: &Value) -> Response {
        let Some(member) = self.descriptor.get_member_by_name_recursive(name).cloned() else {
            return Response::fail(Status::BadInstruction, format!("unknown member `{}`", name));
        };
        let type_id = member.member_type_id();
        if let Some(response) = self.unsupported(type_id) {
            return response;
        }
        let Some(mut fresh) = self.serializer.instantiate_dyn(type_id) else {
            return Response::fail(
                Status::UnsupportedType,
                format!("type `{}` cannot be instantiated", member.member_type()),
            );
        };

        // Read into a fresh value; the member is only replaced on success.
        let mut reader = JsonReader::new(value);
        if !self
            .serializer
            .deserialize_payload_dyn(type_id, fresh.as_mut(), &mut reader)
        {
            return Response::fail(
                Status::BadInstruction,
                format!("{} is not a valid `{}`", value, member.member_type()),
            );
        }
        if member.set(self.instance.as_mut(), fresh) {
            Response::ok(None)
        } else {
            Response::fail(Status::InternalError, "member accessor failed")
        }
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Response {
        let Some(method) = self.descriptor.get_method_by_name_recursive(name).cloned() else {
            return Response::fail(Status::BadInstruction, format!("unknown method `{}`", name));
        };
        if method.arity() != args.len() {
            return Response::fail(
                Status::BadInstruction,
                format!(
                    "`{}` takes {} arguments, {} given",
                    name,
                    method.arity(),
                    args.len()
                ),
            );
        }

        let mut boxed = Vec::with_capacity(args.len());
        for (parameter, arg) in method.parameters().iter().zip(args) {
            let type_id = parameter.param_type_id();
            if let Some(response) = self.unsupported(type_id) {
                return response;
            }
            let Some(mut instance) = self.serializer.instantiate_dyn(type_id) else {
                return Response::fail(
                    Status::UnsupportedType,
                    format!("type `{}` cannot be instantiated", parameter.param_type()),
                );
            };
            let mut reader = JsonReader::new(arg);
            if !self
                .serializer
                .deserialize_payload_dyn(type_id, instance.as_mut(), &mut reader)
            {
                return Response::fail(
                    Status::BadInstruction,
                    format!("{} is not a valid `{}`", arg, parameter.param_type()),
                );
            }
            boxed.push(instance);
        }

        let Some(ret) = method.invoke(self.instance.as_mut(), boxed) else {
            return Response::fail(Status::InternalError, format!("call to `{}` failed", name));
        };
        let return_type = method.return_type_id();
        if return_type == TypeId::of::<()>() {
            return Response::ok(None);
        }
        if let Some(response) = self.unsupported(return_type) {
            return response;
        }
        self.render(return_type, ret.as_ref())
    }

    fn list_members(&self) -> String {
        self.descriptor
            .visible_members()
            .into_iter()
            .map(|m| format!("{}: {}", m.name(), m.member_type()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn list_methods(&self) -> String {
        let mut seen: Vec<&str> = Vec::new();
        let mut lines = Vec::new();
        for method in self.descriptor.fetch_methods_recursive().into_iter().rev() {
            if seen.contains(&method.name()) {
                continue;
            }
            seen.push(method.name());
            let params = method
                .parameters()
                .iter()
                .map(|p| {
                    if p.name().is_empty() {
                        p.param_type().to_string()
                    } else {
                        format!("{}: {}", p.name(), p.param_type())
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("{}({}) -> {}", method.name(), params, method.return_type()));
        }
        lines.reverse();
        lines.join("\n")
    }
}

impl fmt::Debug for Console<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("type", &self.descriptor.name())
            .field("format", &self.serializer.format())
            .finish()
    }
}

#[cfg(test)]
mod tests;
