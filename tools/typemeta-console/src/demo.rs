// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Demo types exposed by the console.

use typemeta::{
    CollectionStrategy, EnumStrategy, ObjectStrategy, OptionalStrategy, RegistryError, Serializer,
    TypeLibraryBuilder, TypeRegistry,
};

/// Type names a console can be opened on.
pub const TYPES: &[&str] = &["TestPerson", "Pilot"];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TestPerson {
    pub name: String,
    pub age: i32,
    pub tags: Vec<String>,
}

impl TestPerson {
    fn greet(&self, greeting: String) -> String {
        format!("{}, {}", greeting, self.name)
    }

    fn birthday(&mut self) -> i32 {
        self.age += 1;
        self.age
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rank {
    #[default]
    Cadet = 0,
    Officer = 1,
    Captain = 2,
}
typemeta::enum_repr!(Rank);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Pilot {
    pub person: TestPerson,
    pub callsign: Option<String>,
    pub rank: Rank,
    pub hours: Vec<u32>,
}

impl Pilot {
    fn log_flight(&mut self, hours: u32) -> u32 {
        self.hours.push(hours);
        self.hours.iter().sum()
    }

    fn promote(&mut self) -> Rank {
        self.rank = match self.rank {
            Rank::Cadet => Rank::Officer,
            Rank::Officer | Rank::Captain => Rank::Captain,
        };
        self.rank
    }

    // Shadows TestPerson::greet.
    fn greet(&self, greeting: String) -> String {
        match &self.callsign {
            Some(callsign) => format!("{}, {} ({})", greeting, self.person.name, callsign),
            None => self.person.greet(greeting),
        }
    }
}

pub fn registry() -> Result<TypeRegistry, RegistryError> {
    TypeLibraryBuilder::with_builtins()
        .add::<Vec<String>>("vector<string>")
        .add::<Vec<u32>>("vector<uint32>")
        .add::<Option<String>>("optional<string>")
        .begin_type::<Rank>("Rank")
        .value(Rank::Cadet, "Cadet")
        .value(Rank::Officer, "Officer")
        .value(Rank::Captain, "Captain")
        .end_type()
        .begin_type::<TestPerson>("TestPerson")
        .member("Name", |p| &p.name, |p| &mut p.name)
        .member("Age", |p| &p.age, |p| &mut p.age)
        .member("Tags", |p| &p.tags, |p| &mut p.tags)
        .method("greet", TestPerson::greet, &["greeting"])
        .method("birthday", TestPerson::birthday, &[])
        .end_type()
        .begin_derived_type::<Pilot, TestPerson>("Pilot", |p| &p.person, |p| &mut p.person)
        .member("Callsign", |p| &p.callsign, |p| &mut p.callsign)
        .member("Rank", |p| &p.rank, |p| &mut p.rank)
        .member("Hours", |p| &p.hours, |p| &mut p.hours)
        .method("log_flight", Pilot::log_flight, &["hours"])
        .method("promote", Pilot::promote, &[])
        .method("greet", Pilot::greet, &["greeting"])
        .end_type()
        .build()
}

/// Bind strategies for every demo type.
pub fn learn(serializer: &mut Serializer<'_>) {
    let builtins = serializer.learn_builtins();
    log::debug!("[demo] learned {} builtin types", builtins);
    serializer.learn_type::<Vec<String>, CollectionStrategy<Vec<String>>>();
    serializer.learn_type::<Vec<u32>, CollectionStrategy<Vec<u32>>>();
    serializer.learn_type::<Option<String>, OptionalStrategy<String>>();
    serializer.learn_type::<Rank, EnumStrategy<Rank>>();
    serializer.learn_type::<TestPerson, ObjectStrategy>();
    serializer.learn_type::<Pilot, ObjectStrategy>();
}
