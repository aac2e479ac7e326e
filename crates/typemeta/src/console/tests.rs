// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::serializer::{CollectionStrategy, ObjectStrategy, OptionalStrategy};
use crate::{TypeLibraryBuilder, TypeRegistry};

#[derive(Debug, Default, Clone, PartialEq)]
struct TestPerson {
    name: String,
    age: i32,
    tags: Vec<String>,
}

impl TestPerson {
    fn greet(&self, greeting: String) -> String {
        format!("{greeting}, {}", self.name)
    }

    fn birthday(&mut self) {
        self.age += 1;
    }

    fn handle(&self) -> Handle {
        Handle
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Handle;

fn registry() -> TypeRegistry {
    TypeLibraryBuilder::with_builtins()
        .add::<Vec<String>>("vector<string>")
        .add::<Handle>("Handle")
        .begin_type::<TestPerson>("TestPerson")
        .member("Name", |p| &p.name, |p| &mut p.name)
        .member("Age", |p| &p.age, |p| &mut p.age)
        .member("Tags", |p| &p.tags, |p| &mut p.tags)
        .method("greet", TestPerson::greet, &["greeting"])
        .method("birthday", TestPerson::birthday, &[])
        .method("handle", TestPerson::handle, &[])
        .end_type()
        .build()
        .expect("registry")
}

fn serializer(registry: &TypeRegistry) -> Serializer<'_> {
    let mut serializer = Serializer::new(registry);
    serializer.learn_builtins();
    serializer.learn_type::<Vec<String>, CollectionStrategy<Vec<String>>>();
    serializer.learn_type::<TestPerson, ObjectStrategy>();
    serializer.set_format(Format::Short);
    serializer
}

fn person(console: &Console<'_>) -> TestPerson {
    console
        .instance()
        .downcast_ref::<TestPerson>()
        .cloned()
        .expect("TestPerson instance")
}

#[test]
fn test_assign_and_inspect() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<TestPerson>(&serializer).expect("console");

    assert_eq!(console.execute("Name=George"), Response::ok(None));
    assert_eq!(console.execute("Age = 41").status, Status::Ok);
    assert_eq!(console.execute(r#"Tags=["pilot"]"#).status, Status::Ok);
    assert_eq!(
        person(&console),
        TestPerson {
            name: "George".into(),
            age: 41,
            tags: vec!["pilot".into()],
        }
    );

    assert_eq!(console.execute("Age").output.as_deref(), Some("41"));
    assert_eq!(
        console.execute(":print").output.as_deref(),
        Some(r#"{"Age":41,"Name":"George","Tags":["pilot"]}"#)
    );
}

#[test]
fn test_full_format_output() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type_name(&serializer, "TestPerson").expect("console");

    assert_eq!(console.execute(":format full").status, Status::Ok);
    assert_eq!(console.format(), Format::Full);
    assert_eq!(
        console.execute("Age").output.as_deref(),
        Some(r#"{"type":"int32","value":0}"#)
    );
    // Input stays in Short format.
    assert_eq!(console.execute("Age=3").status, Status::Ok);
    assert_eq!(person(&console).age, 3);
}

#[test]
fn test_method_calls() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<TestPerson>(&serializer).expect("console");

    console.execute("Name=Ada");
    let response = console.execute(r#"greet("Hello")"#);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.output.as_deref(), Some(r#""Hello, Ada""#));

    assert_eq!(console.execute("birthday()"), Response::ok(None));
    assert_eq!(console.execute("greet(Hi)").output.as_deref(), Some(r#""Hi, Ada""#));
    assert_eq!(person(&console).age, 1);
}

#[test]
fn test_bad_instructions() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<TestPerson>(&serializer).expect("console");

    for line in [
        "FieldMissing",
        "FieldMissing=1",
        "fly()",
        "greet()",
        "greet(1, 2)",
        "greet(1)",
        "Age=\"old\"",
        "Age=[1",
        ":dance",
        "not valid",
    ] {
        assert_eq!(console.execute(line).status, Status::BadInstruction, "{line}");
    }
    assert_eq!(person(&console), TestPerson::default());
}

#[test]
fn test_failed_assignment_restores_member() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<TestPerson>(&serializer).expect("console");

    console.execute(r#"Tags=["a", "b"]"#);
    assert_eq!(
        console.execute(r#"Tags=["c", 4]"#).status,
        Status::BadInstruction
    );
    assert_eq!(person(&console).tags, vec!["a", "b"]);
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Badge {
    nickname: Option<String>,
    level: i32,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Member {
    badge: Badge,
}

#[test]
fn test_failed_assignment_keeps_absent_optional() {
    let registry = TypeLibraryBuilder::with_builtins()
        .add::<Option<String>>("optional<string>")
        .begin_type::<Badge>("Badge")
        .member("nickname", |b| &b.nickname, |b| &mut b.nickname)
        .member("level", |b| &b.level, |b| &mut b.level)
        .end_type()
        .begin_type::<Member>("Member")
        .member("badge", |m| &m.badge, |m| &mut m.badge)
        .end_type()
        .build()
        .expect("registry");
    let mut serializer = Serializer::new(&registry);
    serializer.learn_builtins();
    serializer.learn_type::<Option<String>, OptionalStrategy<String>>();
    serializer.learn_type::<Badge, ObjectStrategy>();
    serializer.learn_type::<Member, ObjectStrategy>();
    serializer.set_format(Format::Short);
    let mut console = Console::for_type::<Member>(&serializer).expect("console");

    // `nickname` is read before `level` fails.
    assert_eq!(
        console.execute(r#"badge={"nickname": "x", "level": "bad"}"#).status,
        Status::BadInstruction
    );
    let member = console.instance().downcast_ref::<Member>().expect("Member");
    assert_eq!(member.badge, Badge::default());

    assert_eq!(
        console.execute(r#"badge={"nickname": "ace", "level": 3}"#).status,
        Status::Ok
    );
    assert_eq!(
        console.execute(r#"badge={"level": 4}"#).status,
        Status::Ok
    );
    let member = console.instance().downcast_ref::<Member>().expect("Member");
    assert_eq!(member.badge, Badge { nickname: None, level: 4 });
}

#[test]
fn test_unsupported_types() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<TestPerson>(&serializer).expect("console");

    let response = console.execute("handle()");
    assert_eq!(response.status, Status::UnsupportedType);
    assert!(response.output.is_some_and(|text| text.contains("Handle")));

    let mut bare = Serializer::new(&registry);
    bare.set_format(Format::Short);
    let mut console = Console::for_type::<TestPerson>(&bare).expect("console");
    assert_eq!(console.execute(":print").status, Status::UnsupportedType);
    assert_eq!(console.execute("Age=1").status, Status::UnsupportedType);
}

#[test]
fn test_listings_and_leave() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<TestPerson>(&serializer).expect("console");

    assert_eq!(
        console.execute(":members").output.as_deref(),
        Some("Name: string\nAge: int32\nTags: vector<string>")
    );
    assert_eq!(
        console.execute(":methods").output.as_deref(),
        Some("greet(greeting: string) -> string\nbirthday() -> void\nhandle() -> Handle")
    );
    assert!(console.execute(":help").output.is_some());
    assert_eq!(console.execute("").status, Status::Ok);
    assert_eq!(console.execute(":exit").status, Status::Leave);
    assert_eq!(console.execute("quit").status, Status::Leave);
}

#[test]
fn test_new_rejects_foreign_instance() {
    let registry = registry();
    let serializer = serializer(&registry);
    let descriptor = Arc::clone(registry.get_checked::<TestPerson>());
    assert!(Console::new(&serializer, descriptor, Box::new(5i32)).is_none());
    assert!(Console::for_type_name(&serializer, "Nobody").is_none());
}
