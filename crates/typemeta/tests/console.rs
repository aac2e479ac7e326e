// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Console integration tests: a scripted session over a derived type.

use std::collections::BTreeMap;
use typemeta::{
    Console, Format, MapStrategy, ObjectStrategy, Serializer, Status, TypeLibraryBuilder,
    TypeRegistry,
};

#[derive(Debug, Default, Clone, PartialEq)]
struct Account {
    owner: String,
    balance: i64,
}

impl Account {
    fn deposit(&mut self, amount: i64) -> i64 {
        self.balance += amount;
        self.balance
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.owner, self.balance)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Savings {
    account: Account,
    rates: BTreeMap<String, f64>,
}

impl Savings {
    fn describe(&self) -> String {
        format!("{} ({} rates)", self.account.describe(), self.rates.len())
    }
}

fn registry() -> TypeRegistry {
    TypeLibraryBuilder::with_builtins()
        .add::<BTreeMap<String, f64>>("map<string,double>")
        .begin_type::<Account>("Account")
        .member("Owner", |a| &a.owner, |a| &mut a.owner)
        .member("Balance", |a| &a.balance, |a| &mut a.balance)
        .method("deposit", Account::deposit, &["amount"])
        .method("describe", Account::describe, &[])
        .end_type()
        .begin_derived_type::<Savings, Account>("Savings", |s| &s.account, |s| &mut s.account)
        .member("Rates", |s| &s.rates, |s| &mut s.rates)
        .method("describe", Savings::describe, &[])
        .end_type()
        .build()
        .expect("registry")
}

fn serializer(registry: &TypeRegistry) -> Serializer<'_> {
    let mut serializer = Serializer::new(registry);
    serializer.learn_builtins();
    serializer.learn_type::<BTreeMap<String, f64>, MapStrategy<BTreeMap<String, f64>>>();
    serializer.learn_type::<Account, ObjectStrategy>();
    serializer.learn_type::<Savings, ObjectStrategy>();
    serializer
}

#[test]
fn test_scripted_session() {
    let registry = registry();
    let serializer = serializer(&registry).reformatted(Format::Short);
    let mut console = Console::for_type_name(&serializer, "Savings").expect("console");

    let script = [
        ("Owner=Ada", Status::Ok, None),
        ("deposit(250)", Status::Ok, Some("250")),
        ("deposit(-50)", Status::Ok, Some("200")),
        (r#"Rates=[{"key": "base", "value": 1.5}]"#, Status::Ok, None),
        ("describe()", Status::Ok, Some(r#""Ada: 200 (1 rates)""#)),
        ("Balance", Status::Ok, Some("200")),
        ("deposit(ten)", Status::BadInstruction, None),
        ("Rates=[{\"value\": 2.0}]", Status::BadInstruction, None),
        (
            ":print",
            Status::Ok,
            Some(r#"{"Balance":200,"Owner":"Ada","Rates":[{"key":"base","value":1.5}]}"#),
        ),
    ];
    for (line, status, output) in script {
        let response = console.execute(line);
        assert_eq!(response.status, status, "{}", line);
        if status == Status::Ok {
            assert_eq!(response.output.as_deref(), output, "{}", line);
        }
    }

    let savings = console
        .into_instance()
        .downcast::<Savings>()
        .expect("Savings instance");
    assert_eq!(savings.account.balance, 200);
    assert_eq!(savings.rates.get("base"), Some(&1.5));
}

#[test]
fn test_full_format_session() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<Account>(&serializer).expect("console");
    assert_eq!(console.format(), Format::Full);

    console.execute("Owner=Bob");
    assert_eq!(
        console.execute(":print").output.as_deref(),
        Some(r#"{"type":"Account","value":{"Balance":0,"Owner":"Bob"}}"#)
    );
    assert_eq!(
        console.execute("deposit(5)").output.as_deref(),
        Some(r#"{"type":"int64","value":5}"#)
    );

    assert_eq!(console.execute(":format short").status, Status::Ok);
    assert_eq!(console.execute("Balance").output.as_deref(), Some("5"));
}

#[test]
fn test_listings_show_shadowing() {
    let registry = registry();
    let serializer = serializer(&registry);
    let mut console = Console::for_type::<Savings>(&serializer).expect("console");

    assert_eq!(
        console.execute(":members").output.as_deref(),
        Some("Owner: string\nBalance: int64\nRates: map<string,double>")
    );
    assert_eq!(
        console.execute(":methods").output.as_deref(),
        Some("deposit(amount: int64) -> int64\ndescribe() -> string")
    );
    assert_eq!(console.execute("exit").status, Status::Leave);
}
