// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Console instruction parser.
//!
//! Grammar (one instruction per line):
//!
//! ```text
//! member=value        assign (value is JSON; a bare word is a string)
//! member              inspect
//! method(a, b, ...)   call (arguments are JSON, split at top-level commas)
//! :print | :members | :methods | :help | :format full|short
//! :quit | :exit | quit | exit
//! ```

use crate::config::Format;
use serde_json::Value;
use thiserror::Error;

/// Instruction parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstructionError {
    #[error("`{0}` is not a valid member or method name")]
    InvalidName(String),

    #[error("Unknown command `:{0}`")]
    UnknownCommand(String),

    #[error("Unbalanced argument list `{0}`")]
    UnbalancedArguments(String),

    #[error("Invalid value `{0}`")]
    InvalidValue(String),
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Empty,
    Assign { member: String, value: Value },
    Inspect { member: String },
    Call { method: String, args: Vec<Value> },
    Print,
    Members,
    Methods,
    Help,
    SetFormat(Format),
    Quit,
}

/// Parse one console line.
pub fn parse(line: &str) -> Result<Instruction, InstructionError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Instruction::Empty);
    }
    if let Some(command) = line.strip_prefix(':') {
        return parse_command(command.trim());
    }
    if line == "quit" || line == "exit" {
        return Ok(Instruction::Quit);
    }

    // An `=` before any `(` is an assignment, so `m("a=b")` stays a call.
    let assign_at = line.find('=');
    let call_at = line.find('(');
    match (assign_at, call_at) {
        (Some(eq), paren) if paren.map_or(true, |p| eq < p) => {
            let member = identifier(&line[..eq])?;
            let value = parse_value(line[eq + 1..].trim())?;
            Ok(Instruction::Assign { member, value })
        }
        (_, Some(open)) => {
            let method = identifier(&line[..open])?;
            let inner = line[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| InstructionError::UnbalancedArguments(line.to_string()))?;
            let args = split_arguments(inner)
                .ok_or_else(|| InstructionError::UnbalancedArguments(line.to_string()))?
                .into_iter()
                .map(parse_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Instruction::Call { method, args })
        }
        _ => Ok(Instruction::Inspect {
            member: identifier(line)?,
        }),
    }
}

fn parse_command(command: &str) -> Result<Instruction, InstructionError> {
    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let instruction = match name {
        "print" => Instruction::Print,
        "members" => Instruction::Members,
        "methods" => Instruction::Methods,
        "help" => Instruction::Help,
        "quit" | "exit" => Instruction::Quit,
        "format" => {
            let format = words
                .next()
                .and_then(|f| f.parse::<Format>().ok())
                .ok_or_else(|| InstructionError::UnknownCommand(command.to_string()))?;
            Instruction::SetFormat(format)
        }
        _ => return Err(InstructionError::UnknownCommand(command.to_string())),
    };
    if words.next().is_some() {
        return Err(InstructionError::UnknownCommand(command.to_string()));
    }
    Ok(instruction)
}

fn identifier(text: &str) -> Result<String, InstructionError> {
    let text = text.trim();
    let mut chars = text.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_');
    if valid {
        Ok(text.to_string())
    } else {
        Err(InstructionError::InvalidName(text.to_string()))
    }
}

/// JSON text, or a bare word taken as a string.
pub fn parse_value(text: &str) -> Result<Value, InstructionError> {
    if text.is_empty() {
        return Err(InstructionError::InvalidValue(String::new()));
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(_) if !text.starts_with(['"', '[', '{']) => Ok(Value::String(text.to_string())),
        Err(_) => Err(InstructionError::InvalidValue(text.to_string())),
    }
}

/// Split an argument list at commas outside strings and brackets.
///
/// Returns `None` when brackets or quotes are unbalanced or an argument is
/// empty.
pub fn split_arguments(text: &str) -> Option<Vec<&str>> {
    if text.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (index, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    if in_string || depth != 0 {
        return None;
    }
    args.push(text[start..].trim());

    if args.iter().any(|arg| arg.is_empty()) {
        return None;
    }
    Some(args)
}
