// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! typemeta-console - interactive explorer over a reflected instance
//!
//! Reads one instruction per line from stdin and prints the result.
//!
//! # Usage
//!
//! ```bash
//! # Explore a default Pilot, output in Short format
//! typemeta-console --type Pilot --format short
//!
//! # Serializer settings from a file
//! typemeta-console --type TestPerson --config serializer.json
//!
//! # Scripted session
//! printf 'Name=Ada\ngreet(Hello)\n:print\n' | typemeta-console
//! ```

mod demo;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use typemeta::{Console, Format, Serializer, SerializerConfig, Status};

/// Interactive console over typemeta-reflected instances
#[derive(Parser, Debug)]
#[command(name = "typemeta-console")]
#[command(about = "Inspect and drive a reflected instance from the command line")]
#[command(version)]
struct Args {
    /// Registered type to instantiate
    #[arg(short, long, default_value = "TestPerson")]
    r#type: String,

    /// Output format (full, short); overrides the config file
    #[arg(short, long)]
    format: Option<Format>,

    /// Serializer configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the available types and exit
    #[arg(long)]
    list_types: bool,

    /// Do not print a prompt
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.list_types {
        for name in demo::TYPES {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => SerializerConfig::from_path(path)?,
        None => SerializerConfig::default(),
    };
    if let Some(format) = args.format {
        config = config.with_format(format);
    }
    log::info!("[console] config: {:?}", config);

    let registry = demo::registry()?;
    let mut serializer = Serializer::with_config(&registry, config);
    demo::learn(&mut serializer);

    let mut console = Console::for_type_name(&serializer, &args.r#type).ok_or_else(|| {
        format!(
            "unknown type `{}` (available: {})",
            args.r#type,
            demo::TYPES.join(", ")
        )
    })?;

    let prompt = (!args.quiet).then(|| format!("{}> ", args.r#type));
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut console, stdin.lock(), stdout.lock(), prompt.as_deref())?;
    Ok(())
}

/// Feed `input` to the console line by line until EOF or a leave request.
///
/// Returns the number of instructions that did not succeed.
fn run_session<R: BufRead, W: Write>(
    console: &mut Console<'_>,
    input: R,
    mut output: W,
    prompt: Option<&str>,
) -> io::Result<usize> {
    let mut failures = 0;
    let mut lines = input.lines();
    loop {
        if let Some(prompt) = prompt {
            write!(output, "{}", prompt)?;
            output.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let response = console.execute(&line?);
        match response.status {
            Status::Leave => break,
            Status::Ok => {
                if let Some(text) = response.output {
                    writeln!(output, "{}", text)?;
                }
            }
            status => {
                failures += 1;
                writeln!(
                    output,
                    "[{}] {}",
                    status,
                    response.output.unwrap_or_default()
                )?;
            }
        }
    }
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(registry: &typemeta::TypeRegistry, type_name: &str, script: &str) -> (String, usize) {
        let mut serializer = Serializer::new(registry);
        demo::learn(&mut serializer);
        serializer.set_format(Format::Short);
        let mut console = Console::for_type_name(&serializer, type_name).expect("console");
        let mut out = Vec::new();
        let failures =
            run_session(&mut console, script.as_bytes(), &mut out, None).expect("session");
        (String::from_utf8(out).expect("utf8"), failures)
    }

    #[test]
    fn test_demo_types_are_registered() {
        let registry = demo::registry().expect("registry");
        for name in demo::TYPES {
            assert!(registry.get_by_name(name).is_some(), "{}", name);
        }
    }

    #[test]
    fn test_person_session() {
        let registry = demo::registry().expect("registry");
        let (out, failures) = session(
            &registry,
            "TestPerson",
            "Name=Ada\nAge=36\nbirthday()\ngreet(Hello)\n:print\n",
        );
        assert_eq!(failures, 0);
        assert_eq!(
            out,
            "37\n\"Hello, Ada\"\n{\"Age\":37,\"Name\":\"Ada\",\"Tags\":[]}\n"
        );
    }

    #[test]
    fn test_pilot_session_uses_derived_methods() {
        let registry = demo::registry().expect("registry");
        let (out, failures) = session(
            &registry,
            "Pilot",
            "Name=Ada\nCallsign=Falcon\nlog_flight(3)\nlog_flight(4)\npromote()\ngreet(Hi)\nRank=Admiral\n",
        );
        assert_eq!(failures, 1);
        assert_eq!(
            out,
            "3\n7\n\"Officer\"\n\"Hi, Ada (Falcon)\"\n[bad instruction] \"Admiral\" is not a valid `Rank`\n"
        );
    }

    #[test]
    fn test_session_stops_on_leave() {
        let registry = demo::registry().expect("registry");
        let (out, failures) = session(&registry, "TestPerson", "Age=1\n:quit\nAge\n");
        assert_eq!(failures, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_prompt_is_written() {
        let registry = demo::registry().expect("registry");
        let mut serializer = Serializer::new(&registry);
        demo::learn(&mut serializer);
        let mut console = Console::for_type::<demo::TestPerson>(&serializer).expect("console");
        let mut out = Vec::new();
        run_session(&mut console, "".as_bytes(), &mut out, Some("> ")).expect("session");
        assert_eq!(out, b"> ");
    }
}
