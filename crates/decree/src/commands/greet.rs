//! Greet command

use anyhow::Result;
use decree_core::{Arguments, Function, Parameter, TypeHint, Value};

use crate::App;

const DOC: &str = "\
Greet someone by name.

Prints one greeting line per repetition.

Parameters
----------
name : str
    who to greet
times : int
    how many greetings to print
shout : bool
    print the greeting in upper case
";

#[must_use]
pub fn function() -> Function {
    Function::new("greet", run)
        .doc(DOC)
        .param(Parameter::new("name").typed(TypeHint::Str))
        .param(Parameter::new("times").default(1))
        .param(Parameter::new("shout").typed(TypeHint::Bool).default(false))
}

/// Register `greet` with its `hello` alias
///
/// # Errors
///
/// Returns error if the name or alias is taken
pub fn register(app: &mut App) -> decree_core::Result<()> {
    app.command(function(), ["hello"])?;
    Ok(())
}

fn run(args: Arguments) -> Result<Value> {
    let name = args.str("name")?;
    let times = usize::try_from(args.int("times")?)
        .map_err(|_| anyhow::anyhow!("times must not be negative"))?;

    let mut line = format!("Hello, {name}!");
    if args.flag("shout") {
        line = line.to_uppercase();
    }
    Ok(Value::from(vec![line; times]))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn call(pairs: &[(&str, Value)]) -> Result<Value> {
        let keywords: BTreeMap<_, _> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        function().call(Arguments::keywords(keywords))
    }

    #[test]
    fn test_greets_times() {
        let out = call(&[
            ("name", Value::from("Ada")),
            ("times", Value::Int(2)),
            ("shout", Value::Bool(false)),
        ])
        .unwrap();
        assert_eq!(out, Value::from(vec!["Hello, Ada!", "Hello, Ada!"]));
    }

    #[test]
    fn test_shout() {
        let out = call(&[
            ("name", Value::from("Ada")),
            ("times", Value::Int(1)),
            ("shout", Value::Bool(true)),
        ])
        .unwrap();
        assert_eq!(out, Value::from(vec!["HELLO, ADA!"]));
    }

    #[test]
    fn test_negative_times_is_an_error() {
        let err = call(&[("name", Value::from("Ada")), ("times", Value::Int(-1))]).unwrap_err();
        assert_eq!(err.to_string(), "times must not be negative");
    }
}
