//! Echo command
//!
//! A forwarding command: it takes `*args` only, so it receives every token
//! after its name verbatim, flags included.

use anyhow::Result;
use decree_core::{Arguments, Function, Parameter, Value};

use crate::App;

#[must_use]
pub fn function() -> Function {
    Function::new("echo", run)
        .doc("Print the remaining arguments unchanged.")
        .param(Parameter::var_args("args"))
}

/// Register `echo` with its `e` alias
///
/// # Errors
///
/// Returns error if the name or alias is taken
pub fn register(app: &mut App) -> decree_core::Result<()> {
    app.command(function(), ["e"])?;
    Ok(())
}

#[allow(clippy::unnecessary_wraps)]
fn run(args: Arguments) -> Result<Value> {
    Ok(Value::from(args.positional().join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_tokens() {
        let out = function()
            .call(Arguments::forwarded(vec!["--flag".into(), "v".into()]))
            .unwrap();
        assert_eq!(out, Value::from("--flag v"));
    }
}
