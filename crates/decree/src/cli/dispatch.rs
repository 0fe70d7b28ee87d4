//! Command dispatch
//!
//! Routes a [`ParsedInput`] back to the registered callable:
//!
//! ```text
//! resolve group path -> resolve command -> [resolve action]
//!   -> strip bookkeeping keys -> invoke(leftover | filtered keywords)
//! ```
//!
//! Whatever the callable returns, value or error, is handed back untouched.

use std::collections::BTreeMap;

use anyhow::Result;
use decree_core::{Arguments, Error, Value};

use super::parse::ParsedInput;
use super::{ACTION_KEY, BOOKKEEPING_KEYS, COMMAND_KEY, GROUP_KEY};
use crate::registry::{Registry, Target};

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// No command was selected
    NoOp,
    /// The target ran and returned this value
    Completed(Value),
}

impl Dispatched {
    /// Returned value, if a target ran
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::NoOp => None,
            Self::Completed(value) => Some(value),
        }
    }
}

/// Resolve and invoke the target selected by `input`
pub fn dispatch(registry: &Registry, input: ParsedInput) -> Result<Dispatched> {
    let ParsedInput {
        mut values,
        leftover,
    } = input;

    let (registry, path) = descend(registry, values.get(GROUP_KEY))?;

    let Some(command_name) = discriminator(&values, COMMAND_KEY) else {
        tracing::debug!("no command selected");
        return Ok(Dispatched::NoOp);
    };
    let command = registry
        .resolve_command(&command_name)
        .ok_or_else(|| Error::CommandNotFound(join(&path, &command_name)))?;

    let target = if registry.has_actions(command) {
        let action_name = discriminator(&values, ACTION_KEY).unwrap_or_default();
        registry
            .resolve_action(command, &action_name)
            .map(Target::Action)
            .ok_or_else(|| {
                Error::CommandNotFound(join(&path, &format!("{} {action_name}", command.name())))
            })?
    } else {
        Target::Command(command)
    };

    strip_bookkeeping_keys(&mut values);
    let signature = target.signature();

    let arguments = if signature.forwards() {
        tracing::debug!(
            target = target.name(),
            tokens = leftover.len(),
            "dispatching forwarded tokens"
        );
        Arguments::forwarded(leftover)
    } else {
        if !leftover.is_empty() {
            tracing::debug!(target = target.name(), ignored = ?leftover, "ignoring leftover tokens");
        }
        let keywords: BTreeMap<String, Value> = values
            .into_iter()
            .filter(|(key, _)| signature.accepts(key))
            .collect();
        tracing::debug!(target = target.name(), keywords = keywords.len(), "dispatching");
        Arguments::keywords(keywords)
    };

    let value = target.function().call(arguments)?;
    Ok(Dispatched::Completed(value))
}

/// Remove the discriminator keys carrying the chosen group, command and action
pub fn strip_bookkeeping_keys(values: &mut BTreeMap<String, Value>) {
    for key in BOOKKEEPING_KEYS {
        values.remove(key);
    }
}

fn descend<'a>(registry: &'a Registry, groups: Option<&Value>) -> Result<(&'a Registry, Vec<String>)> {
    let mut current = registry;
    let mut path = Vec::new();
    for name in groups.and_then(Value::as_list).unwrap_or_default() {
        let name = name.to_string();
        current = current
            .group(&name)
            .map(|g| g.registry())
            .ok_or_else(|| Error::CommandNotFound(join(&path, &name)))?;
        path.push(name);
    }
    Ok((current, path))
}

fn discriminator(values: &BTreeMap<String, Value>, key: &str) -> Option<String> {
    values.get(key).and_then(Value::as_str).map(str::to_string)
}

fn join(path: &[String], name: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join(" ")
}
