//! Conversion from clap matches to the parsed-input mapping
//!
//! The mapping holds one entry per declared argument plus the discriminator
//! keys naming the chosen group path, command and action. Unrecognized
//! tokens are kept aside as the leftover list.

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::ArgMatches;
use decree_core::{ArgumentSpec, PrimitiveType, Signature, Value};

use super::{ACTION_KEY, COMMAND_KEY, GROUP_KEY};
use crate::registry::Registry;

/// Result of one parse: keyword values and unrecognized leftover tokens
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedInput {
    pub values: BTreeMap<String, Value>,
    pub leftover: Vec<String>,
}

impl ParsedInput {
    /// Input selecting `command` (and optionally `action`) with no arguments
    #[must_use]
    pub fn selecting(command: &str, action: Option<&str>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(COMMAND_KEY.to_string(), Value::from(command));
        if let Some(action) = action {
            values.insert(ACTION_KEY.to_string(), Value::from(action));
        }
        Self {
            values,
            leftover: Vec::new(),
        }
    }

    /// Add a keyword value
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set the leftover tokens
    #[must_use]
    pub fn with_leftover<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leftover = tokens.into_iter().map(Into::into).collect();
        self
    }
}

/// Parse `tokens` (program name first) against `grammar`
///
/// Tokens the grammar does not recognize are moved to the leftover list, in
/// their original order, and the rest of the line is parsed again. Only
/// genuine usage errors (missing arguments, unknown commands, bad values)
/// are returned.
pub fn parse_tokens<I, T>(
    registry: &Registry,
    mut grammar: clap::Command,
    tokens: I,
) -> Result<ParsedInput, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut remaining: Vec<(usize, OsString)> =
        tokens.into_iter().map(Into::into).enumerate().collect();
    let mut unknown: Vec<(usize, String)> = Vec::new();

    loop {
        match grammar.try_get_matches_from_mut(argv(&remaining)) {
            Ok(matches) => {
                let mut input = from_matches(registry, &matches);
                unknown.sort_by_key(|(index, _)| *index);
                input.leftover = unknown.into_iter().map(|(_, token)| token).collect();
                return Ok(input);
            }
            Err(err) => {
                let Some(position) = unrecognized_position(&mut grammar, &remaining, &err) else {
                    return Err(err);
                };
                let (index, token) = remaining.remove(position);
                tracing::trace!(token = ?token, "captured unrecognized token");
                unknown.push((index, token.to_string_lossy().into_owned()));
            }
        }
    }
}

fn argv(tokens: &[(usize, OsString)]) -> impl Iterator<Item = OsString> + '_ {
    tokens.iter().map(|(_, token)| token.clone())
}

fn invalid_arg(err: &clap::Error) -> Option<&str> {
    if err.kind() != ErrorKind::UnknownArgument {
        return None;
    }
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.as_str()),
        _ => None,
    }
}

/// Position in `tokens` of the token clap rejected with `err`
///
/// clap reports the rejected text but not where it sits, and the same text
/// may also appear as an accepted value. The rejected occurrence is the
/// first one whose prefix of the line already fails with the same error.
fn unrecognized_position(
    grammar: &mut clap::Command,
    tokens: &[(usize, OsString)],
    err: &clap::Error,
) -> Option<usize> {
    let invalid = invalid_arg(err)?;
    let candidates: Vec<usize> = tokens
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, (_, token))| token.to_str().is_some_and(|t| spells(t, invalid)))
        .map(|(position, _)| position)
        .collect();

    candidates
        .iter()
        .copied()
        .find(|&position| {
            grammar
                .try_get_matches_from_mut(argv(&tokens[..=position]))
                .err()
                .is_some_and(|e| invalid_arg(&e) == Some(invalid))
        })
        .or_else(|| candidates.first().copied())
}

/// Whether `token` is the command-line spelling clap reported as `invalid`
fn spells(token: &str, invalid: &str) -> bool {
    if token == invalid {
        return true;
    }
    if invalid.starts_with("--") {
        // `--name=value` is reported as `--name`
        return token
            .strip_prefix(invalid)
            .is_some_and(|rest| rest.starts_with('='));
    }
    // `-xyz` with an unknown `-y` is reported as `-y`
    match (invalid.strip_prefix('-'), token.strip_prefix('-')) {
        (Some(short), Some(cluster)) if !cluster.starts_with('-') && !short.is_empty() => {
            cluster.contains(short)
        }
        _ => false,
    }
}

/// Walk the subcommand chain of `matches` and collect the chosen target's values
///
/// The leftover list stays empty; [`parse_tokens`] fills it.
#[must_use]
pub fn from_matches(registry: &Registry, matches: &ArgMatches) -> ParsedInput {
    let mut input = ParsedInput::default();
    let mut groups = Vec::new();
    collect(registry, matches, &mut groups, &mut input);
    if !groups.is_empty() {
        input
            .values
            .insert(GROUP_KEY.to_string(), Value::List(groups));
    }
    input
}

fn collect(registry: &Registry, matches: &ArgMatches, groups: &mut Vec<Value>, input: &mut ParsedInput) {
    let Some((name, sub)) = matches.subcommand() else {
        return;
    };

    if let Some(group) = registry.group(name) {
        groups.push(Value::from(name));
        collect(group.registry(), sub, groups, input);
        return;
    }

    input.values.insert(COMMAND_KEY.to_string(), Value::from(name));
    let Some(command) = registry.resolve_command(name) else {
        return;
    };

    if !registry.has_actions(command) {
        collect_leaf(command.signature(), sub, input);
        return;
    }

    let Some((action_name, action_matches)) = sub.subcommand() else {
        return;
    };
    input
        .values
        .insert(ACTION_KEY.to_string(), Value::from(action_name));
    if let Some(action) = registry.resolve_action(command, action_name) {
        collect_leaf(action.signature(), action_matches, input);
    }
}

fn collect_leaf(signature: &Signature, matches: &ArgMatches, input: &mut ParsedInput) {
    for spec in signature.args() {
        input.values.insert(spec.name.clone(), extract(spec, matches));
    }
}

fn extract(spec: &ArgumentSpec, matches: &ArgMatches) -> Value {
    let fallback = || spec.default.clone().unwrap_or(Value::None);

    if spec.is_flag() {
        return match matches.try_get_one::<bool>(&spec.name) {
            Ok(Some(true)) => Value::Bool(true),
            _ => fallback(),
        };
    }

    if spec.is_repeated() {
        let values = match spec.primitive {
            PrimitiveType::Int => many::<i64>(matches, &spec.name)
                .map(|v| v.into_iter().map(Value::Int).collect::<Vec<_>>()),
            PrimitiveType::Float => many::<f64>(matches, &spec.name)
                .map(|v| v.into_iter().map(Value::Float).collect()),
            PrimitiveType::Bool | PrimitiveType::String | PrimitiveType::Untyped => {
                many::<String>(matches, &spec.name)
                    .map(|v| v.into_iter().map(Value::Str).collect())
            }
        };
        return values
            .filter(|v| !v.is_empty())
            .map_or_else(fallback, Value::List);
    }

    let value = match spec.primitive {
        PrimitiveType::Int => one::<i64>(matches, &spec.name).map(Value::Int),
        PrimitiveType::Float => one::<f64>(matches, &spec.name).map(Value::Float),
        PrimitiveType::Bool | PrimitiveType::String | PrimitiveType::Untyped => {
            one::<String>(matches, &spec.name).map(Value::Str)
        }
    };
    value.unwrap_or_else(fallback)
}

fn one<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

fn many<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<Vec<T>> {
    matches
        .try_get_many::<T>(id)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
}
