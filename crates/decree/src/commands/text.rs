//! Text helpers, mounted as the `text` group

use anyhow::Result;
use decree_core::{Arguments, Function, Parameter, TypeHint, Value};

use crate::config::AppConfig;
use crate::App;

#[must_use]
pub fn upper() -> Function {
    Function::new("upper", |args: Arguments| {
        let words = args
            .list("words")?
            .iter()
            .map(|w| Value::from(w.to_string().to_uppercase()))
            .collect();
        Ok(Value::List(words))
    })
    .doc("Upper-case every word.\n\nParameters\n----------\nwords\n    words to convert\n")
    .param(Parameter::new("words").typed(TypeHint::list(TypeHint::Str)))
}

#[must_use]
pub fn count() -> Function {
    Function::new("count", count_occurrences)
        .doc(
            "Count occurrences of a substring.\n\n\
             Parameters\n----------\n\
             text\n    text to search\n\
             needle\n    substring to count, a single space by default\n",
        )
        .param(Parameter::new("text"))
        .param(Parameter::new("needle").default(" "))
}

fn count_occurrences(args: Arguments) -> Result<Value> {
    let text = args.str("text")?;
    let needle = args.str("needle")?;
    if needle.is_empty() {
        anyhow::bail!("needle must not be empty");
    }
    let n = i64::try_from(text.matches(needle).count())?;
    Ok(Value::Int(n))
}

/// Mount the `text` group with `upper` and `count`
///
/// # Errors
///
/// Returns error if `text` is already taken
pub fn register(app: &mut App) -> decree_core::Result<()> {
    let mut group = App::new(AppConfig {
        description: Some("Text helpers.".to_string()),
        ..AppConfig::default()
    });
    group
        .command(upper(), Vec::<String>::new())?
        .command(count(), Vec::<String>::new())?;
    app.mount("text", group)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_count() {
        let mut keywords = BTreeMap::new();
        keywords.insert("text".to_string(), Value::from("a-b-c"));
        keywords.insert("needle".to_string(), Value::from("-"));
        let out = count().call(Arguments::keywords(keywords.clone())).unwrap();
        assert_eq!(out, Value::Int(2));

        keywords.insert("needle".to_string(), Value::from(""));
        assert!(count().call(Arguments::keywords(keywords)).is_err());
    }

    #[test]
    fn test_upper() {
        let mut keywords = BTreeMap::new();
        keywords.insert("words".to_string(), Value::from(vec!["ab", "c"]));
        let out = upper().call(Arguments::keywords(keywords)).unwrap();
        assert_eq!(out, Value::from(vec!["AB", "C"]));
    }
}
