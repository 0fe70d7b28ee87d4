//! Rendering of returned values
//!
//! Text mode prints strings raw and lists one item per line; `None` prints
//! nothing. JSON mode serializes the value as-is.

use decree_core::Value;
use itertools::Itertools;

use crate::config::OutputFormat;
use crate::{Error, Result};

/// Render `value`, or `None` when there is nothing to print
///
/// # Errors
///
/// Returns error if the value cannot be serialized
pub fn render(value: &Value, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(render_text(value)),
        OutputFormat::Json => serde_json::to_string(value)
            .map(Some)
            .map_err(|e| Error::OutputError(e.to_string())),
    }
}

fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::None => None,
        Value::List(items) => Some(
            items
                .iter()
                .filter(|item| !item.is_none())
                .map(ToString::to_string)
                .join("\n"),
        )
        .filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}
