//! Math command and its actions
//!
//! `math` itself only groups the actions; every action folds a list of
//! numbers into one value.

use anyhow::Result;
use decree_core::{Arguments, Function, Parameter, TypeHint, Value};

use crate::App;

const VALUES_DOC: &str = "\n\nParameters\n----------\nvalues : list[float]\n    numbers to combine\n";

fn action(name: &str, summary: &str, body: fn(&[f64]) -> Result<f64>) -> Function {
    Function::new(name, move |args: Arguments| {
        let values = numbers(&args)?;
        Ok(Value::Float(body(&values)?))
    })
    .doc(format!("{summary}{VALUES_DOC}"))
    .param(Parameter::new("values").typed(TypeHint::list(TypeHint::Float)))
}

fn numbers(args: &Arguments) -> Result<Vec<f64>> {
    args.list("values")?
        .iter()
        .map(|v| {
            v.as_float()
                .ok_or_else(|| anyhow::anyhow!("'{v}' is not a number"))
        })
        .collect()
}

#[allow(clippy::unnecessary_wraps)]
fn sum(values: &[f64]) -> Result<f64> {
    Ok(values.iter().sum())
}

#[allow(clippy::unnecessary_wraps)]
fn product(values: &[f64]) -> Result<f64> {
    Ok(values.iter().product())
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        anyhow::bail!("mean of an empty list is undefined");
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Register `math` and its `sum`, `product` and `mean` actions
///
/// # Errors
///
/// Returns error if any name or alias is taken
pub fn register(app: &mut App) -> decree_core::Result<()> {
    app.command(
        Function::new("math", |_| Ok(Value::None)).doc("Arithmetic over a list of numbers."),
        Vec::<String>::new(),
    )?
    .action("math", action("math_sum", "Add the numbers.", sum), ["add"])?
    .action("math", action("math_product", "Multiply the numbers.", product), Vec::<String>::new())?
    .action("math", action("math_mean", "Average the numbers.", mean), Vec::<String>::new())?;
    Ok(())
}
