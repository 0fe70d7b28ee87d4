//! Commands shipped with the `decree-demo` binary
//!
//! Each module exposes the callables it defines and a `register` function
//! adding them to an [`App`].

pub mod echo;
pub mod greet;
pub mod math;
pub mod text;

use crate::App;

/// Register every demo command, action and group on `app`
///
/// # Errors
///
/// Returns error if any registration collides or has an invalid signature
pub fn register_all(app: &mut App) -> decree_core::Result<()> {
    greet::register(app)?;
    echo::register(app)?;
    math::register(app)?;
    text::register(app)
}
