//! Terminal output helpers
//!
//! Tool results are printed on stdout. Spinners and status lines go to
//! stderr and fall back to plain text in CI.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{key_value, step_warn};
pub use progress::TaskSpinner;
