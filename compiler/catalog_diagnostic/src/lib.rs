//! Diagnostics for operator resolution and catalog maintenance.
//!
//! Every refused call or catalog change becomes a [`Diagnostic`]: a stable
//! [`ErrorCode`], a one-line message, notes naming the objects involved and
//! ranked [`Suggestion`]s such as the closest overload.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Suggestion};
pub use error_code::ErrorCode;
