//! Dual symbolic/numeric equation rendering.

mod body;
mod equation;

pub use body::*;
pub use equation::*;
