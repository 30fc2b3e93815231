//! Guard expression evaluation.
//!
//! Gateway guards are minijinja expressions evaluated against a token's local
//! data:
//!
//! ```text
//! x > 10
//! action == "complete"
//! needs_tool and not more_tools_needed
//! ```
//!
//! Every top-level variable an expression names must be present in the
//! context. A missing variable is reported by name before evaluation starts,
//! so a guard on a branch that would never be chosen still fails when its
//! inputs are absent.

mod error;
mod evaluator;

pub use error::ConditionError;
pub use evaluator::{ConditionEvaluator, Context, evaluate};
