//! Action plan construction.
//!
//! The last pipeline stage: compares what the platform needs with what the
//! snapshot shows and produces the ordered actions, the comparison table and
//! the completion verdict.

mod builder;
mod types;

pub use builder::ActionPlanBuilder;
pub use types::{Action, ActionPlan, ComparisonRow, RowStatus};

#[cfg(test)]
mod tests;
