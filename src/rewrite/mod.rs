//! Mutating tree passes.
//!
//! Each pass runs exactly once per invocation, guarded by single-shot flags,
//! and trusts its inputs: preconditions are the finder and analyzer passes'
//! job. A mutating pass never runs while a read-only pass's captured node
//! ids are still being collected — operations sequence them strictly.

pub mod extract_method;
pub mod extract_variable;
pub mod rename;

pub use extract_method::{ExtractionPlan, MethodExtractor};
pub use extract_variable::ExpressionExtractor;
pub use rename::ScopedVariableRenamer;
