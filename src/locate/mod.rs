//! Read-only finder passes.
//!
//! Every finder is a [`Visitor`](crate::ast::visit::Visitor) sharing one
//! traversal discipline: scope-, class-, and statement-introducing nodes are
//! pushed onto typed stacks on enter and popped on leave only when the node
//! being left is the one on top. The stacks answer "what encloses this
//! match" without parent pointers; results are handed to the mutating passes
//! by node id.

pub mod expressions;
pub mod scopes;
pub mod statements;

pub use expressions::{ExpressionMatch, find_expression_at_line, find_expression_in_range};
pub use scopes::{ScopeFinder, ScopeTarget};
pub use statements::{EnclosingCallable, StatementMatch, StatementRangeFinder};
