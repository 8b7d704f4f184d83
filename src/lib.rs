//! # php-refactor
//!
//! An AST-based refactoring engine for PHP source files: extract method,
//! extract/introduce variable, and rename variable, performed by analyzing
//! and rewriting a syntax tree rather than by text patching.
//!
//! Each operation parses the target file into a fresh tree, runs read-only
//! finder and analyzer passes (locating nodes from a textual selection,
//! determining enclosing scopes, computing which variables must cross a new
//! method boundary), applies a single mutating pass, prints the tree, and
//! writes the file back all-or-nothing.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use php_refactor::prelude::*;
//!
//! let engine = Engine::new();
//!
//! // Extract lines 14-18 of a method into a new private method.
//! let outcome = engine.extract_method("src/Invoice.php", "14-18", "computeTotals");
//! assert!(outcome.success);
//!
//! // Rename $total to $grandTotal in the scope containing line 20.
//! let outcome = engine.rename_variable("src/Invoice.php", "20", "$total", "$grandTotal");
//! assert!(outcome.success);
//! ```
//!
//! ## Selection ranges
//!
//! Operations take textual selections in one of four forms:
//! `startLine:startColumn-endLine:endColumn`, `startLine-endLine`,
//! `line:column`, or `line`. Lines and columns are 1-based; column 0 means
//! "unspecified", and matching is line-granular.
//!
//! ## Collaborators
//!
//! Parsing, printing, and file storage sit behind the [`lang::Parser`],
//! [`lang::Printer`], and [`store::Store`] traits. [`Engine::new`] wires the
//! built-in PHP front end and the local filesystem; hosts can inject their
//! own with [`Engine::with_collaborators`].

pub mod ast;
pub mod diff;
pub mod error;
pub mod flow;
pub mod lang;
pub mod locate;
pub mod ops;
pub mod range;
pub mod rewrite;
pub mod store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorKind, RefactorError, Result};
    pub use crate::lang::{Parser, PhpParser, PhpPrinter, Printer};
    pub use crate::ops::{
        Engine, ExtractMethod, ExtractVariable, IntroduceVariable, Refactoring,
        RefactoringOutcome, RenameVariable,
    };
    pub use crate::range::SelectionRange;
    pub use crate::store::{MemoryStore, OsStore, Store};
}

pub use prelude::*;
