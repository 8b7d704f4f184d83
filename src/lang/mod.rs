//! Language front end: the parser/printer seam and the built-in PHP subset.
//!
//! The engine consumes source text and produces source text only through the
//! [`Parser`] and [`Printer`] traits; everything in between operates on the
//! tree. [`PhpParser`] and [`PhpPrinter`] are the default wiring, and hosts
//! with their own front end can inject replacements.

mod lexer;
mod parser;
mod printer;

pub use parser::PhpParser;
pub use printer::PhpPrinter;

use crate::ast::Program;
use crate::error::Result;

/// Converts source text into a tree.
///
/// Implementations assign position attributes (line and byte-offset spans)
/// and unique node ids; failures surface as
/// [`RefactorError::Parse`](crate::error::RefactorError::Parse).
pub trait Parser {
    fn parse(&self, source: &str) -> Result<Program>;
}

/// Converts a tree back into source text.
///
/// Total and deterministic for any tree the engine produces.
pub trait Printer {
    fn print(&self, program: &Program) -> String;
}
