//! Refactoring operations and the engine that runs them.
//!
//! Each operation implements the [`Refactoring`] trait: cheap input
//! validation first, then a tree rewrite built from the read-only finder and
//! analyzer passes. The [`Engine`] owns the external collaborators and runs
//! the full pipeline per call:
//!
//! validate → exists → read → parse → locate/analyze → rewrite → print →
//! write.
//!
//! Every failure is converted to a [`RefactorError`] before crossing the
//! operation boundary and surfaces in the uniform [`RefactoringOutcome`]
//! shape. The write only happens after transform and print both succeed, so
//! the target file is never partially rewritten.
//!
//! ## Example
//!
//! ```rust,no_run
//! use php_refactor::ops::Engine;
//!
//! let engine = Engine::new();
//! let outcome = engine.extract_method("src/Invoice.php", "14-18", "computeTotals");
//! if outcome.success {
//!     println!("{}", outcome.message.unwrap());
//! } else {
//!     eprintln!("{}", outcome.error.unwrap());
//! }
//! ```

mod extract_method;
mod extract_variable;
mod introduce_variable;
mod outcome;
mod rename_variable;

pub use extract_method::ExtractMethod;
pub use extract_variable::ExtractVariable;
pub use introduce_variable::IntroduceVariable;
pub use outcome::RefactoringOutcome;
pub use rename_variable::RenameVariable;

use std::path::Path;

use tracing::debug;

use crate::ast::Program;
use crate::error::{RefactorError, Result};
use crate::lang::{Parser, PhpParser, PhpPrinter, Printer};
use crate::store::{OsStore, Store};

/// A refactoring operation over one parsed tree.
pub trait Refactoring {
    /// Stable operation name, used in logs.
    fn name(&self) -> &'static str;

    /// Validate raw inputs. Runs before any file access; failures are input
    /// errors.
    fn validate(&self) -> Result<()>;

    /// Run the finder/analyzer passes and the mutating rewrite. Returns the
    /// rewritten tree and a success message (without the file name, which
    /// the engine appends).
    fn apply(&self, program: Program) -> Result<(Program, String)>;
}

/// Runs operations against files through the parser, printer, and store
/// collaborators.
///
/// Each call builds one fresh tree, rewrites it, and discards it; no state
/// survives a call, so one engine can serve many files.
pub struct Engine<P = PhpParser, W = PhpPrinter, S = OsStore> {
    parser: P,
    printer: W,
    store: S,
}

impl Engine {
    /// Engine with the built-in PHP front end over the local filesystem.
    pub fn new() -> Self {
        Self {
            parser: PhpParser::new(),
            printer: PhpPrinter::new(),
            store: OsStore::new(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Parser, W: Printer, S: Store> Engine<P, W, S> {
    /// Engine over injected collaborators.
    pub fn with_collaborators(parser: P, printer: W, store: S) -> Self {
        Self {
            parser,
            printer,
            store,
        }
    }

    /// Extract a block of code into a separate method.
    pub fn extract_method(
        &self,
        file: impl AsRef<Path>,
        selection: &str,
        method_name: &str,
    ) -> RefactoringOutcome {
        self.execute(file.as_ref(), &ExtractMethod::new(selection, method_name))
    }

    /// Extract the expression at a position into a named variable.
    pub fn extract_variable(
        &self,
        file: impl AsRef<Path>,
        selection: &str,
        variable_name: &str,
    ) -> RefactoringOutcome {
        self.execute(file.as_ref(), &ExtractVariable::new(selection, variable_name))
    }

    /// Introduce a named variable for the expression in a selection range.
    pub fn introduce_variable(
        &self,
        file: impl AsRef<Path>,
        selection: &str,
        variable_name: &str,
    ) -> RefactoringOutcome {
        self.execute(
            file.as_ref(),
            &IntroduceVariable::new(selection, variable_name),
        )
    }

    /// Rename a variable throughout its scope.
    pub fn rename_variable(
        &self,
        file: impl AsRef<Path>,
        selection: &str,
        old_name: &str,
        new_name: &str,
    ) -> RefactoringOutcome {
        self.execute(
            file.as_ref(),
            &RenameVariable::new(selection, old_name, new_name),
        )
    }

    /// Run an operation and write the result back through the store.
    pub fn execute(&self, file: &Path, op: &dyn Refactoring) -> RefactoringOutcome {
        self.dispatch(file, op, true)
    }

    /// Run an operation without writing; the outcome carries the rewritten
    /// code for previews and dry runs.
    pub fn preview(&self, file: &Path, op: &dyn Refactoring) -> RefactoringOutcome {
        self.dispatch(file, op, false)
    }

    fn dispatch(&self, file: &Path, op: &dyn Refactoring, write: bool) -> RefactoringOutcome {
        debug!(operation = op.name(), file = %file.display(), write, "applying refactoring");
        match self.run(file, op, write) {
            Ok((code, message)) => {
                let message = format!("{message} in {}", file.display());
                RefactoringOutcome::success(file, code, message)
            }
            Err(err) => {
                debug!(operation = op.name(), error = %err, "refactoring failed");
                RefactoringOutcome::failure(err)
            }
        }
    }

    fn run(&self, file: &Path, op: &dyn Refactoring, write: bool) -> Result<(String, String)> {
        op.validate()?;

        if !self.store.exists(file) {
            return Err(RefactorError::FileNotFound(file.to_path_buf()));
        }
        let source = self.store.read(file)?;
        let program = self.parser.parse(&source)?;

        let (program, message) = op.apply(program)?;

        let code = self.printer.print(&program);
        if write {
            self.store.write(file, &code)?;
        }
        Ok((code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn engine_with(path: &str, source: &str) -> Engine<PhpParser, PhpPrinter, MemoryStore> {
        let store = MemoryStore::new();
        store.insert(path, source);
        Engine::with_collaborators(PhpParser::new(), PhpPrinter::new(), store)
    }

    #[test]
    fn test_missing_file_fails_before_parse() {
        let engine = Engine::with_collaborators(PhpParser::new(), PhpPrinter::new(), MemoryStore::new());
        let outcome = engine.rename_variable("gone.php", "3", "a", "b");
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("File not found: gone.php"));
    }

    #[test]
    fn test_input_error_precedes_file_access() {
        // The file does not exist, but the range error wins: validation runs
        // before any store call.
        let engine = Engine::with_collaborators(PhpParser::new(), PhpPrinter::new(), MemoryStore::new());
        let outcome = engine.extract_method("gone.php", "nope", "helper");
        assert!(!outcome.success);
        assert!(
            outcome
                .error
                .unwrap()
                .starts_with("Invalid selection range format")
        );
    }

    #[test]
    fn test_parse_error_leaves_file_untouched() {
        let engine = engine_with("bad.php", "<?php\n$x = ;");
        let outcome = engine.extract_variable("bad.php", "2:6", "tmp");
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().starts_with("Parse error:"));
        assert_eq!(
            engine.store.get(Path::new("bad.php")).unwrap(),
            "<?php\n$x = ;"
        );
    }

    #[test]
    fn test_execute_writes_and_preview_does_not() {
        let source = "<?php\n$result = 1 + 2;";
        let engine = engine_with("calc.php", source);

        let outcome = engine.preview(
            Path::new("calc.php"),
            &IntroduceVariable::new("2", "sum"),
        );
        assert!(outcome.success);
        assert!(outcome.code.as_deref().unwrap().contains("$sum = 1 + 2;"));
        assert_eq!(engine.store.get(Path::new("calc.php")).unwrap(), source);

        let outcome = engine.introduce_variable("calc.php", "2", "sum");
        assert!(outcome.success);
        assert_eq!(
            engine.store.get(Path::new("calc.php")).unwrap(),
            "<?php\n\n$sum = 1 + 2;\n$result = $sum;\n"
        );
        assert!(
            outcome
                .message
                .unwrap()
                .ends_with("'$sum' at 2 in calc.php")
        );
    }

    #[test]
    fn test_failed_transform_leaves_file_untouched() {
        let source = "<?php\n$x = 1;\n$y = 2;";
        let engine = engine_with("flat.php", source);
        // No class anywhere: extraction must fail and the file must keep its
        // original contents.
        let outcome = engine.extract_method("flat.php", "2-3", "helper");
        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Can only extract methods within a class")
        );
        assert_eq!(engine.store.get(Path::new("flat.php")).unwrap(), source);
    }
}
