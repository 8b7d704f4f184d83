//! CLI for the php-refactor engine.

use anyhow::Result;
use clap::{Parser, Subcommand};
use php_refactor::diff::{DiffSummary, unified_diff};
use php_refactor::ops::{
    Engine, ExtractMethod, ExtractVariable, IntroduceVariable, Refactoring, RefactoringOutcome,
    RenameVariable,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "php-refactor")]
#[command(author, version, about = "AST-based PHP refactoring tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Preview changes as a diff without writing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print the operation result as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a block of code into a separate method
    ExtractMethod {
        /// Path to the PHP file
        file: PathBuf,

        /// Line range, e.g. '14-18' or '14'
        #[arg(short, long)]
        range: String,

        /// Name for the new method
        #[arg(short, long)]
        name: String,
    },

    /// Extract an expression into a named variable
    ExtractVariable {
        /// Path to the PHP file
        file: PathBuf,

        /// Position, e.g. '12:8' or '12'
        #[arg(short, long)]
        range: String,

        /// Name for the new variable (with or without $ prefix)
        #[arg(short, long)]
        name: String,
    },

    /// Introduce a named variable for an expression in a range
    IntroduceVariable {
        /// Path to the PHP file
        file: PathBuf,

        /// Selection range, e.g. '12:8-12:19' or '12'
        #[arg(short, long)]
        range: String,

        /// Name for the new variable (with or without $ prefix)
        #[arg(short, long)]
        name: String,
    },

    /// Rename a variable throughout its scope
    RenameVariable {
        /// Path to the PHP file
        file: PathBuf,

        /// Line anchoring the scope, e.g. '12' or '12:4'
        #[arg(short, long)]
        range: String,

        /// Current variable name (with or without $ prefix)
        #[arg(short, long)]
        from: String,

        /// New variable name (with or without $ prefix)
        #[arg(short, long)]
        to: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (file, operation): (PathBuf, Box<dyn Refactoring>) = match cli.command {
        Commands::ExtractMethod { file, range, name } => {
            (file, Box::new(ExtractMethod::new(range, name)))
        }
        Commands::ExtractVariable { file, range, name } => {
            (file, Box::new(ExtractVariable::new(range, name)))
        }
        Commands::IntroduceVariable { file, range, name } => {
            (file, Box::new(IntroduceVariable::new(range, name)))
        }
        Commands::RenameVariable {
            file,
            range,
            from,
            to,
        } => (file, Box::new(RenameVariable::new(range, from, to))),
    };

    let engine = Engine::new();
    let outcome = if cli.dry_run {
        engine.preview(&file, operation.as_ref())
    } else {
        engine.execute(&file, operation.as_ref())
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    report(&file, &outcome, cli.dry_run)
}

fn report(file: &std::path::Path, outcome: &RefactoringOutcome, dry_run: bool) -> Result<()> {
    if !outcome.success {
        eprintln!("{}", outcome.error.as_deref().unwrap_or("unknown error"));
        std::process::exit(1);
    }

    if dry_run {
        let original = std::fs::read_to_string(file)?;
        let modified = outcome.code.as_deref().unwrap_or_default();
        print!("{}", unified_diff(&original, modified, file));
        println!("\n{}", DiffSummary::from_diff(&original, modified));
    } else if let Some(message) = &outcome.message {
        println!("{message}");
    }

    Ok(())
}
