//! Integration tests for the php-refactor engine.

use php_refactor::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CALCULATOR: &str = "<?php\n\nclass Calculator\n{\n    public function calculate()\n    {\n        $x = 5;\n        $result = $x * 2;\n        return $result;\n    }\n}\n";

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_round_trip_without_transform() {
    let parser = PhpParser::new();
    let printer = PhpPrinter::new();

    let tree = parser.parse(CALCULATOR).unwrap();
    let printed = printer.print(&tree);
    let reparsed = parser.parse(&printed).unwrap();

    assert_eq!(printed, printer.print(&reparsed));
}

#[test]
fn test_extract_method_worked_example() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Calculator.php", CALCULATOR);

    let outcome = Engine::new().extract_method(&file, "8-8", "double");
    assert!(outcome.success, "{:?}", outcome.error);

    let expected = "<?php\n\nclass Calculator\n{\n    public function calculate()\n    {\n        $x = 5;\n        $result = $this->double($x);\n        return $result;\n    }\n    private function double($x)\n    {\n        $result = $x * 2;\n        return $result;\n    }\n}\n";
    assert_eq!(fs::read_to_string(&file).unwrap(), expected);
    assert_eq!(outcome.code.as_deref(), Some(expected));
}

#[test]
fn test_extract_method_without_used_after_has_no_return() {
    let source = "<?php\n\nclass Greeter\n{\n    public function greet()\n    {\n        $name = 'world';\n        echo 'hello ' . $name;\n    }\n}\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Greeter.php", source);

    let outcome = Engine::new().extract_method(&file, "8-8", "emit");
    assert!(outcome.success, "{:?}", outcome.error);

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(rewritten.contains("$this->emit($name);"));
    assert!(rewritten.contains("private function emit($name)"));
    // No value flows back out of the block.
    assert!(!rewritten.contains("return"));
    assert!(!rewritten.contains("= $this->emit"));
}

#[test]
fn test_extract_method_result_reparses() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Calculator.php", CALCULATOR);

    let outcome = Engine::new().extract_method(&file, "7-8", "setup");
    assert!(outcome.success, "{:?}", outcome.error);

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(PhpParser::new().parse(&rewritten).is_ok());
}

#[test]
fn test_introduce_variable_worked_example() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "sum.php", "<?php\n$result = 1 + 2;\n");

    let outcome = Engine::new().introduce_variable(&file, "2:11-2:15", "sum");
    assert!(outcome.success, "{:?}", outcome.error);

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "<?php\n\n$sum = 1 + 2;\n$result = $sum;\n"
    );
}

#[test]
fn test_extract_variable_result_reparses_and_references_new_name() {
    let source = "<?php\n\nclass Price\n{\n    public function total($net)\n    {\n        return $net * 1.2;\n    }\n}\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Price.php", source);

    let outcome = Engine::new().extract_variable(&file, "7:16", "$gross");
    assert!(outcome.success, "{:?}", outcome.error);

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(rewritten.contains("$gross = $net * 1.2;"));
    assert!(rewritten.contains("return $gross;"));
    assert!(PhpParser::new().parse(&rewritten).is_ok());
}

#[test]
fn test_rename_scoped_to_one_function_leaves_sibling_alone() {
    let source = "<?php\nfunction first()\n{\n    $count = 1;\n    return $count;\n}\nfunction second()\n{\n    $count = 2;\n    return $count;\n}\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "siblings.php", source);

    let outcome = Engine::new().rename_variable(&file, "4", "$count", "$total");
    assert!(outcome.success, "{:?}", outcome.error);

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(rewritten.contains("function first()\n{\n    $total = 1;\n    return $total;\n}"));
    assert!(rewritten.contains("function second()\n{\n    $count = 2;\n    return $count;\n}"));
}

#[test]
fn test_rename_at_top_level_skips_nested_functions() {
    let source = "<?php\n$mode = 1;\nfunction f()\n{\n    $mode = 2;\n    return $mode;\n}\necho $mode;\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "global.php", source);

    let outcome = Engine::new().rename_variable(&file, "2", "mode", "state");
    assert!(outcome.success, "{:?}", outcome.error);

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(rewritten.contains("$state = 1;"));
    assert!(rewritten.contains("echo $state;"));
    assert!(rewritten.contains("$mode = 2;"));
    assert!(rewritten.contains("return $mode;"));
}

#[test]
fn test_operations_chain_across_fresh_parses() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Calculator.php", CALCULATOR);
    let engine = Engine::new();

    let outcome = engine.extract_method(&file, "8-8", "double");
    assert!(outcome.success, "{:?}", outcome.error);

    // The call-site assignment now sits on line 8 of the rewritten file.
    let outcome = engine.rename_variable(&file, "8", "$result", "$value");
    assert!(outcome.success, "{:?}", outcome.error);

    let rewritten = fs::read_to_string(&file).unwrap();
    assert!(rewritten.contains("$value = $this->double($x);"));
    assert!(rewritten.contains("return $value;"));
    // The extracted method is its own scope and keeps its local name.
    assert!(rewritten.contains("$result = $x * 2;\n        return $result;"));
}

// Boundary cases: every failure leaves the file byte-identical.

#[test]
fn test_reversed_range_is_input_error_and_no_write() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Calculator.php", CALCULATOR);

    let outcome = Engine::new().extract_method(&file, "5-3", "helper");
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Start line (5) must be less than or equal to end line (3)")
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), CALCULATOR);
}

#[test]
fn test_range_with_no_statement_is_not_found() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Calculator.php", CALCULATOR);

    let outcome = Engine::new().extract_method(&file, "20-25", "helper");
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Could not find statements between lines 20 and 25")
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), CALCULATOR);
}

#[test]
fn test_extraction_outside_class_is_not_found() {
    let source = "<?php\nfunction run()\n{\n    $x = 1;\n}\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "run.php", source);

    let outcome = Engine::new().extract_method(&file, "4-4", "helper");
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Can only extract methods within a class")
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), source);
}

#[test]
fn test_extract_variable_on_bare_reference_is_not_found() {
    let source = "<?php\n$y = $x;\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "bare.php", source);

    let outcome = Engine::new().extract_variable(&file, "2:6", "tmp");
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Could not find expression at line 2, column 6")
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), source);
}

#[test]
fn test_rename_to_invalid_identifier_is_input_error() {
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "Calculator.php", CALCULATOR);

    let outcome = Engine::new().rename_variable(&file, "8", "result", "123bad");
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Invalid variable name: 123bad"));
    assert_eq!(fs::read_to_string(&file).unwrap(), CALCULATOR);
}

#[test]
fn test_missing_file_is_not_found_before_parse() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.php");

    let outcome = Engine::new().rename_variable(&missing, "3", "a", "b");
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some(format!("File not found: {}", missing.display()).as_str())
    );
}

#[test]
fn test_parse_error_is_surfaced_and_no_write() {
    let source = "<?php\n$x = ;\n";
    let dir = TempDir::new().unwrap();
    let file = write_fixture(&dir, "broken.php", source);

    let outcome = Engine::new().extract_variable(&file, "2:6", "tmp");
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_deref(),
        Some("Parse error: Syntax error, unexpected ';' on line 2")
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), source);
}
