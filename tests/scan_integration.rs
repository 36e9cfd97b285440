//! Scanner integration tests
//!
//! These tests drive the library end to end:
//! - The fixture DAG tree under tests/fixtures/dags
//! - Good and malformed files side by side
//! - Literal reconstruction edge cases through whole files

use dagscan::{
    analyze_source, AnalysisError, ExtractionRecord, FileScanner, Markers, ScanConfig, TaskPath,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use yare::parameterized;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dags")
}

fn record(file: &Path, workflow: &str, path: &str) -> ExtractionRecord {
    ExtractionRecord {
        source_file: file.to_path_buf(),
        workflow_name: workflow.to_string(),
        artifact_path: path.to_string(),
    }
}

fn task_paths(source: &str) -> Vec<TaskPath> {
    analyze_source(source, &Markers::default()).expect("fixture source should parse")
}

#[test]
fn test_fixture_tree() {
    let root = fixture_root();
    let report = FileScanner::new(ScanConfig::default())
        .scan_directory(&root)
        .unwrap();

    let billing = root.join("billing/billing.py");
    let orders = root.join("orders/orders_etl.py");
    assert_eq!(
        report.records,
        vec![
            record(&billing, "billing_etl", "etl/billing/aggregate.py"),
            record(&billing, "invoices_etl", "etl/invoices/build.py"),
            record(&orders, "orders_etl", "etl/orders/extract.py"),
            record(&orders, "orders_etl", "etl/orders/load.py"),
        ]
    );

    assert_eq!(report.files_scanned, 5);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, root.join("legacy/broken.py"));
}

#[test]
fn test_fixture_workflow_inventory() {
    let report = FileScanner::new(ScanConfig::default())
        .scan_directory(&fixture_root())
        .unwrap();

    let workflows = report.workflows();
    assert_eq!(
        workflows.keys().copied().collect::<Vec<_>>(),
        vec!["billing_etl", "invoices_etl", "orders_etl"]
    );
    assert_eq!(
        workflows["orders_etl"],
        vec!["etl/orders/extract.py", "etl/orders/load.py"]
    );
}

#[test]
fn test_scan_is_deterministic() {
    let scanner = FileScanner::new(ScanConfig::default());
    let first = scanner.scan_directory(&fixture_root()).unwrap();
    let second = scanner.scan_directory(&fixture_root()).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(first.skipped, second.skipped);
}

#[test]
fn test_one_good_one_invalid_file() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.py");
    let bad = dir.path().join("invalid.py");
    fs::write(
        &good,
        "w = DAG(\"orders_etl\")\nKubernetesPodOperator(dag=w, arguments=[\"a\",\"b\",\"c\",\"etl/orders/load.py\"])\n",
    )
    .unwrap();
    fs::write(&bad, "class :\n  nope(\n").unwrap();

    let report = FileScanner::new(ScanConfig::default())
        .scan_directory(dir.path())
        .unwrap();

    assert_eq!(
        report.records,
        vec![record(&good, "orders_etl", "etl/orders/load.py")]
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, bad);
}

#[test]
fn test_missing_root_is_fatal() {
    let result = FileScanner::new(ScanConfig::default()).scan_directory(Path::new("/nonexistent/dags"));
    match result {
        Err(AnalysisError::PathNotFound(path)) => {
            assert_eq!(path, PathBuf::from("/nonexistent/dags"));
        }
        other => panic!("Expected PathNotFound, got {:?}", other),
    }
}

#[test]
fn test_orders_scenario() {
    let paths = task_paths(
        "w = DAG(\"orders_etl\", schedule=None)\nKubernetesPodOperator(dag=w, arguments=[\"a\",\"b\",\"c\",\"etl/orders/load.py\"])\n",
    );
    assert_eq!(
        paths,
        vec![TaskPath {
            workflow_name: "orders_etl".to_string(),
            path: "etl/orders/load.py".to_string(),
        }]
    );
}

#[test]
fn test_orders_scenario_with_dynamic_suffix() {
    let paths = task_paths(
        "w = DAG(\"orders_etl\", schedule=None)\nKubernetesPodOperator(dag=w, arguments=[\"a\",\"b\",\"c\",\"etl/\" + some_variable])\n",
    );
    assert!(paths.is_empty());
}

#[parameterized(
    plain = { "'etl/x.py'", Some("etl/x.py") },
    concatenated = { "'etl/' + 'x.py'", Some("etl/x.py") },
    grouped_right = { "'etl/' + ('a/' + 'x.py')", Some("etl/a/x.py") },
    implicit = { "'etl/' 'x.py'", Some("etl/x.py") },
    variable = { "path", None },
    f_string = { "f'etl/{name}.py'", None },
    format_call = { "'etl/{}.py'.format(name)", None },
    os_path_join = { "os.path.join('etl', 'x.py')", None },
    wrong_prefix = { "'tmp/x.py'", None },
)]
fn test_fourth_argument_shapes(expr: &str, expected: Option<&str>) {
    let source = format!(
        "w = DAG('orders_etl')\nKubernetesPodOperator(dag=w, arguments=['a', 'b', 'c', {}])\n",
        expr
    );
    let found: Vec<String> = task_paths(&source).into_iter().map(|p| p.path).collect();
    let expected: Vec<String> = expected.into_iter().map(str::to_string).collect();
    assert_eq!(found, expected);
}

#[parameterized(
    grouped_workflow_keyword = { "w = DAG('n')", "dag=(w), arguments=['a', 'b', 'c', 'etl/x.py']" },
    grouped_argument_list = { "w = DAG('n')", "dag=w, arguments=(['a', 'b', 'c', 'etl/x.py'])" },
    grouped_declaration_value = { "w = (DAG('n'))", "dag=w, arguments=['a', 'b', 'c', 'etl/x.py']" },
    grouped_declaration_target = { "(w) = DAG('n')", "dag=w, arguments=['a', 'b', 'c', 'etl/x.py']" },
)]
fn test_grouping_parentheses_are_transparent(declaration: &str, task_arguments: &str) {
    let source = format!("{}\nKubernetesPodOperator({})\n", declaration, task_arguments);
    assert_eq!(
        task_paths(&source),
        vec![TaskPath {
            workflow_name: "n".to_string(),
            path: "etl/x.py".to_string(),
        }]
    );
}

#[parameterized(
    print_statement = { "print 'hello'" },
    exec_statement = { "exec 'x = 1'" },
    keyword_before_positional = { "f(a=1, b)" },
)]
fn test_non_python3_file_is_skipped(line: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.py");
    fs::write(
        &path,
        format!(
            "{}\nw = DAG('n')\nKubernetesPodOperator(dag=w, arguments=['a', 'b', 'c', 'etl/x.py'])\n",
            line
        ),
    )
    .unwrap();

    let report = FileScanner::new(ScanConfig::default())
        .scan_directory(dir.path())
        .unwrap();
    assert!(report.records.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, path);
}

#[test]
fn test_rebinding_between_files_does_not_leak() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.py"), "shared = DAG('from_a')\n").unwrap();
    fs::write(
        dir.path().join("b.py"),
        "KubernetesPodOperator(dag=shared, arguments=['a', 'b', 'c', 'etl/b.py'])\n",
    )
    .unwrap();

    let report = FileScanner::new(ScanConfig::default())
        .scan_directory(dir.path())
        .unwrap();
    assert!(report.records.is_empty());
    assert_eq!(report.files_scanned, 2);
}
