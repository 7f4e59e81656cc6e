use std::collections::BTreeSet;
use std::path::Path;

use zinc_cpu_validation::{load_cases, run_case, vector_files};

#[test]
fn test_all_z80_opcodes() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/z80/v1");
    if !test_dir.exists() {
        eprintln!("No SingleStepTests data at {}; skipping", test_dir.display());
        eprintln!("Run: git submodule update --init cpu-validation/test_data/z80");
        return;
    }

    let files = vector_files(&test_dir).expect("Failed to read test directory");
    let mut total_tests = 0;
    let mut failed_tests = 0;
    let mut failed_files = BTreeSet::new();
    let mut first_failures: Vec<String> = Vec::new();

    for path in &files {
        let tests = load_cases(path)
            .unwrap_or_else(|e| panic!("Failed to load {path:?}: {e}"));
        assert!(!tests.is_empty(), "Test file {path:?} is empty");

        for tc in &tests {
            if let Err(err) = run_case(tc) {
                failed_tests += 1;
                if failed_files.insert(path.clone()) && first_failures.len() < 50 {
                    first_failures.push(err);
                }
            }
        }
        total_tests += tests.len();
    }

    eprintln!(
        "\nZ80 SingleStepTests: {} passed, {} failed across {} files",
        total_tests - failed_tests,
        failed_tests,
        files.len()
    );
    for err in &first_failures {
        eprintln!("  {err}");
    }

    assert_eq!(
        failed_tests,
        0,
        "{} tests failed across {} files",
        failed_tests,
        failed_files.len()
    );
}
