use immuorm_dialect_immudb::{Config, FloatStorage, ImmudbDialect};
use immuorm_testkit::{TestResult, load_type_cases_from_str, run_type_case};

const TYPE_CASES_YAML: &str = include_str!("testdata/type_cases.yaml");

fn dialect_for(float_storage: Option<&str>) -> ImmudbDialect {
    let float_storage = float_storage
        .map(|name| FloatStorage::parse(name).expect("testcase float_storage must be known"))
        .unwrap_or_default();
    ImmudbDialect::new(Config {
        float_storage,
        ..Config::default()
    })
}

#[test]
fn yaml_type_cases_render_expected_clauses() {
    let cases = load_type_cases_from_str(TYPE_CASES_YAML).expect("type cases must parse");
    assert!(!cases.is_empty());

    let failures = cases
        .iter()
        .filter_map(|(name, case)| {
            let dialect = dialect_for(case.float_storage.as_deref());
            match run_type_case(&dialect, case) {
                TestResult::Passed => None,
                TestResult::Failed(message) => Some(format!("{name}: {message}")),
            }
        })
        .collect::<Vec<_>>();

    assert!(failures.is_empty(), "failing type cases:\n{}", failures.join("\n"));
}

#[test]
fn type_mapping_is_deterministic() {
    let cases = load_type_cases_from_str(TYPE_CASES_YAML).expect("type cases must parse");

    for case in cases.values() {
        let dialect = dialect_for(case.float_storage.as_deref());
        assert_eq!(run_type_case(&dialect, case), run_type_case(&dialect, case));
    }
}
