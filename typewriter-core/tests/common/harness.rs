//! Test harness for running fixtures with stochastic variations

use crate::common::{Gen, TestCase};
use typewriter_core::{tokenize, Granularity, ParseError};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub seed: u64,
    pub errors: Vec<String>,
}

fn units(input: &str, granularity: Granularity) -> Result<Vec<String>, ParseError> {
    tokenize(input, granularity).map(|seq| seq.iter().map(|u| u.to_string()).collect())
}

fn expected_for<'c>(case: &'c TestCase) -> Vec<(Granularity, &'c [String])> {
    let mut out = Vec::new();
    if let Some(chars) = &case.chars {
        out.push((Granularity::Character, chars.as_slice()));
    }
    if let Some(nodes) = &case.nodes {
        out.push((Granularity::Node, nodes.as_slice()));
    }
    out
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let mut errors = Vec::new();

    if let Some(code) = &case.error {
        match tokenize(&case.html, Granularity::Character) {
            Ok(_) => errors.push(format!("expected error {}, markup was accepted", code)),
            Err(e) if format!("{:?}", e.code) != *code => {
                errors.push(format!("expected error {}, got {:?} ({})", code, e.code, e))
            }
            Err(_) => {}
        }
    }

    for (granularity, expected) in expected_for(case) {
        match units(&case.html, granularity) {
            Ok(actual) => {
                if actual.len() != expected.len() {
                    errors.push(format!(
                        "{:?}: unit count mismatch: expected {}, got {}",
                        granularity,
                        expected.len(),
                        actual.len()
                    ));
                }
                for (i, (act, exp)) in actual.iter().zip(expected).enumerate() {
                    if act != exp {
                        errors.push(format!("{:?} unit {}: expected {:?}, got {:?}", granularity, i, exp, act));
                    }
                }
                let joined = actual.concat();
                if joined != case.expected_output() {
                    errors.push(format!(
                        "{:?}: concatenation {:?} != expected output {:?}",
                        granularity,
                        joined,
                        case.expected_output()
                    ));
                }
            }
            Err(e) => errors.push(format!("{:?}: unexpected error: {}", granularity, e)),
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input: case.html.clone(),
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 40% chance of a fragment before
/// - 30% chance of wrapping in a container element (geometric depth)
/// - 40% chance of a fragment after
///
/// Expected units must then appear as one contiguous run. Error cases must
/// still be rejected, though possibly with a different code.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut input = String::new();

    if gen.chance(0.4) {
        input.push_str(&gen.fragment());
    }

    let mut wrappers = Vec::new();
    if gen.chance(0.3) {
        for _ in 0..1 + gen.geometric(0.5) {
            wrappers.push(gen.container());
        }
    }
    for name in &wrappers {
        input.push_str(&format!("<{}>", name));
    }
    input.push_str(&case.html);
    for name in wrappers.iter().rev() {
        input.push_str(&format!("</{}>", name));
    }

    if gen.chance(0.4) {
        input.push_str(&gen.fragment());
    }

    let mut errors = Vec::new();

    if case.error.is_some() {
        if tokenize(&input, Granularity::Character).is_ok() {
            errors.push("malformed markup accepted inside context".to_string());
        }
    }

    for (granularity, expected) in expected_for(case) {
        match units(&input, granularity) {
            Ok(actual) => {
                let found = expected.is_empty()
                    || actual.windows(expected.len()).any(|w| w == expected);
                if !found {
                    errors.push(format!(
                        "{:?}: expected run {:?} not found in {:?}",
                        granularity, expected, actual
                    ));
                }
            }
            Err(e) => errors.push(format!("{:?}: unexpected error: {}", granularity, e)),
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set TYPEWRITER_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", self.input);
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
