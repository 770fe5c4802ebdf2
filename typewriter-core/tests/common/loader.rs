//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// A single test case from a fixture file.
///
/// A case either lists the expected units (`chars` and/or `nodes`) or names
/// the `error` code the markup must be rejected with.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub html: String,
    /// Expected character-granular units
    #[serde(default)]
    pub chars: Option<Vec<String>>,
    /// Expected node-granular units
    #[serde(default)]
    pub nodes: Option<Vec<String>>,
    /// Fully revealed output when it differs from `html` (normalization)
    #[serde(default)]
    pub output: Option<String>,
    /// Expected `ParseErrorCode`, by its Debug name
    #[serde(default)]
    pub error: Option<String>,
}

impl TestCase {
    /// What the concatenated units must equal.
    pub fn expected_output(&self) -> &str {
        self.output.as_deref().unwrap_or(&self.html)
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
