//! Test case metadata, assertion failures and run results.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Declarative tag attached to a test case at definition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Critical-path checks.
    Smoke,
    /// Part of the full regression run.
    Regression,
    /// Latency and throughput checks.
    Performance,
}

impl Tag {
    /// Returns the tag name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Regression => "regression",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "smoke" => Ok(Self::Smoke),
            "regression" => Ok(Self::Regression),
            "performance" => Ok(Self::Performance),
            other => Err(DomainError::UnknownTag(other.to_string())),
        }
    }
}

/// Static description of a test case.
///
/// Every case carries [`Tag::Regression`]; further tags are declared
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMeta {
    /// Identifier such as `TC_AUTH_001`.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Tags used for selection.
    pub tags: BTreeSet<Tag>,
}

impl TestMeta {
    /// Creates metadata tagged `regression`.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: BTreeSet::from([Tag::Regression]),
        }
    }

    /// Adds a tag (builder pattern).
    #[must_use]
    pub fn tagged(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Returns true if the case carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Set of acceptable status codes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusExpectation(pub Vec<u16>);

impl StatusExpectation {
    /// Check if a status code is in the set.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        self.0.contains(&status)
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        let codes: Vec<_> = self.0.iter().map(ToString::to_string).collect();
        format!("one of [{}]", codes.join(", "))
    }
}

/// A failed check, tagged with the test case that ran it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("Test: {} - {message}", .test_case.as_deref().unwrap_or("-"))]
pub struct AssertionError {
    /// Test case identifier supplied by the caller.
    pub test_case: Option<String>,
    /// Name of the check that failed (e.g. `status_code`).
    pub check: String,
    /// Expected vs actual description.
    pub message: String,
}

impl AssertionError {
    /// Creates a new assertion failure.
    #[must_use]
    pub fn new(test_case: Option<&str>, check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            test_case: test_case.map(ToString::to_string),
            check: check.into(),
            message: message.into(),
        }
    }
}

/// A side effect created on a live service during a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedResource {
    /// Resource kind (e.g. `user`).
    pub resource_type: String,
    /// Identifier assigned by the service.
    pub resource_id: serde_json::Value,
    /// Service that owns the resource.
    pub service: Option<String>,
}

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    /// All checks passed.
    Passed,
    /// A check, call or validation failed.
    Failed {
        /// Failure description.
        reason: String,
    },
    /// The case did not run.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
}

impl TestOutcome {
    /// Short label for reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed { .. } => "FAIL",
            Self::Skipped { .. } => "SKIP",
        }
    }
}

/// Result of running one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// The case that ran.
    pub meta: TestMeta,
    /// What happened.
    pub outcome: TestOutcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Results from running a set of test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResults {
    /// Individual case results in run order.
    pub results: Vec<CaseResult>,
    /// Number of cases run or skipped.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of skipped cases.
    pub skipped: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(results: Vec<CaseResult>, duration_ms: u64) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.outcome == TestOutcome::Passed)
            .count();
        let skipped = results
            .iter()
            .filter(|r| matches!(r.outcome, TestOutcome::Skipped { .. }))
            .count();
        let failed = total - passed - skipped;

        Self {
            results,
            total,
            passed,
            failed,
            skipped,
            duration_ms,
        }
    }

    /// Check if no case failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate of executed (non-skipped) cases as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            100.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn case(outcome: TestOutcome) -> CaseResult {
        CaseResult {
            meta: TestMeta::new("TC_X", "x"),
            outcome,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_meta_always_regression() {
        let meta = TestMeta::new("TC_AUTH_001", "Valid login").tagged(Tag::Smoke);
        assert!(meta.has_tag(Tag::Regression));
        assert!(meta.has_tag(Tag::Smoke));
        assert!(!meta.has_tag(Tag::Performance));
    }

    #[test]
    fn test_tag_from_str() {
        assert_eq!("Smoke".parse::<Tag>().unwrap(), Tag::Smoke);
        assert!("nightly".parse::<Tag>().is_err());
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation(vec![201, 400]);
        assert!(exp.matches(201));
        assert!(exp.matches(400));
        assert!(!exp.matches(500));
        assert_eq!(exp.description(), "one of [201, 400]");
    }

    #[test]
    fn test_assertion_error_display() {
        let err = AssertionError::new(Some("TC_AUTH_003"), "status_code", "Expected status code 400, got 200");
        assert_eq!(
            err.to_string(),
            "Test: TC_AUTH_003 - Expected status code 400, got 200"
        );
    }

    #[test]
    fn test_results_counts() {
        let results = TestResults::new(
            vec![
                case(TestOutcome::Passed),
                case(TestOutcome::Failed {
                    reason: "boom".to_string(),
                }),
                case(TestOutcome::Skipped {
                    reason: "no token".to_string(),
                }),
            ],
            100,
        );

        assert_eq!(results.total, 3);
        assert_eq!(results.passed, 1);
        assert_eq!(results.failed, 1);
        assert_eq!(results.skipped, 1);
        assert!(!results.all_passed());
        assert_eq!(results.pass_rate(), 50.0);
    }
}
