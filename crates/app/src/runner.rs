//! Case selection, execution and reporting.

use std::time::{Duration, Instant};

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Tag, TestOutcome, TestResults};
use futures::{StreamExt, stream};

use crate::suites::{SuiteContext, TestCase};

/// Reason recorded for user management cases when no token is available.
pub const MISSING_TOKEN: &str = "GoRest token not configured";

/// Keeps the cases carrying `tag` and, when `ids` is not empty, whose id is listed.
#[must_use]
pub fn select(cases: Vec<TestCase>, tag: Option<Tag>, ids: &[String]) -> Vec<TestCase> {
    cases
        .into_iter()
        .filter(|case| tag.is_none_or(|tag| case.meta.has_tag(tag)))
        .filter(|case| {
            ids.is_empty() || ids.iter().any(|id| id.eq_ignore_ascii_case(&case.meta.id))
        })
        .collect()
}

/// Runs cases against a shared [`SuiteContext`].
///
/// Up to `workers` cases run at once. Results keep registration order.
pub struct SuiteRunner<'a> {
    ctx: &'a SuiteContext,
    workers: usize,
}

impl<'a> SuiteRunner<'a> {
    /// Creates a runner sized by the configured worker count.
    #[must_use]
    pub fn new(ctx: &'a SuiteContext) -> Self {
        Self {
            ctx,
            workers: ctx.settings.parallel_workers.max(1),
        }
    }

    /// Overrides the number of cases run concurrently.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Runs every case and collects the results.
    ///
    /// A failing case never stops the others.
    pub async fn run(&self, cases: &[TestCase]) -> TestResults {
        let start = Instant::now();
        tracing::info!(cases = cases.len(), workers = self.workers, "Running test cases");

        let results = stream::iter(cases)
            .map(|case| self.run_case(case))
            .buffered(self.workers)
            .collect()
            .await;

        TestResults::new(results, millis(start.elapsed()))
    }

    async fn run_case(&self, case: &TestCase) -> apiprobe_domain::CaseResult {
        if case.service.requires_token() && self.ctx.settings.token().is_none() {
            tracing::info!(test_case = %case.meta.id, "Skipping: {MISSING_TOKEN}");
            return apiprobe_domain::CaseResult {
                meta: case.meta.clone(),
                outcome: TestOutcome::Skipped {
                    reason: MISSING_TOKEN.to_string(),
                },
                duration_ms: 0,
            };
        }

        let mut data = TestDataManager::new();
        let start = Instant::now();
        let outcome = match (case.body)(self.ctx, &mut data).await {
            Ok(()) => TestOutcome::Passed,
            Err(error) => {
                tracing::error!(test_case = %case.meta.id, %error, "Test case failed");
                TestOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        };
        let duration_ms = millis(start.elapsed());

        let tracked = data.cleanup_list();
        if !tracked.is_empty() {
            tracing::debug!(
                test_case = %case.meta.id,
                resources = tracked.len(),
                "Clearing tracked resources"
            );
        }
        data.clear_cleanup_list();

        apiprobe_domain::CaseResult {
            meta: case.meta.clone(),
            outcome,
            duration_ms,
        }
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// One report line per case.
#[must_use]
pub fn format_case(result: &apiprobe_domain::CaseResult) -> String {
    let line = format!(
        "[{}] {} {} ({} ms)",
        result.outcome.label(),
        result.meta.id,
        result.meta.title,
        result.duration_ms
    );
    match &result.outcome {
        TestOutcome::Passed => line,
        TestOutcome::Failed { reason } | TestOutcome::Skipped { reason } => {
            format!("{line}: {reason}")
        }
    }
}

/// Closing summary line.
#[must_use]
pub fn format_summary(results: &TestResults) -> String {
    format!(
        "{} passed, {} failed, {} skipped of {} in {} ms ({:.1}% pass rate)",
        results.passed,
        results.failed,
        results.skipped,
        results.total,
        results.duration_ms,
        results.pass_rate()
    )
}

/// Prints the per-case lines followed by the summary.
#[allow(clippy::print_stdout)]
pub fn print_results(results: &TestResults) {
    for result in &results.results {
        println!("{}", format_case(result));
    }
    println!();
    println!("{}", format_summary(results));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::suites::{CaseError, CaseFuture};
    use apiprobe_application::{ApiClient, ApiLogger};
    use apiprobe_domain::{Service, Settings, TestMeta};
    use apiprobe_infrastructure::{MemoryEventSink, ReqwestTransport};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context(settings: Settings) -> SuiteContext {
        let logger = Arc::new(ApiLogger::new(Arc::new(MemoryEventSink::new())));
        let client = ApiClient::from_settings(
            Arc::new(ReqwestTransport::new().unwrap()),
            logger,
            &settings,
        );
        SuiteContext::new(client, settings)
    }

    fn passes<'a>(_ctx: &'a SuiteContext, _data: &'a mut TestDataManager) -> CaseFuture<'a> {
        Box::pin(async { Ok(()) })
    }

    fn fails<'a>(_ctx: &'a SuiteContext, _data: &'a mut TestDataManager) -> CaseFuture<'a> {
        Box::pin(async { Err(CaseError::Check("TC_FAIL - broken".to_string())) })
    }

    fn tracks<'a>(_ctx: &'a SuiteContext, data: &'a mut TestDataManager) -> CaseFuture<'a> {
        Box::pin(async move {
            data.track_created_resource("user", json!(7), Some("gorest"));
            Ok(())
        })
    }

    fn cases() -> Vec<TestCase> {
        vec![
            TestCase::new(
                TestMeta::new("TC_PASS", "passes").tagged(Tag::Smoke),
                Service::FakeRest,
                passes,
            ),
            TestCase::new(TestMeta::new("TC_FAIL", "fails"), Service::Echo, fails),
            TestCase::new(
                TestMeta::new("TC_USER", "needs token"),
                Service::UserManagement,
                tracks,
            ),
        ]
    }

    fn ids(cases: &[TestCase]) -> Vec<&str> {
        cases.iter().map(|c| c.meta.id.as_str()).collect()
    }

    #[test]
    fn test_select_by_tag() {
        let smoke = select(cases(), Some(Tag::Smoke), &[]);
        assert_eq!(ids(&smoke), vec!["TC_PASS"]);

        let all = select(cases(), Some(Tag::Regression), &[]);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_select_by_id() {
        let picked = select(cases(), None, &["tc_fail".to_string()]);
        assert_eq!(ids(&picked), vec!["TC_FAIL"]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let ctx = context(Settings::default());
        let results = SuiteRunner::new(&ctx).run(&cases()).await;

        let labels: Vec<_> = results.results.iter().map(|r| r.outcome.label()).collect();
        assert_eq!(labels, vec!["PASS", "FAIL", "SKIP"]);
        assert_eq!(results.passed, 1);
        assert_eq!(results.failed, 1);
        assert_eq!(results.skipped, 1);
        assert!(!results.all_passed());
    }

    #[tokio::test]
    async fn test_missing_token_skips_user_management() {
        let ctx = context(Settings::default());
        let results = SuiteRunner::new(&ctx).run(&cases()[2..]).await;

        assert_eq!(
            results.results[0].outcome,
            TestOutcome::Skipped {
                reason: MISSING_TOKEN.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_token_runs_user_management() {
        let settings = Settings::default().with_token_override(Some("secret".to_string()));
        let ctx = context(settings);
        let results = SuiteRunner::new(&ctx).with_workers(1).run(&cases()[2..]).await;

        assert_eq!(results.results[0].outcome, TestOutcome::Passed);
        assert!(results.all_passed());
    }

    #[test]
    fn test_report_lines() {
        let failed = apiprobe_domain::CaseResult {
            meta: TestMeta::new("TC_FAIL", "fails"),
            outcome: TestOutcome::Failed {
                reason: "TC_FAIL - broken".to_string(),
            },
            duration_ms: 12,
        };
        assert_eq!(
            format_case(&failed),
            "[FAIL] TC_FAIL fails (12 ms): TC_FAIL - broken"
        );

        let results = TestResults::new(vec![failed], 20);
        assert_eq!(
            format_summary(&results),
            "0 passed, 1 failed, 0 skipped of 1 in 20 ms (0.0% pass rate)"
        );
    }
}
