//! Error responses.

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Headers, Service, TestMeta};
use apiprobe_infrastructure::testing::assertions::assert_status_code;
use serde_json::json;

use super::{CaseFuture, CaseResult, SuiteContext, TestCase, ensure, json_body};

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            TestMeta::new("TC_ERROR_001", "Resource not found"),
            Service::FakeRest,
            resource_not_found,
        ),
        TestCase::new(
            TestMeta::new("TC_ERROR_002", "Method not allowed"),
            Service::Echo,
            method_not_allowed,
        ),
        TestCase::new(
            TestMeta::new("TC_ERROR_003", "Invalid URL path"),
            Service::FakeRest,
            invalid_url_path,
        ),
    ]
}

/// GETs `path` and expects a 404 with an empty JSON object.
async fn expect_empty_not_found(ctx: &SuiteContext, path: &str, tc: &str) -> CaseResult {
    let response = ctx
        .client
        .get(ctx.url(Service::FakeRest, path), Headers::new(), tc)
        .await?;

    assert_status_code(&response, 404, Some(tc))?;

    let body = json_body(&response)?;
    ensure(body == json!({}), || {
        format!("{tc} - Expected empty response body")
    })
}

fn resource_not_found<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(expect_empty_not_found(ctx, "posts/99999", "TC_ERROR_001"))
}

fn method_not_allowed<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_ERROR_002";
        let response = ctx
            .client
            .delete(ctx.url(Service::Echo, "get"), Headers::new(), tc)
            .await?;

        assert_status_code(&response, 405, Some(tc))?;
        Ok(())
    })
}

fn invalid_url_path<'a>(ctx: &'a SuiteContext, _data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(expect_empty_not_found(ctx, "invalid-endpoint", "TC_ERROR_003"))
}
