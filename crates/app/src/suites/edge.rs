//! Boundary payloads.

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Headers, Service, TestMeta};
use apiprobe_infrastructure::testing::assertions::{assert_status_code, assert_status_in};
use serde_json::{Value, json};

use super::{CaseFuture, SuiteContext, TestCase, ensure, json_body};

const LONG_TITLE_LEN: usize = 500;
const LONG_BODY_LEN: usize = 2000;

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            TestMeta::new("TC_EDGE_001", "Empty request body"),
            Service::FakeRest,
            empty_request_body,
        ),
        TestCase::new(
            TestMeta::new("TC_EDGE_002", "Maximum string lengths"),
            Service::FakeRest,
            maximum_string_lengths,
        ),
        TestCase::new(
            TestMeta::new("TC_EDGE_003", "Unicode and special characters"),
            Service::FakeRest,
            unicode_characters,
        ),
    ]
}

fn text_len(body: &Value, field: &str) -> usize {
    body.get(field)
        .and_then(Value::as_str)
        .map_or(0, |s| s.chars().count())
}

fn empty_request_body<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_EDGE_001";
        let response = ctx
            .client
            .post(ctx.url(Service::FakeRest, "posts"), json!({}), Headers::new(), tc)
            .await?;

        // The fake service accepts empty bodies; a strict API would answer 400.
        assert_status_in(&response, &[201, 400], Some(tc))?;
        Ok(())
    })
}

fn maximum_string_lengths<'a>(
    ctx: &'a SuiteContext,
    data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_EDGE_002";
        let post = json!({
            "title": data.generate_long_string(LONG_TITLE_LEN),
            "body": data.generate_long_string(LONG_BODY_LEN),
            "userId": 1
        });

        let response = ctx
            .client
            .post(ctx.url(Service::FakeRest, "posts"), post, Headers::new(), tc)
            .await?;

        assert_status_code(&response, 201, Some(tc))?;

        let body = json_body(&response)?;
        ensure(text_len(&body, "title") == LONG_TITLE_LEN, || {
            format!("{tc} - Title was truncated")
        })?;
        ensure(text_len(&body, "body") == LONG_BODY_LEN, || {
            format!("{tc} - Body was truncated")
        })
    })
}

fn unicode_characters<'a>(ctx: &'a SuiteContext, data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_EDGE_003";
        let unicode = data.generate_unicode_data();
        let name = unicode["name"].as_str().unwrap_or_default().to_string();
        let email = unicode["email"].as_str().unwrap_or_default();

        let post = json!({
            "title": name,
            "body": format!("Email: {email} with special chars: 你好 🌟"),
            "userId": 1
        });

        let response = ctx
            .client
            .post(ctx.url(Service::FakeRest, "posts"), post, Headers::new(), tc)
            .await?;

        assert_status_code(&response, 201, Some(tc))?;

        let body = json_body(&response)?;
        let title = body.get("title").and_then(Value::as_str).unwrap_or_default();
        ensure(title.contains(&name), || {
            format!("{tc} - Unicode characters not preserved in title")
        })
    })
}
