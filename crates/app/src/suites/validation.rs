//! Server-side input validation of the user management service.

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Service, TestMeta};
use apiprobe_infrastructure::testing::assertions::assert_status_code;
use serde_json::{Value, json};

use super::{CaseError, CaseFuture, SuiteContext, TestCase, ensure, json_body};

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            TestMeta::new("TC_VALID_001", "Missing required fields"),
            Service::UserManagement,
            missing_required_fields,
        ),
        TestCase::new(
            TestMeta::new("TC_VALID_002", "Invalid email format"),
            Service::UserManagement,
            invalid_email_format,
        ),
        TestCase::new(
            TestMeta::new("TC_VALID_003", "Invalid enum values"),
            Service::UserManagement,
            invalid_enum_values,
        ),
    ]
}

/// Posts `user` and expects a 422 rejection; returns the body.
async fn rejected(ctx: &SuiteContext, user: Value, tc: &str) -> Result<Value, CaseError> {
    let response = ctx
        .client
        .post(
            ctx.url(Service::UserManagement, "users"),
            user,
            ctx.headers(Service::UserManagement),
            tc,
        )
        .await?;

    assert_status_code(&response, 422, Some(tc))?;
    json_body(&response)
}

fn mentions(body: &Value, word: &str) -> bool {
    body.to_string().to_lowercase().contains(word)
}

fn missing_required_fields<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_VALID_001";
        let body = rejected(ctx, json!({"name": "John Doe"}), tc).await?;

        ensure(body.is_array() || mentions(&body, "field"), || {
            format!("{tc} - Expected validation error format")
        })
    })
}

fn invalid_email_format<'a>(
    ctx: &'a SuiteContext,
    data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_VALID_002";
        let user = json!({
            "name": "John Doe",
            "email": data.generate_invalid_email(),
            "gender": "male",
            "status": "active"
        });
        let body = rejected(ctx, user, tc).await?;

        ensure(mentions(&body, "email"), || {
            format!("{tc} - Expected email validation error")
        })
    })
}

fn invalid_enum_values<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_VALID_003";
        let user = json!({
            "name": "John Doe",
            "email": "john@example.com",
            "gender": "unknown",
            "status": "maybe"
        });
        let body = rejected(ctx, user, tc).await?;

        ensure(mentions(&body, "gender") || mentions(&body, "status"), || {
            format!("{tc} - Expected gender/status validation error")
        })
    })
}
