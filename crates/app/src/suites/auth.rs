//! Authentication against the auth sandbox.

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Service, Tag, TestMeta};
use apiprobe_infrastructure::testing::assertions::{
    assert_field_value, assert_json_contains, assert_json_not_contains, assert_non_empty_string,
    assert_response_time, assert_status_code,
};
use serde_json::json;

use super::{CaseFuture, SuiteContext, TestCase, json_body};

const LOGIN_EMAIL: &str = "eve.holt@reqres.in";

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            TestMeta::new("TC_AUTH_001", "Valid authentication").tagged(Tag::Smoke),
            Service::AuthSandbox,
            valid_authentication,
        ),
        TestCase::new(
            TestMeta::new("TC_AUTH_002", "Invalid credentials"),
            Service::AuthSandbox,
            invalid_credentials,
        ),
        TestCase::new(
            TestMeta::new("TC_AUTH_003", "Missing password"),
            Service::AuthSandbox,
            missing_password,
        ),
    ]
}

fn valid_authentication<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_AUTH_001";
        let response = ctx
            .client
            .post(
                ctx.url(Service::AuthSandbox, "login"),
                json!({"email": LOGIN_EMAIL, "password": "cityslicka"}),
                ctx.headers(Service::AuthSandbox),
                tc,
            )
            .await?;

        assert_status_code(&response, 200, Some(tc))?;
        assert_response_time(&response, 2000, Some(tc))?;

        let body = json_body(&response)?;
        assert_json_contains(&body, &["token"], Some(tc))?;
        assert_non_empty_string(&body, "token", Some(tc))?;
        ctx.validate_schema(&body, "login_success", tc)
    })
}

fn invalid_credentials<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_AUTH_002";
        let response = ctx
            .client
            .post(
                ctx.url(Service::AuthSandbox, "login"),
                json!({"email": LOGIN_EMAIL, "password": "wrongpassword"}),
                ctx.headers(Service::AuthSandbox),
                tc,
            )
            .await?;

        assert_status_code(&response, 400, Some(tc))?;
        assert_response_time(&response, 2000, Some(tc))?;

        let body = json_body(&response)?;
        assert_json_contains(&body, &["error"], Some(tc))?;
        assert_json_not_contains(&body, &["token"], Some(tc))?;
        ctx.validate_schema(&body, "error_response", tc)
    })
}

fn missing_password<'a>(ctx: &'a SuiteContext, _data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_AUTH_003";
        let response = ctx
            .client
            .post(
                ctx.url(Service::AuthSandbox, "login"),
                json!({"email": LOGIN_EMAIL}),
                ctx.headers(Service::AuthSandbox),
                tc,
            )
            .await?;

        assert_status_code(&response, 400, Some(tc))?;
        assert_response_time(&response, 2000, Some(tc))?;

        let body = json_body(&response)?;
        assert_json_contains(&body, &["error"], Some(tc))?;
        assert_field_value(&body, "error", &json!("Missing password"), Some(tc))?;
        ctx.validate_schema(&body, "error_response", tc)
    })
}
