//! Create and read operations.

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Headers, JsonType, Service, Tag, TestMeta};
use apiprobe_infrastructure::testing::assertions::{
    assert_field_type, assert_field_value, assert_json_contains, assert_response_time,
    assert_status_code,
};
use serde_json::{Map, Value, json};

use super::{CaseFuture, SuiteContext, TestCase, json_body};

/// Id the fake REST service assigns to every created post.
const CREATED_POST_ID: u64 = 101;

const POST_FIELDS: &[&str] = &["id", "title", "body", "userId"];

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(
            TestMeta::new("TC_CRUD_001", "Create post").tagged(Tag::Smoke),
            Service::FakeRest,
            create_post,
        ),
        TestCase::new(
            TestMeta::new("TC_CRUD_002", "Create user with authentication"),
            Service::UserManagement,
            create_user,
        ),
        TestCase::new(
            TestMeta::new("TC_CRUD_003", "Read single post"),
            Service::FakeRest,
            read_post,
        ),
    ]
}

fn overrides(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn create_post<'a>(ctx: &'a SuiteContext, data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_CRUD_001";
        let post = data.generate_post_data(overrides(json!({
            "title": "Test Post Title",
            "body": "This is a test post body content for automation testing",
            "userId": 1
        })));

        let response = ctx
            .client
            .post(
                ctx.url(Service::FakeRest, "posts"),
                post.clone(),
                Headers::new(),
                tc,
            )
            .await?;

        assert_status_code(&response, 201, Some(tc))?;
        assert_response_time(&response, 1000, Some(tc))?;

        let body = json_body(&response)?;
        assert_json_contains(&body, POST_FIELDS, Some(tc))?;
        assert_field_value(&body, "id", &json!(CREATED_POST_ID), Some(tc))?;
        for field in ["title", "body", "userId"] {
            assert_field_value(&body, field, &post[field], Some(tc))?;
        }
        Ok(())
    })
}

fn create_user<'a>(ctx: &'a SuiteContext, data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_CRUD_002";
        let email = format!(
            "john.doe.automation+{}@example.com",
            data.generate_random_string(6)
        );
        let user = data.generate_user_data(overrides(json!({
            "name": "John Doe Automation",
            "email": email,
            "gender": "male",
            "status": "active"
        })));

        let response = ctx
            .client
            .post(
                ctx.url(Service::UserManagement, "users"),
                user,
                ctx.headers(Service::UserManagement),
                tc,
            )
            .await?;

        assert_status_code(&response, 201, Some(tc))?;

        let body = json_body(&response)?;
        assert_json_contains(&body, &["id", "name", "email", "gender", "status"], Some(tc))?;

        if let Some(id) = body.get("id") {
            data.track_created_resource("user", id.clone(), Some(Service::UserManagement.as_str()));
        }
        Ok(())
    })
}

fn read_post<'a>(ctx: &'a SuiteContext, _data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_CRUD_003";
        let response = ctx
            .client
            .get(ctx.url(Service::FakeRest, "posts/1"), Headers::new(), tc)
            .await?;

        assert_status_code(&response, 200, Some(tc))?;

        let body = json_body(&response)?;
        assert_json_contains(&body, POST_FIELDS, Some(tc))?;
        assert_field_type(&body, "id", JsonType::Integer, Some(tc))?;
        assert_field_type(&body, "userId", JsonType::Integer, Some(tc))?;
        assert_field_type(&body, "title", JsonType::String, Some(tc))?;
        assert_field_type(&body, "body", JsonType::String, Some(tc))?;
        ctx.validate_schema(&body, "post", tc)
    })
}
