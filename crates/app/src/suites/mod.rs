//! Live test suites against the public sandbox services.
//!
//! Every case is declared with its [`TestMeta`] (id, title, tags) and the
//! service it targets. Bodies are plain async functions that return
//! `Ok(())` when every check passes.

mod auth;
mod crud;
mod edge;
mod errors;
mod performance;
mod validation;

use std::sync::Arc;

use apiprobe_application::{ApiClient, ApiLogger, ClientError, TestDataManager};
use apiprobe_domain::{AssertionError, Headers, ResponseSpec, Service, Settings, TestMeta};
use apiprobe_infrastructure::{ReqwestTransport, SchemaValidator};
use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

/// Why a case failed.
#[derive(Debug, Error)]
pub enum CaseError {
    /// An assertion did not hold.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// The request could not be completed.
    #[error("request failed: {0}")]
    Client(#[from] ClientError),

    /// The response body was not JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A response did not match its schema.
    #[error("{test_case} - Schema validation failed: {message}")]
    Schema {
        /// Case that ran the validation.
        test_case: String,
        /// Validator message.
        message: String,
    },

    /// A case-specific check failed.
    #[error("{0}")]
    Check(String),
}

/// Result of a case body.
pub type CaseResult = Result<(), CaseError>;

/// Future returned by a case body.
pub type CaseFuture<'a> = BoxFuture<'a, CaseResult>;

/// Signature shared by all case bodies.
pub type CaseBody = for<'a> fn(&'a SuiteContext, &'a mut TestDataManager) -> CaseFuture<'a>;

/// A registered test case.
#[derive(Clone)]
pub struct TestCase {
    /// Identity and tags.
    pub meta: TestMeta,
    /// Service the case talks to.
    pub service: Service,
    /// The checks to run.
    pub body: CaseBody,
}

impl TestCase {
    /// Declares a case.
    pub fn new(meta: TestMeta, service: Service, body: CaseBody) -> Self {
        Self {
            meta,
            service,
            body,
        }
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("meta", &self.meta)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Shared collaborators handed to every case.
pub struct SuiteContext {
    /// Client used for all calls.
    pub client: ApiClient<ReqwestTransport>,
    /// Resolved settings.
    pub settings: Settings,
    /// Response schema validator.
    pub validator: SchemaValidator,
    /// Logger for validation events.
    pub logger: Arc<ApiLogger>,
}

impl SuiteContext {
    /// Bundles the collaborators.
    pub fn new(client: ApiClient<ReqwestTransport>, settings: Settings) -> Self {
        let logger = Arc::clone(client.logger());
        Self {
            client,
            settings,
            validator: SchemaValidator::new(),
            logger,
        }
    }

    /// Full URL of `path` on `service`.
    pub fn url(&self, service: Service, path: &str) -> String {
        self.settings.endpoint(service, path)
    }

    /// JSON headers for `service`, with the bearer token where needed.
    pub fn headers(&self, service: Service) -> Headers {
        self.settings.headers_for(service)
    }

    /// Validates `value` against `schema`, logging the outcome.
    pub fn validate_schema(&self, value: &Value, schema: &str, test_case: &str) -> CaseResult {
        let outcome = self.validator.validate(value, schema);
        self.logger.log_validation(
            schema,
            outcome.ok,
            Some(outcome.message.clone()),
            Some(test_case),
        );

        if outcome.ok {
            Ok(())
        } else {
            Err(CaseError::Schema {
                test_case: test_case.to_string(),
                message: outcome.message,
            })
        }
    }
}

/// Parses the response body as JSON.
fn json_body(response: &ResponseSpec) -> Result<Value, CaseError> {
    Ok(response.json()?)
}

/// Fails the case with `message` unless `condition` holds.
fn ensure(condition: bool, message: impl FnOnce() -> String) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(CaseError::Check(message()))
    }
}

/// Every registered case, in report order.
pub fn all() -> Vec<TestCase> {
    [
        auth::cases(),
        crud::cases(),
        validation::cases(),
        edge::cases(),
        errors::cases(),
        performance::cases(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apiprobe_domain::Tag;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_case_ids_are_unique() {
        let cases = all();
        let ids: HashSet<_> = cases.iter().map(|c| c.meta.id.as_str()).collect();
        assert_eq!(ids.len(), cases.len());
        assert_eq!(cases.len(), 19);
    }

    #[test]
    fn test_every_case_is_regression() {
        assert!(all().iter().all(|c| c.meta.has_tag(Tag::Regression)));
    }

    #[test]
    fn test_declared_tags() {
        let cases = all();
        let tagged = |tag: Tag| -> Vec<String> {
            cases
                .iter()
                .filter(|c| c.meta.has_tag(tag))
                .map(|c| c.meta.id.clone())
                .collect()
        };

        assert_eq!(tagged(Tag::Smoke), vec!["TC_AUTH_001", "TC_CRUD_001"]);
        assert_eq!(
            tagged(Tag::Performance),
            vec!["TC_PERF_001", "TC_PERF_002", "TC_PERF_003", "TC_PERF_004"]
        );
    }

    #[test]
    fn test_user_management_cases() {
        let ids: Vec<_> = all()
            .into_iter()
            .filter(|c| c.service == Service::UserManagement)
            .map(|c| c.meta.id)
            .collect();
        assert_eq!(
            ids,
            vec!["TC_CRUD_002", "TC_VALID_001", "TC_VALID_002", "TC_VALID_003"]
        );
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, || "unused".to_string()).is_ok());
        let err = ensure(false, || "TC_X - broken".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "TC_X - broken");
    }
}
