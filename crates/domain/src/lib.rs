//! apiprobe Domain - Core types
//!
//! This crate defines the domain model for the apiprobe HTTP test harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod log_event;
pub mod request;
pub mod response;
pub mod schema;
pub mod settings;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use log_event::LogEvent;
pub use request::{Header, Headers, HttpMethod, QueryParam, QueryParams, RequestSpec};
pub use response::ResponseSpec;
pub use schema::{Constraint, FieldRule, JsonType, Schema, SchemaRegistry, StringFormat};
pub use settings::{Environment, Service, Settings};
pub use testing::{
    AssertionError, CaseResult, StatusExpectation, Tag, TestMeta, TestOutcome, TestResults,
    TrackedResource,
};
