//! Response checking.
//!
//! This module provides the assertion library and the schema validator used
//! by the test suites.

pub mod assertions;
mod validator;

pub use validator::{SchemaValidator, ValidationOutcome};
