//! Test data generation and created-resource tracking

use std::collections::HashSet;

use apiprobe_domain::TrackedResource;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Map, Value, json};

/// Malformed addresses used for negative tests.
pub const INVALID_EMAILS: &[&str] = &[
    "invalid-email",
    "user@",
    "@domain.com",
    "user.domain.com",
    "user@domain",
];

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Emma", "Olivia",
    "Liam", "Noah", "Ava",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Taylor", "Moore", "Jackson",
];

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "labore", "dolore", "magna", "aliqua", "enim", "minim",
    "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip",
];

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates request payloads and remembers resources created on live
/// services.
///
/// One manager is created per test case and cleared when it finishes.
#[derive(Debug, Default)]
pub struct TestDataManager {
    created_resources: Vec<TrackedResource>,
    issued_emails: HashSet<String>,
}

impl TestDataManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a user record with `name`, `email`, `gender` and `status`.
    ///
    /// Keys in `overrides` replace generated values. Emails are unique for
    /// the lifetime of the manager.
    pub fn generate_user_data(&mut self, overrides: Map<String, Value>) -> Value {
        let mut rng = rand::rng();
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Alex");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Doe");
        let gender = if rng.random_bool(0.5) { "male" } else { "female" };
        let status = if rng.random_bool(0.5) {
            "active"
        } else {
            "inactive"
        };

        let mut data = Map::new();
        data.insert("name".into(), json!(format!("{first} {last}")));
        data.insert("email".into(), json!(self.unique_email(first, last)));
        data.insert("gender".into(), json!(gender));
        data.insert("status".into(), json!(status));
        data.extend(overrides);
        Value::Object(data)
    }

    /// Generates a post record with `title`, `body` and `userId`.
    ///
    /// Keys in `overrides` replace generated values.
    #[must_use]
    pub fn generate_post_data(&self, overrides: Map<String, Value>) -> Value {
        let mut rng = rand::rng();
        let title = capitalize(&Self::words(4));
        let body = (0..3)
            .map(|_| format!("{}.", capitalize(&Self::words(rng.random_range(6..=12)))))
            .collect::<Vec<_>>()
            .join(" ");

        let mut data = Map::new();
        data.insert("title".into(), json!(title));
        data.insert("body".into(), json!(body));
        data.insert("userId".into(), json!(rng.random_range(1..=10)));
        data.extend(overrides);
        Value::Object(data)
    }

    /// Returns one of [`INVALID_EMAILS`] at random.
    #[must_use]
    pub fn generate_invalid_email(&self) -> &'static str {
        INVALID_EMAILS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or("invalid-email")
    }

    /// Generates an alphanumeric string of `length` characters.
    #[must_use]
    pub fn generate_long_string(&self, length: usize) -> String {
        random_string(ALPHANUMERIC, length)
    }

    /// Generates a lowercase alphanumeric string of `length` characters.
    #[must_use]
    pub fn generate_random_string(&self, length: usize) -> String {
        random_string(LOWER_ALPHANUMERIC, length)
    }

    /// Returns a fixed record with accented and symbol characters.
    #[must_use]
    pub fn generate_unicode_data(&self) -> Value {
        json!({
            "name": "José María González-Pérez £$%^",
            "email": "josé@müller.com"
        })
    }

    /// Remembers a resource created during the current test.
    pub fn track_created_resource(
        &mut self,
        resource_type: impl Into<String>,
        resource_id: Value,
        service: Option<&str>,
    ) {
        self.created_resources.push(TrackedResource {
            resource_type: resource_type.into(),
            resource_id,
            service: service.map(ToString::to_string),
        });
    }

    /// Returns a copy of the tracked resources.
    #[must_use]
    pub fn cleanup_list(&self) -> Vec<TrackedResource> {
        self.created_resources.clone()
    }

    /// Forgets all tracked resources.
    pub fn clear_cleanup_list(&mut self) {
        self.created_resources.clear();
    }

    fn unique_email(&mut self, first: &str, last: &str) -> String {
        loop {
            let email = format!(
                "{}.{}.{}@example.com",
                first.to_lowercase(),
                last.to_lowercase(),
                random_string(LOWER_ALPHANUMERIC, 8)
            );
            if self.issued_emails.insert(email.clone()) {
                return email;
            }
        }
    }

    fn words(count: usize) -> String {
        let mut rng = rand::rng();
        (0..count)
            .filter_map(|_| WORDS.choose(&mut rng).copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn random_string(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..charset.len());
            charset[idx] as char
        })
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
