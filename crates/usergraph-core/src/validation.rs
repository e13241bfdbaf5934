//! Shape checks for incoming create requests.
//!
//! Both validators take the raw JSON body and either return a typed input
//! or every field-level problem found. Nothing here touches the store.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{CreateRelationshipInput, CreateUserInput, RelationshipType, UserId};

/// Maximum length of a user name, in UTF-16 code units.
pub const MAX_NAME_LENGTH: usize = 100;

// Local part, `@`, dot-separated domain labels, then a TLD of two or more
// letters. Leading dots and `..` are rejected separately since `regex` has no
// lookahead.
const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$";

/// One rejected field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// All problems found in a request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// True if any issue concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Collects issues while a validator walks the fields.
#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError { issues: self.0 }
    }
}

/// Validate a create-user body: `{ name, email }`.
///
/// Name length is measured in UTF-16 code units, so a character outside the
/// Basic Multilingual Plane (most emoji) counts twice toward the limit.
pub fn validate_create_user(body: &Value) -> Result<CreateUserInput, ValidationError> {
    let fields = as_object(body)?;
    let mut issues = Issues::default();

    let name = string_field(fields, "name", &mut issues);
    if let Some(name) = name {
        let len = name.encode_utf16().count();
        if len == 0 {
            issues.push("name", "Name is required");
        } else if len > MAX_NAME_LENGTH {
            issues.push(
                "name",
                format!("Name must be at most {MAX_NAME_LENGTH} characters"),
            );
        }
    }

    let email = string_field(fields, "email", &mut issues);
    if let Some(email) = email {
        if !is_valid_email(email) {
            issues.push("email", "Invalid email format");
        }
    }

    match (name, email) {
        (Some(name), Some(email)) if issues.is_empty() => Ok(CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
        }),
        _ => Err(issues.into_error()),
    }
}

/// Validate a create-relationship body: `{ fromUserId, toUserId, type }`.
///
/// A relationship from a user to themselves is rejected here as well.
pub fn validate_create_relationship(
    body: &Value,
) -> Result<CreateRelationshipInput, ValidationError> {
    let fields = as_object(body)?;
    let mut issues = Issues::default();

    let from = non_empty_id(fields, "fromUserId", "From user ID is required", &mut issues);
    let to = non_empty_id(fields, "toUserId", "To user ID is required", &mut issues);

    let relationship_type = match fields.get("type") {
        None | Some(Value::Null) => {
            issues.push("type", "Required");
            None
        }
        Some(Value::String(raw)) => match raw.parse::<RelationshipType>() {
            Ok(t) => Some(t),
            Err(_) => {
                issues.push("type", invalid_type_message(raw));
                None
            }
        },
        Some(_) => {
            issues.push("type", "Expected string");
            None
        }
    };

    if let (Some(from), Some(to)) = (from, to) {
        if from == to {
            issues.push(
                "toUserId",
                "Cannot create a relationship from a user to themselves",
            );
        }
    }

    match (from, to, relationship_type) {
        (Some(from), Some(to), Some(relationship_type)) if issues.is_empty() => {
            Ok(CreateRelationshipInput {
                from_user_id: UserId::from(from),
                to_user_id: UserId::from(to),
                relationship_type,
            })
        }
        _ => Err(issues.into_error()),
    }
}

/// Check an address against the accepted email grammar.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

    if email.starts_with('.') || email.contains("..") {
        return false;
    }

    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
        .is_match(email)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object().ok_or_else(|| ValidationError {
        issues: vec![FieldIssue {
            field: "body".to_string(),
            message: "Expected a JSON object".to_string(),
        }],
    })
}

/// Fetch a required string field, recording why it is unusable otherwise.
fn string_field<'a>(
    fields: &'a Map<String, Value>,
    field: &str,
    issues: &mut Issues,
) -> Option<&'a str> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            issues.push(field, "Required");
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => {
            issues.push(field, "Expected string");
            None
        }
    }
}

fn non_empty_id<'a>(
    fields: &'a Map<String, Value>,
    field: &str,
    empty_message: &str,
    issues: &mut Issues,
) -> Option<&'a str> {
    match string_field(fields, field, issues) {
        Some("") => {
            issues.push(field, empty_message);
            None
        }
        other => other,
    }
}

fn invalid_type_message(received: &str) -> String {
    let expected: Vec<String> = RelationshipType::ALL
        .iter()
        .map(|t| format!("'{t}'"))
        .collect();
    format!(
        "Invalid enum value. Expected {}, received '{received}'",
        expected.join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_valid_user() {
        let input =
            validate_create_user(&json!({"name": "Ada Lovelace", "email": "ada@example.com"}))
                .unwrap();
        assert_eq!(input.name, "Ada Lovelace");
        assert_eq!(input.email, "ada@example.com");
    }

    #[test]
    fn collects_every_user_issue() {
        let err = validate_create_user(&json!({"name": "", "email": "not-an-email"})).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.has_field("name"));
        assert!(err.has_field("email"));
        assert_eq!(err.to_string(), "name: Name is required; email: Invalid email format");
    }

    #[test]
    fn rejects_missing_and_mistyped_user_fields() {
        let err = validate_create_user(&json!({"name": 42})).unwrap_err();
        assert_eq!(
            err.issues,
            vec![
                FieldIssue {
                    field: "name".to_string(),
                    message: "Expected string".to_string()
                },
                FieldIssue {
                    field: "email".to_string(),
                    message: "Required".to_string()
                },
            ]
        );
    }

    #[test]
    fn name_length_limit_is_inclusive() {
        let at_limit = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_create_user(&json!({"name": at_limit, "email": "a@b.co"})).is_ok());

        let over = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = validate_create_user(&json!({"name": over, "email": "a@b.co"})).unwrap_err();
        assert_eq!(err.issues[0].message, "Name must be at most 100 characters");
    }

    #[test]
    fn name_length_counts_utf16_units() {
        let emoji = "\u{1F600}".repeat(60);
        let err = validate_create_user(&json!({"name": emoji, "email": "a@b.co"})).unwrap_err();
        assert!(err.has_field("name"));

        let emoji = "\u{1F600}".repeat(50);
        assert!(validate_create_user(&json!({"name": emoji, "email": "a@b.co"})).is_ok());
    }

    #[test]
    fn email_pattern_compiles() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
    }

    #[test]
    fn rejects_non_object_body() {
        let err = validate_create_user(&json!(["name"])).unwrap_err();
        assert!(err.has_field("body"));
    }

    #[test]
    fn email_grammar() {
        for ok in [
            "user@example.com",
            "user.name+tag@example.co.uk",
            "o'brien@example.ie",
            "USER@EXAMPLE.COM",
            "a_b-c@sub-domain.example.org",
        ] {
            assert!(is_valid_email(ok), "{ok} should be accepted");
        }
        for bad in [
            "not-an-email",
            "",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            ".user@example.com",
            "user..name@example.com",
            "user.@example.com",
            "user@-example.com",
            "user name@example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn accepts_valid_relationship() {
        let input = validate_create_relationship(
            &json!({"fromUserId": "a", "toUserId": "b", "type": "COLLEAGUE"}),
        )
        .unwrap();
        assert_eq!(input.from_user_id, UserId::from("a"));
        assert_eq!(input.to_user_id, UserId::from("b"));
        assert_eq!(input.relationship_type, RelationshipType::Colleague);
    }

    #[test]
    fn rejects_unknown_relationship_type() {
        let err = validate_create_relationship(
            &json!({"fromUserId": "a", "toUserId": "b", "type": "ENEMY"}),
        )
        .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(
            err.issues[0].message,
            "Invalid enum value. Expected 'FRIEND' | 'COLLEAGUE' | 'FAMILY', received 'ENEMY'"
        );
    }

    #[test]
    fn relationship_type_is_case_sensitive() {
        let err = validate_create_relationship(
            &json!({"fromUserId": "a", "toUserId": "b", "type": "friend"}),
        )
        .unwrap_err();
        assert!(err.has_field("type"));
    }

    #[test]
    fn collects_every_relationship_issue() {
        let err = validate_create_relationship(&json!({"fromUserId": "", "type": 3})).unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert_eq!(err.issues[0].message, "From user ID is required");
        assert_eq!(err.issues[1].message, "Required");
        assert!(err.has_field("type"));
    }

    #[test]
    fn self_relationship_with_bad_type_reports_both() {
        let err = validate_create_relationship(
            &json!({"fromUserId": "a", "toUserId": "a", "type": "ENEMY"}),
        )
        .unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.has_field("type"));
        assert!(err.has_field("toUserId"));
    }

    #[test]
    fn rejects_self_relationship() {
        let err = validate_create_relationship(
            &json!({"fromUserId": "a", "toUserId": "a", "type": "FRIEND"}),
        )
        .unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert!(err.has_field("toUserId"));
    }
}
