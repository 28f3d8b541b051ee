//! Users as seen by article procedures.
//!
//! Identity is owned by an external session provider; this crate only reads
//! users to attach author details and to authorise mutations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum accepted length of an opaque user identifier.
pub const USER_ID_MAX: usize = 191;

/// Validation failures for user primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    IdTooLong { max: usize },
    IdContainsWhitespace,
    UnknownRole(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => f.write_str("user id must not be empty"),
            Self::IdTooLong { max } => write!(f, "user id must be at most {max} characters"),
            Self::IdContainsWhitespace => f.write_str("user id must not contain whitespace"),
            Self::UnknownRole(raw) => write!(f, "unknown role {raw:?}; expected ADMIN or USER"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque identifier issued by the identity provider.
///
/// ```
/// use folio::domain::UserId;
///
/// let id = UserId::new("ckx1user0000").unwrap();
/// assert_eq!(id.as_ref(), "ckx1user0000");
/// assert!(UserId::new(" ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(UserValidationError::IdContainsWhitespace);
        }
        if raw.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Access role carried by a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// User record with the public profile fields shown next to articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: Option<String>,
    image: Option<String>,
    role: Role,
}

impl User {
    pub fn new(id: UserId, name: Option<String>, image: Option<String>, role: Role) -> Self {
        Self {
            id,
            name,
            image,
            role,
        }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("has space", UserValidationError::IdContainsWhitespace)]
    #[case("tab\tid", UserValidationError::IdContainsWhitespace)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_ids() {
        let raw = "u".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw),
            Err(UserValidationError::IdTooLong { max: USER_ID_MAX })
        );
    }

    #[rstest]
    #[case("ADMIN", Role::Admin)]
    #[case("USER", Role::User)]
    fn parses_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    fn unknown_role_is_rejected() {
        assert_eq!(
            "admin".parse::<Role>(),
            Err(UserValidationError::UnknownRole("admin".to_owned()))
        );
    }

    #[rstest]
    fn user_serialises_with_uppercase_role() {
        let user = User::new(
            UserId::new("u1").expect("valid id"),
            Some("Ada".to_owned()),
            None,
            Role::Admin,
        );
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(
            value,
            serde_json::json!({ "id": "u1", "name": "Ada", "image": null, "role": "ADMIN" })
        );
    }
}
