//! User identity types.
//!
//! Users are identified by a database-assigned integer. Roll number, username,
//! and email are each unique; a roll number is optional and, when present,
//! follows the institution's `23101A` + four digit format.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 64;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 255;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was missing or blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Configured limit.
        max: usize,
    },
    /// Email was missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email did not look like an address.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Roll number did not match the institution format.
    #[error("roll number must match 23101A followed by four digits")]
    InvalidRollNumber,
    /// Role was not one of the known roles.
    #[error("role must be one of: user, admin")]
    UnknownRole,
}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Access role. Kitchen staff use the admin role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary student account.
    #[default]
    User,
    /// Administrator and kitchen operator.
    Admin,
}

impl Role {
    /// Stable lowercase label used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Whether the role grants admin and kitchen access.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
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
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

const ROLL_NUMBER_PATTERN: &str = r"^23101A[0-9]{4}$";

static ROLL_NUMBER_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn roll_number_regex() -> Option<&'static Regex> {
    ROLL_NUMBER_RE
        .get_or_init(|| Regex::new(ROLL_NUMBER_PATTERN).ok())
        .as_ref()
}

/// Institution-issued student identifier.
///
/// # Examples
/// ```
/// use canteen::domain::RollNumber;
///
/// assert!(RollNumber::new("23101A0001").is_ok());
/// assert!(RollNumber::new("23101B0001").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RollNumber(String);

impl RollNumber {
    /// Validate a roll number.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = value.as_ref();
        if Self::matches(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(UserValidationError::InvalidRollNumber)
        }
    }

    /// Whether `value` has the roll-number shape.
    #[must_use]
    pub fn matches(value: &str) -> bool {
        roll_number_regex().is_some_and(|re| re.is_match(value))
    }

    /// Borrow the roll number text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RollNumber {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RollNumber> for String {
    fn from(value: RollNumber) -> Self {
        value.0
    }
}

impl fmt::Display for RollNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl From<RollNumber> for Username {
    fn from(value: RollNumber) -> Self {
        Self(value.0)
    }
}

/// Unique contact address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate an email address.
    ///
    /// Only the shape is checked: a non-empty local part and domain separated
    /// by a single `@`, with no whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX || trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    /// Placeholder address assigned to auto-provisioned students.
    #[must_use]
    pub fn for_roll_number(roll_number: &RollNumber) -> Self {
        Self(format!("{roll_number}@student.com"))
    }

    /// Borrow the address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Stored password hash in PHC string format. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC-formatted hash produced by a credential hasher.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Borrow the PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Public view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Database identifier.
    pub id: UserId,
    /// Student roll number, when the account has one.
    pub roll_number: Option<RollNumber>,
    /// Unique login name.
    pub username: Username,
    /// Unique contact address.
    pub email: Email,
    /// Access role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// User together with its credential material, as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Public user fields.
    pub user: User,
    /// Absent for accounts provisioned by roll-number login.
    pub password_hash: Option<PasswordHash>,
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Optional roll number.
    pub roll_number: Option<RollNumber>,
    /// Unique login name.
    pub username: Username,
    /// Unique contact address.
    pub email: Email,
    /// Optional credential hash.
    pub password_hash: Option<PasswordHash>,
    /// Access role.
    pub role: Role,
}

impl NewUser {
    /// Account created on the first login with an unseen roll number.
    #[must_use]
    pub fn provisioned_student(roll_number: RollNumber) -> Self {
        Self {
            email: Email::for_roll_number(&roll_number),
            username: Username::from(roll_number.clone()),
            roll_number: Some(roll_number),
            password_hash: None,
            role: Role::User,
        }
    }
}

#[cfg(test)]
mod tests;
