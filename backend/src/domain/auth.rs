//! Authentication primitives: credentials, signup details, and the identity
//! carried by bearer tokens.

use serde::{Deserialize, Serialize};

use super::user::{Email, RollNumber, Role, User, UserId, UserValidationError, Username};
use super::Error;

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors raised while parsing login input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// The identifier was missing or blank.
    #[error("identifier is required")]
    EmptyIdentifier,
}

/// Login input: a roll number, username, or email, and an optional password.
///
/// # Examples
/// ```
/// use canteen::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(Some(" 23101A0001 "), None).expect("valid");
/// assert!(creds.is_roll_number());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Option<String>,
}

impl LoginCredentials {
    /// Validate raw login input. Blank passwords count as absent.
    pub fn try_from_parts(
        identifier: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let identifier = identifier
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(LoginValidationError::EmptyIdentifier)?;
        Ok(Self {
            identifier: identifier.to_owned(),
            password: password.filter(|value| !value.is_empty()).map(str::to_owned),
        })
    }

    /// Trimmed identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Supplied password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The identifier as a roll number, when it has that shape.
    #[must_use]
    pub fn roll_number(&self) -> Option<RollNumber> {
        RollNumber::new(&self.identifier).ok()
    }

    /// Whether the identifier has the roll-number shape.
    #[must_use]
    pub fn is_roll_number(&self) -> bool {
        RollNumber::matches(&self.identifier)
    }
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("identifier", &self.identifier)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validation errors raised while parsing signup input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupValidationError {
    /// The password was missing or blank.
    #[error("password is required")]
    MissingPassword,
    /// The password is shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Configured minimum.
        min: usize,
    },
    /// A user field failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

impl SignupValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingPassword | Self::PasswordTooShort { .. } => "password",
            Self::User(
                UserValidationError::EmptyUsername | UserValidationError::UsernameTooLong { .. },
            ) => "username",
            Self::User(UserValidationError::EmptyEmail | UserValidationError::InvalidEmail) => {
                "email"
            }
            Self::User(UserValidationError::InvalidRollNumber) => "roll_number",
            Self::User(UserValidationError::UnknownRole) => "role",
        }
    }
}

/// Raw signup fields as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupInput<'a> {
    /// Requested username.
    pub username: Option<&'a str>,
    /// Contact address.
    pub email: Option<&'a str>,
    /// Plain-text password.
    pub password: Option<&'a str>,
    /// Requested role; defaults to `user`.
    pub role: Option<&'a str>,
    /// Optional roll number; blank counts as absent.
    pub roll_number: Option<&'a str>,
}

/// Validated signup request.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupDetails {
    /// Unique login name.
    pub username: Username,
    /// Unique contact address.
    pub email: Email,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Access role.
    pub role: Role,
    /// Optional roll number.
    pub roll_number: Option<RollNumber>,
}

impl SignupDetails {
    /// Validate raw signup input.
    pub fn try_from_input(input: SignupInput<'_>) -> Result<Self, SignupValidationError> {
        let username = Username::new(input.username.unwrap_or_default())?;
        let email = Email::new(input.email.unwrap_or_default())?;
        let password = input
            .password
            .filter(|value| !value.trim().is_empty())
            .ok_or(SignupValidationError::MissingPassword)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(SignupValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        let role = input
            .role
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::parse::<Role>)
            .transpose()?
            .unwrap_or_default();
        let roll_number = input
            .roll_number
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(RollNumber::new)
            .transpose()?;
        Ok(Self {
            username,
            email,
            password: password.to_owned(),
            role,
            roll_number,
        })
    }
}

impl std::fmt::Debug for SignupDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupDetails")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("roll_number", &self.roll_number)
            .finish_non_exhaustive()
    }
}

/// Caller identity decoded from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account identifier.
    pub id: UserId,
    /// Username at the time the token was issued.
    pub username: String,
    /// Role at the time the token was issued.
    pub role: Role,
    /// Roll number, if the account has one.
    pub roll_number: Option<String>,
}

impl Identity {
    /// Whether the caller holds the admin (kitchen) role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `403 Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("admin access required"))
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_owned(),
            role: user.role,
            roll_number: user.roll_number.as_ref().map(|roll| roll.as_str().to_owned()),
        }
    }
}

/// Request metadata recorded alongside audited actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    /// Caller IP address as seen by the server.
    pub ip_address: Option<String>,
    /// Caller `User-Agent` header.
    pub user_agent: Option<String>,
}

/// Successful login or signup: a bearer token and the account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    /// Signed bearer token.
    pub token: String,
    /// Authenticated account.
    pub user: User,
}
