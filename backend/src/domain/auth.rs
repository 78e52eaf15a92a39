//! Authentication primitives: login credentials, passwords and hashes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, PersonName, UserValidationError, Username};

/// Minimum length for a new password.
pub const PASSWORD_MIN: usize = 8;
/// Maximum length for a new password.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// New password is shorter than the policy allows.
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    /// New password is longer than the policy allows.
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and not empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use foodgram::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Chef@Example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "chef@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Plain-text password that satisfies the length policy.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a password chosen by the user.
    pub fn new(candidate: &str) -> Result<Self, LoginValidationError> {
        let length = candidate.chars().count();
        if length == 0 {
            return Err(LoginValidationError::EmptyPassword);
        }
        if length < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(LoginValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(candidate.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Encoded password hash as produced by a [`PasswordHasher`](crate::domain::ports::PasswordHasher).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string (PHC format).
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: NewPassword,
}

/// Field-tagged validation failures collected while building a [`Registration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationField {
    User(&'static str, UserValidationError),
    Password(LoginValidationError),
}

impl Registration {
    /// Validate every field and report all failures at once.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Self, Vec<RegistrationField>> {
        let mut failures = Vec::new();
        let email = Email::new(email)
            .map_err(|err| failures.push(RegistrationField::User("email", err)))
            .ok();
        let username = Username::new(username)
            .map_err(|err| failures.push(RegistrationField::User("username", err)))
            .ok();
        let first_name = PersonName::new(first_name, "first_name")
            .map_err(|err| failures.push(RegistrationField::User("first_name", err)))
            .ok();
        let last_name = PersonName::new(last_name, "last_name")
            .map_err(|err| failures.push(RegistrationField::User("last_name", err)))
            .ok();
        let password = NewPassword::new(password)
            .map_err(|err| failures.push(RegistrationField::Password(err)))
            .ok();

        match (email, username, first_name, last_name, password) {
            (Some(email), Some(username), Some(first_name), Some(last_name), Some(password)) => {
                Ok(Self {
                    email,
                    username,
                    first_name,
                    last_name,
                    password,
                })
            }
            _ => Err(failures),
        }
    }
}
