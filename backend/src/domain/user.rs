//! User accounts and the validated primitives they are built from.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Maximum length of a username, first name or last name.
pub const NAME_MAX: usize = 150;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Username reserved for the "current user" routes.
pub const RESERVED_USERNAME: &str = "me";

/// Validation errors raised while building user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username \"{RESERVED_USERNAME}\" is reserved")]
    ReservedUsername,
    #[error("username may only contain letters, digits and the characters . @ + - _")]
    UsernameInvalidCharacters,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: &'static str, max: usize },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, raw.to_owned()))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Public handle chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

/// Check a candidate username against the reserved-name and character policy.
///
/// # Examples
/// ```
/// use foodgram::domain::validate_username;
///
/// assert!(validate_username("me").is_err());
/// assert!(validate_username("bad name!").is_err());
/// assert!(validate_username("valid.name_1").is_ok());
/// ```
pub fn validate_username(candidate: &str) -> Result<Username, UserValidationError> {
    if candidate.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }
    if candidate.chars().count() > NAME_MAX {
        return Err(UserValidationError::UsernameTooLong { max: NAME_MAX });
    }
    if candidate == RESERVED_USERNAME {
        return Err(UserValidationError::ReservedUsername);
    }
    if !username_regex().is_match(candidate) {
        return Err(UserValidationError::UsernameInvalidCharacters);
    }
    Ok(Username(candidate.to_owned()))
}

impl Username {
    /// Validate and construct a username.
    pub fn new(candidate: impl AsRef<str>) -> Result<Self, UserValidationError> {
        validate_username(candidate.as_ref())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Email address used as the login identifier.
///
/// Stored trimmed and lower-cased; only the overall `local@domain` shape is
/// checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(candidate: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = candidate.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        let well_formed = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !trimmed.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// First or last name of a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name; `field` labels the error.
    pub fn new(candidate: impl AsRef<str>, field: &'static str) -> Result<Self, UserValidationError> {
        let trimmed = candidate.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName { field });
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                field,
                max: NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    first_name: PersonName,
    last_name: PersonName,
    avatar: Option<String>,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(
        id: UserId,
        email: Email,
        username: Username,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        Self {
            id,
            email,
            username,
            first_name,
            last_name,
            avatar: None,
        }
    }

    /// Attach the stored avatar path.
    #[must_use]
    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Media-relative path of the avatar image, if one was uploaded.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }
}

/// A user as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    /// Whether the viewer follows this user; always false for anonymous viewers.
    pub is_subscribed: bool,
}
