//! Short codes that resolve to a recipe's canonical URL.

use std::fmt;

use rand::Rng;

/// Number of characters in a short code.
pub const SHORT_CODE_LEN: usize = 3;

/// Characters a short code may use. Look-alikes (`0 O o 1 l I i`) are left
/// out so codes can be read aloud and retyped.
pub const SHORT_CODE_ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Reasons a string is not a short code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortCodeError {
    #[error("short code must be {len} characters")]
    WrongLength { len: usize },
    #[error("short code contains characters outside its alphabet")]
    InvalidCharacter,
}

/// A validated short code.
///
/// # Examples
/// ```
/// use foodgram::domain::ShortCode;
///
/// let code = ShortCode::new("aB3").unwrap();
/// assert_eq!(code.as_str(), "aB3");
/// assert!(ShortCode::new("a0O").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// Parse a code, checking length and alphabet.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ShortCodeError> {
        let raw = raw.as_ref();
        if raw.chars().count() != SHORT_CODE_LEN {
            return Err(ShortCodeError::WrongLength {
                len: SHORT_CODE_LEN,
            });
        }
        if !raw.bytes().all(|byte| SHORT_CODE_ALPHABET.contains(&byte)) {
            return Err(ShortCodeError::InvalidCharacter);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Draw a fresh code from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..SHORT_CODE_LEN)
            .map(|_| char::from(SHORT_CODE_ALPHABET[rng.gen_range(0..SHORT_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
