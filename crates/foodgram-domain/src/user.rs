//! User domain types and field rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum length of username, first name and last name in characters.
pub const MAX_USER_NAME_LEN: usize = 32;

/// Maximum email length in characters.
pub const MAX_EMAIL_LEN: usize = 256;

/// User permission level.
///
/// Wire format: `u8` (0 = Normal, 1 = Staff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Normal = 0,
    Staff = 1,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Normal),
            1 => Some(Self::Staff),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_staff(self) -> bool {
        matches!(self, Self::Staff)
    }
}

/// Reason a username was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must be at least 3 characters")]
    TooShort,
    #[error("username must be at most 32 characters")]
    TooLong,
    #[error("username must use only Cyrillic or only Latin letters")]
    MixedAlphabet,
}

fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Validate a username: 3–32 letters, all Cyrillic or all Latin.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LEN {
        return Err(UsernameError::TooShort);
    }
    if len > MAX_USER_NAME_LEN {
        return Err(UsernameError::TooLong);
    }
    let latin = username.chars().all(|c| c.is_ascii_alphabetic());
    let cyrillic = username.chars().all(is_cyrillic_letter);
    if latin || cyrillic {
        Ok(())
    } else {
        Err(UsernameError::MixedAlphabet)
    }
}

/// Minimal shape check: one `@` with non-empty local and domain parts.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().count() > MAX_EMAIL_LEN {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}
