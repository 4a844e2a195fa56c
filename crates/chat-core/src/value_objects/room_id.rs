//! Room identifier
//!
//! Rooms are addressed by an opaque public string (the room's UUID column in
//! storage). The value is never interpreted, only validated for shape so that
//! it can be used safely in URLs and log fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque, stable identifier of a chat room
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Maximum accepted length
    pub const MAX_LEN: usize = 64;

    /// Parse and validate a room identifier
    pub fn parse(value: impl Into<String>) -> Result<Self, RoomIdError> {
        let value = value.into();

        if value.is_empty() {
            return Err(RoomIdError::Empty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(RoomIdError::TooLong { max: Self::MAX_LEN });
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(RoomIdError::InvalidCharacter);
        }

        Ok(Self(value))
    }

    /// Borrow the raw identifier
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw identifier
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error when parsing a [`RoomId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomIdError {
    #[error("room id must not be empty")]
    Empty,

    #[error("room id exceeds {max} characters")]
    TooLong { max: usize },

    #[error("room id may only contain ASCII letters, digits, '-' and '_'")]
    InvalidCharacter,
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomId {
    type Error = RoomIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}
