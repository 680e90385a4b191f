//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ValidationError};

/// Lowest weight a quote may carry
pub const MIN_WEIGHT: i64 = 1;
/// Highest weight a quote may carry
pub const MAX_WEIGHT: i64 = 10;
/// Weight given to submissions that do not specify one
pub const DEFAULT_WEIGHT: i64 = 1;
/// Longest normalized quote text accepted, in characters
pub const MAX_NORMALIZED_TEXT_CHARS: usize = 500;
/// Longest source name accepted, in characters
pub const MAX_SOURCE_NAME_CHARS: usize = 255;

/// Check a submitted weight against [`MIN_WEIGHT`]..=[`MAX_WEIGHT`]
pub fn validate_weight(weight: i64) -> Result<i64, ValidationError> {
    if (MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        Ok(weight)
    } else {
        Err(ValidationError::WeightOutOfRange {
            weight,
            min: MIN_WEIGHT,
            max: MAX_WEIGHT,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Movie,
    Book,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Movie => "movie",
            SourceKind::Book => "book",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(SourceKind::Movie),
            "book" => Ok(SourceKind::Book),
            other => Err(Error::InvalidInput(format!(
                "unknown source kind '{}' (expected movie or book)",
                other
            ))),
        }
    }
}

/// Attributed origin of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub author: Option<String>,
    pub kind: SourceKind,
}

impl Source {
    /// "Name (kind)" label used in log lines
    pub fn full_name(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// A stored quote with its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub normalized_text: String,
    pub source: Source,
    pub weight: i64,
    pub is_active: bool,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Signed vote value as stored in `votes.value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Like,
    Dislike,
}

impl VoteValue {
    pub fn as_i64(&self) -> i64 {
        match self {
            VoteValue::Like => 1,
            VoteValue::Dislike => -1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(VoteValue::Like),
            -1 => Some(VoteValue::Dislike),
            _ => None,
        }
    }

    /// Parse the `action` field of a vote request
    pub fn from_action(action: &str) -> Result<Self, Error> {
        match action {
            "like" => Ok(VoteValue::Like),
            "dislike" => Ok(VoteValue::Dislike),
            _ => Err(Error::InvalidInput("invalid action".to_string())),
        }
    }
}

/// One visitor's vote on one quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub quote_id: i64,
    pub session_key: String,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}
