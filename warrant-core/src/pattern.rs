// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Character separating the segments of a permission string.
pub const SEPARATOR: char = '.';

/// Segment which, in final position, matches every deeper permission.
pub const WILDCARD: &str = "*";

/// Errors which can occur when parsing a permission pattern from a string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("permission pattern is empty")]
    Empty,

    #[error("permission pattern contains an empty segment at position {position}")]
    EmptySegment { position: usize },

    #[error("permission pattern contains whitespace")]
    Whitespace,
}

/// A single lexical element of a permission pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Lowercased, non-empty segment of the pattern.
    Literal(String),

    /// The `.` between two segments.
    Separator,

    /// Trailing `*`, only ever the last token.
    Wildcard,
}

/// Parsed, lowercased permission string like `chest.gold` or `chest.*`.
///
/// Only a `*` forming the complete final segment acts as a wildcard, every other `*` is kept as a
/// literal character. This means `a.*.b` is a plain three-segment literal whose middle segment
/// happens to be `*` and it only matches the identical string.
///
/// A pattern without any tokens is "inert": it never matches anything, not even itself. Inert
/// patterns stand in for malformed rows coming out of storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PermissionPattern {
    tokens: Vec<Token>,
}

impl PermissionPattern {
    /// Parse and validate a permission pattern from a string.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }

        if raw.chars().any(char::is_whitespace) {
            return Err(PatternError::Whitespace);
        }

        let lowered = raw.to_lowercase();
        let segments: Vec<&str> = lowered.split(SEPARATOR).collect();
        let last = segments.len() - 1;

        let mut tokens = Vec::with_capacity(segments.len() * 2);
        for (position, segment) in segments.into_iter().enumerate() {
            if segment.is_empty() {
                return Err(PatternError::EmptySegment { position });
            }

            if position > 0 {
                tokens.push(Token::Separator);
            }

            if position == last && segment == WILDCARD {
                tokens.push(Token::Wildcard);
            } else {
                tokens.push(Token::Literal(segment.to_owned()));
            }
        }

        Ok(Self { tokens })
    }

    /// Pattern which matches nothing.
    pub fn inert() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Returns `true` if this pattern never matches anything.
    pub fn is_inert(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns `true` if this pattern ends with a wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.tokens.last(), Some(Token::Wildcard))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of literal segments, not counting a trailing wildcard.
    pub fn literal_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, Token::Literal(_)))
            .count()
    }

    /// Ranking score for conflict resolution.
    ///
    /// Every literal segment adds two points and a wildcard tail costs one point compared to a
    /// literal ending, which gives `a.b.c` (8) > `a.b` (6) > `a.b.*` (5) > `a.*` (3) > `*` (1).
    /// Only the inert pattern scores zero.
    pub fn specificity(&self) -> u32 {
        if self.is_inert() {
            return 0;
        }

        let literals = self.literal_count() as u32;
        let ending = if self.is_wildcard() { 1 } else { 2 };
        literals * 2 + ending
    }

    /// Returns `true` if `candidate` is covered by this pattern.
    ///
    /// A literal pattern only matches the identical pattern. A wildcard pattern matches itself and
    /// every pattern which extends its literal prefix by at least one more segment, so `a.*`
    /// matches `a.b`, `a.b.c` and `a.b.*`, but not `a`.
    pub fn matches(&self, candidate: &PermissionPattern) -> bool {
        if self.is_inert() || candidate.is_inert() {
            return false;
        }

        let mut ours = self.tokens.iter();
        let mut theirs = candidate.tokens.iter();

        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(Token::Wildcard), Some(_)) => return true,
                (Some(Token::Literal(a)), Some(Token::Literal(b))) => {
                    if a != b {
                        return false;
                    }
                }
                (Some(Token::Separator), Some(Token::Separator)) => continue,
                (Some(Token::Wildcard), None)
                | (Some(Token::Literal(_)), _)
                | (Some(Token::Separator), _)
                | (None, Some(_)) => return false,
            }
        }
    }

    /// Canonical lowercase dotted representation, used as map key and for storage.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl Display for PermissionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Literal(segment) => write!(f, "{}", segment)?,
                Token::Separator => write!(f, "{}", SEPARATOR)?,
                Token::Wildcard => write!(f, "{}", WILDCARD)?,
            }
        }
        Ok(())
    }
}

impl FromStr for PermissionPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PermissionPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PermissionPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: String = serde::Deserialize::deserialize(deserializer)?;

        let pattern = PermissionPattern::parse(&raw).map_err(|err| {
            serde::de::Error::custom(format!("invalid permission pattern, {}", err))
        })?;

        Ok(pattern)
    }
}
