//! @ai:module:intent Typed tokens produced by scanning a range expression
//! @ai:module:layer domain
//! @ai:module:public_api Span, Token, SpannedToken, Skipped, SkipReason, Scan
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent Byte range into the scanned source text
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// @ai:intent Slice the source text covered by this span
    /// @ai:pre span was produced from `source`
    /// @ai:effects pure
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// @ai:intent A single well-formed element of a range expression
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    Literal { value: u32 },
    Range { start: u32, end: u32 },
}

impl Token {
    /// @ai:intent True for a range whose end is below its start
    /// @ai:example (Range 9-3) -> true
    /// @ai:example (Range 2-2) -> false
    /// @ai:effects pure
    pub fn is_inverted(&self) -> bool {
        matches!(self, Token::Range { start, end } if end < start)
    }

    /// @ai:intent Number of integers this token expands to
    /// @ai:effects pure
    pub fn len(&self) -> usize {
        match *self {
            Token::Literal { .. } => 1,
            Token::Range { start, end } if end < start => 0,
            Token::Range { start, end } => ((end - start) as usize).saturating_add(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// @ai:intent Expand to the ascending inclusive run of integers
    /// @ai:post inverted ranges expand to nothing
    /// @ai:effects pure
    pub fn values(&self) -> std::ops::RangeInclusive<u32> {
        match *self {
            Token::Literal { value } => value..=value,
            Token::Range { start, end } if end < start => {
                // An exhausted inclusive range; 1..=0 is empty.
                1..=0
            }
            Token::Range { start, end } => start..=end,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal { value } => write!(f, "{}", value),
            Token::Range { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

/// @ai:intent A token together with where it came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// @ai:intent Why a fragment of input produced no token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unrecognized,
    Overflow,
    /// Would push the expression past `ParameterSet::MAX_LEN` values.
    TooLarge,
}

/// @ai:intent A fragment of input ignored by the lenient parser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skipped {
    pub text: String,
    pub span: Span,
    pub reason: SkipReason,
}

/// @ai:intent Full result of scanning a range expression
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scan {
    pub tokens: Vec<SpannedToken>,
    pub skipped: Vec<Skipped>,
}
