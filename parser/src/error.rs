//! @ai:module:intent Define error types for strict range expression parsing
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use crate::token::Span;
use thiserror::Error;

/// @ai:intent Unified error type for ridespec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unrecognized text {text:?} at {span}")]
    Unrecognized { text: String, span: Span },

    #[error("Number {text} at {span} does not fit in 32 bits")]
    Overflow { text: String, span: Span },

    #[error("Range {start}-{end} at {span} is inverted (end is below start)")]
    InvertedRange { start: u32, end: u32, span: Span },

    #[error("{text:?} at {span} would expand past {limit} values")]
    TooLarge {
        text: String,
        span: Span,
        limit: usize,
    },

    #[error("Expression {0:?} contains no values")]
    Empty(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
