//! @ai:module:intent Range expression parser for benchmark parameter sweeps
//! @ai:module:layer infrastructure
//! @ai:module:public_api error, output, parser, set, token
//! @ai:module:stateless true
//!
//! # ridespec
//!
//! Turns compact range expressions such as `1,3,5-8` or `2~4 16` into the
//! ordered integer sequences that drive a rideable × test × thread sweep.
//!
//! ## Example
//!
//! ```rust
//! use ridespec::{parse, parse_strict};
//!
//! assert_eq!(parse("1,3,5-8").as_slice(), &[1, 3, 5, 6, 7, 8]);
//! assert!(parse("abc").is_empty());
//! assert!(parse_strict("9-3").is_err());
//! ```

pub mod error;
pub mod output;
pub mod parser;
pub mod set;
pub mod token;

pub use error::{Error, Result};
pub use output::{format_expansion, format_scan, to_json, Expansion, OutputFormat};
pub use parser::{parse, parse_strict, tokenize};
pub use set::ParameterSet;
pub use token::{Scan, SkipReason, Skipped, Span, SpannedToken, Token};
