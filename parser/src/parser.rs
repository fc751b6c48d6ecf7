//! @ai:module:intent Scan range expressions like "1,3,5-8" into parameter sets
//! @ai:module:layer application
//! @ai:module:public_api tokenize, parse, parse_strict
//! @ai:module:depends_on token, set, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::set::ParameterSet;
use crate::token::{Scan, SkipReason, Skipped, Span, SpannedToken, Token};
use regex::Regex;
use std::sync::LazyLock;

/// Digits, optionally followed by `-` or `~` and a second run of digits.
///
/// Only ASCII `0-9` count. Other Unicode decimal digits (Arabic-Indic `٣`,
/// fullwidth `３`) are not numbers here and end up as unrecognized text.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(?:[~-]([0-9]+))?").expect("Invalid token pattern"));

/// @ai:intent Scan text into typed tokens and the fragments that were ignored
/// @ai:post tokens and skipped fragments are in source order
/// @ai:post kept tokens expand to at most `ParameterSet::MAX_LEN` values in total
/// @ai:example ("1,3,5-8") -> tokens [1, 3, 5-8], skipped []
/// @ai:example ("4 x 2") -> tokens [4, 2], skipped ["x"]
/// @ai:effects pure
pub fn tokenize(text: &str) -> Scan {
    let mut scan = Scan::default();
    let mut cursor = 0;
    let mut expanded: usize = 0;

    for captures in TOKEN_PATTERN.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        collect_gap(text, cursor, whole.start(), &mut scan.skipped);
        cursor = whole.end();

        let span = Span::new(whole.start(), whole.end());
        let first = captures.get(1).map(|m| m.as_str().parse::<u32>());
        let second = captures.get(2).map(|m| m.as_str().parse::<u32>());

        let token = match (first, second) {
            (Some(Ok(value)), None) => Token::Literal { value },
            (Some(Ok(start)), Some(Ok(end))) => Token::Range { start, end },
            _ => {
                scan.skipped.push(Skipped {
                    text: whole.as_str().to_string(),
                    span,
                    reason: SkipReason::Overflow,
                });
                continue;
            }
        };

        if expanded.saturating_add(token.len()) > ParameterSet::MAX_LEN {
            scan.skipped.push(Skipped {
                text: span.slice(text).to_string(),
                span,
                reason: SkipReason::TooLarge,
            });
            continue;
        }

        expanded += token.len();
        scan.tokens.push(SpannedToken { token, span });
    }

    collect_gap(text, cursor, text.len(), &mut scan.skipped);
    scan
}

/// @ai:intent Record every non-separator run between two token matches
/// @ai:effects state:write
fn collect_gap(text: &str, from: usize, to: usize, skipped: &mut Vec<Skipped>) {
    let mut run_start: Option<usize> = None;

    for (offset, ch) in text[from..to].char_indices() {
        let index = from + offset;

        if is_separator(ch) {
            if let Some(start) = run_start.take() {
                push_unrecognized(text, start, index, skipped);
            }
        } else if run_start.is_none() {
            run_start = Some(index);
        }
    }

    if let Some(start) = run_start {
        push_unrecognized(text, start, to, skipped);
    }
}

fn push_unrecognized(text: &str, start: usize, end: usize, skipped: &mut Vec<Skipped>) {
    let span = Span::new(start, end);
    skipped.push(Skipped {
        text: span.slice(text).to_string(),
        span,
        reason: SkipReason::Unrecognized,
    });
}

fn is_separator(ch: char) -> bool {
    ch == ',' || ch.is_whitespace()
}

/// @ai:intent Expand a range expression, silently ignoring malformed text
/// @ai:post result is empty when no well-formed token is present
/// @ai:example ("1,3,5-8") -> [1, 3, 5, 6, 7, 8]
/// @ai:example ("2~2") -> [2]
/// @ai:example ("9-3") -> []
/// @ai:example ("abc") -> []
/// @ai:effects pure
pub fn parse(text: &str) -> ParameterSet {
    expand(&tokenize(text).tokens)
}

/// @ai:intent Expand a range expression, rejecting anything the lenient parser would drop
/// @ai:post Ok result is never empty
/// @ai:effects pure
pub fn parse_strict(text: &str) -> Result<ParameterSet> {
    let scan = tokenize(text);

    if let Some(skipped) = scan.skipped.into_iter().next() {
        return Err(match skipped.reason {
            SkipReason::Unrecognized => Error::Unrecognized {
                text: skipped.text,
                span: skipped.span,
            },
            SkipReason::Overflow => Error::Overflow {
                text: skipped.text,
                span: skipped.span,
            },
            SkipReason::TooLarge => Error::TooLarge {
                text: skipped.text,
                span: skipped.span,
                limit: ParameterSet::MAX_LEN,
            },
        });
    }

    for spanned in &scan.tokens {
        if let Token::Range { start, end } = spanned.token {
            if spanned.token.is_inverted() {
                return Err(Error::InvertedRange {
                    start,
                    end,
                    span: spanned.span,
                });
            }
        }
    }

    let set = expand(&scan.tokens);
    if set.is_empty() {
        return Err(Error::Empty(text.to_string()));
    }

    Ok(set)
}

/// @ai:intent Concatenate the expansions of tokens in order
/// @ai:effects pure
fn expand(tokens: &[SpannedToken]) -> ParameterSet {
    let mut set = ParameterSet::new();

    for spanned in tokens {
        set.extend(spanned.token.values());
    }

    set
}
