//! @ai:module:intent Ordered integer sequence driving one sweep axis
//! @ai:module:layer domain
//! @ai:module:public_api ParameterSet
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent Ordered integers expanded from one range expression
/// @ai:invariant order is order of appearance; duplicates are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ParameterSet(Vec<u32>);

impl ParameterSet {
    /// Upper bound on the values one expression may expand to. Tokens that
    /// would cross it are skipped, so `0-4294967295` cannot exhaust memory.
    pub const MAX_LEN: usize = 1_000_000;

    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }

    /// @ai:intent Append a run of values in order
    /// @ai:effects state:write
    pub fn extend<I: IntoIterator<Item = u32>>(&mut self, values: I) {
        self.0.extend(values);
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

impl From<Vec<u32>> for ParameterSet {
    fn from(values: Vec<u32>) -> Self {
        Self(values)
    }
}

impl FromIterator<u32> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Comma-joined, so that the output is itself a valid range expression.
impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}
