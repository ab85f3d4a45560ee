//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit.
///
/// Upstream of the mapper this is a logical id, stable for the lifetime of
/// the qubit. Downstream of the mapper the same type carries physical
/// (backend) ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The raw index.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<QubitId> for u32 {
    fn from(id: QubitId) -> Self {
        id.0
    }
}
