//! Section, block and image identifiers.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::time_now_millis;

/// Identifier of a section, block or image item.
///
/// Values are millisecond timestamps (bumped to stay unique), so a larger
/// id was allocated later. Document order never depends on id values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(pub u64);

/// Largest identifier a stored document may carry: the largest integer a
/// JSON number holds exactly in the browser.
pub const MAX_IDENTIFIER: u64 = (1 << 53) - 1;

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}

/// Accepts integers, floats (older documents carried fractional ids) and
/// numeric strings, up to [`MAX_IDENTIFIER`].
struct IdentifierVisitor;

impl Visitor<'_> for IdentifierVisitor {
    type Value = Identifier;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric identifier")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Identifier, E> {
        if v > MAX_IDENTIFIER {
            return Err(E::custom(format!("identifier {v} out of range")));
        }
        Ok(Identifier(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Identifier, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(format!("negative identifier {v}")))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Identifier, E> {
        if v.is_finite() && v >= 0.0 && v < (MAX_IDENTIFIER + 1) as f64 {
            Ok(Identifier(v as u64))
        } else {
            Err(E::custom(format!("invalid identifier {v}")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Identifier, E> {
        let trimmed = v.trim();
        if let Ok(n) = trimmed.parse::<u64>() {
            return self.visit_u64(n);
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid identifier {v:?}")))
            .and_then(|f| self.visit_f64(f))
    }
}

/// Allocates identifiers that never repeat within the allocator's lifetime.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh identifier.
    pub fn next(&mut self) -> Identifier {
        self.last = self.last.saturating_add(1).max(time_now_millis());
        Identifier(self.last)
    }

    /// Record an externally sourced identifier so later allocations stay above it.
    pub fn observe(&mut self, id: Identifier) {
        self.last = self.last.max(id.0);
    }

    /// The most recently issued or observed identifier.
    pub fn last(&self) -> Identifier {
        Identifier(self.last)
    }
}
