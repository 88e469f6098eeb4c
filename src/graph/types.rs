//! Core types for graph representation.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::quantity::{self, Quantity};

/// A named node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique, case-sensitive name
    pub name: String,
    /// Quantity from the last propagation, if any
    pub quantity: Option<Quantity>,
}

impl Node {
    /// Create an unquantified node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
        }
    }
}

/// The conversion ratio carried by an edge.
///
/// `source_quantity` units of the source correspond to `target_quantity`
/// units of the target. Both sides are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRatio {
    source: NonZeroU32,
    target: NonZeroU32,
}

impl EdgeRatio {
    /// The 1:1 ratio used when a chain carries no multiplicities.
    pub const UNIT: EdgeRatio = EdgeRatio {
        source: NonZeroU32::MIN,
        target: NonZeroU32::MIN,
    };

    /// Create a ratio; `None` if either side is zero.
    pub fn new(source_quantity: u32, target_quantity: u32) -> Option<Self> {
        Some(Self {
            source: NonZeroU32::new(source_quantity)?,
            target: NonZeroU32::new(target_quantity)?,
        })
    }

    /// Multiplicity on the source side.
    pub fn source_quantity(&self) -> u32 {
        self.source.get()
    }

    /// Multiplicity on the target side.
    pub fn target_quantity(&self) -> u32 {
        self.target.get()
    }

    /// Quantity of the target implied by `source_amount` of the source.
    pub fn apply(&self, source_amount: &Quantity) -> Quantity {
        source_amount * quantity::from_integer(u64::from(self.target_quantity()))
            / quantity::from_integer(u64::from(self.source_quantity()))
    }
}

impl Default for EdgeRatio {
    fn default() -> Self {
        Self::UNIT
    }
}

impl fmt::Display for EdgeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

/// A flat, owned description of one edge, used for list views and export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source node name
    pub source: String,
    /// Target node name
    pub target: String,
    /// Multiplicity on the source side
    #[serde(default = "default_multiplicity")]
    pub source_quantity: u32,
    /// Multiplicity on the target side
    #[serde(default = "default_multiplicity")]
    pub target_quantity: u32,
}

fn default_multiplicity() -> u32 {
    1
}

impl EdgeRecord {
    /// A 1:1 record, as implied by a legacy `[source, target]` pair.
    pub fn unit(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_quantity: 1,
            target_quantity: 1,
        }
    }

    /// The ratio of this record, if both sides are at least 1.
    pub fn ratio(&self) -> Option<EdgeRatio> {
        EdgeRatio::new(self.source_quantity, self.target_quantity)
    }
}

impl fmt::Display for EdgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(f: &mut fmt::Formatter<'_>, multiplicity: u32, name: &str) -> fmt::Result {
            if multiplicity == 1 {
                write!(f, "{}", name)
            } else {
                write!(f, "{}{}", multiplicity, name)
            }
        }
        side(f, self.source_quantity, &self.source)?;
        write!(f, " → ")?;
        side(f, self.target_quantity, &self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_rejects_zero() {
        assert!(EdgeRatio::new(0, 1).is_none());
        assert!(EdgeRatio::new(1, 0).is_none());
        assert_eq!(EdgeRatio::new(1, 1), Some(EdgeRatio::UNIT));
    }

    #[test]
    fn test_ratio_apply() {
        let ratio = EdgeRatio::new(2, 3).unwrap();
        assert_eq!(ratio.apply(&quantity::from_integer(10)), quantity::from_integer(15));
        assert_eq!(ratio.to_string(), "2:3");
    }

    #[test]
    fn test_edge_record_display() {
        let record = EdgeRecord {
            source: "a".into(),
            target: "b".into(),
            source_quantity: 2,
            target_quantity: 3,
        };
        assert_eq!(record.to_string(), "2a → 3b");
    }
}
