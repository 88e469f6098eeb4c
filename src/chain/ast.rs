//! Parsed representation of a chain expression.

use std::fmt;

/// One node reference inside a chain, e.g. `3b` in `2a.3b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Node name
    pub name: String,
    /// Leading multiplicity, 1 when omitted
    pub multiplicity: u32,
}

impl ChainLink {
    /// Create a link with an explicit multiplicity.
    pub fn new(name: impl Into<String>, multiplicity: u32) -> Self {
        Self {
            name: name.into(),
            multiplicity,
        }
    }
}

impl fmt::Display for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiplicity == 1 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}{}", self.multiplicity, self.name)
        }
    }
}

/// The links between two consecutive `.` separators.
///
/// A segment holds several links when written as `b,c` (fan-out).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    /// Links in source order
    pub links: Vec<ChainLink>,
}

/// A complete chain expression.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    /// Segments in source order
    pub segments: Vec<Segment>,
}

impl Chain {
    /// Flat, ordered sequence of every link in the chain.
    pub fn links(&self) -> impl Iterator<Item = &ChainLink> {
        self.segments.iter().flat_map(|segment| segment.links.iter())
    }

    /// Total number of links across all segments.
    pub fn link_count(&self) -> usize {
        self.segments.iter().map(|segment| segment.links.len()).sum()
    }

    /// The (source, target) pairs implied by the chain.
    ///
    /// Every link of a segment connects to every link of the next segment,
    /// so `a.b,c` yields `a→b` and `a→c`.
    pub fn edge_pairs(&self) -> Vec<(&ChainLink, &ChainLink)> {
        self.segments
            .windows(2)
            .flat_map(|pair| {
                let (sources, targets) = (&pair[0].links, &pair[1].links);
                sources
                    .iter()
                    .flat_map(move |source| targets.iter().map(move |target| (source, target)))
            })
            .collect()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            for (j, link) in segment.links.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", link)?;
            }
        }
        Ok(())
    }
}
