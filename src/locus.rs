//! Strand-qualified coordinate windows and their composition.

use serde::{Deserialize, Serialize};
use std::{fmt, ops::Add};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub const BOTH: [Strand; 2] = [Strand::Forward, Strand::Reverse];

    #[inline(always)]
    pub fn flip(self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    #[inline(always)]
    pub fn is_forward(self) -> bool {
        self == Strand::Forward
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// A window of `length` symbols starting at `position` on `strand`.
///
/// The position is never normalised here; it is resolved modulo the length of
/// a concrete sequence only when a window is extracted from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locus {
    pub position: i64,
    pub length: usize,
    pub strand: Strand,
}

impl Locus {
    pub fn new(position: i64, length: usize, strand: Strand) -> Self {
        Self {
            position,
            length,
            strand,
        }
    }

    pub fn forward(position: i64, length: usize) -> Self {
        Self::new(position, length, Strand::Forward)
    }

    pub fn reverse(position: i64, length: usize) -> Self {
        Self::new(position, length, Strand::Reverse)
    }

    /// Resolves `relative`, whose position counts along the reading direction
    /// of this locus. Unlike `+`, the offset is mirrored on the reverse strand,
    /// so an upstream window stays upstream of a reverse-strand site.
    pub fn oriented(&self, relative: Locus) -> Locus {
        let offset = match self.strand {
            Strand::Forward => relative.position,
            Strand::Reverse => relative.position.wrapping_neg(),
        };
        Locus {
            position: self.position.wrapping_add(offset),
            ..(*self + relative)
        }
    }
}

/// `a + b` expresses `b` in the frame of `a`: positions add up, the length is
/// taken from `b`, and a reverse `b` flips the strand of `a`.
///
/// Positions wrap around at the limits of `i64` instead of overflowing.
impl Add for Locus {
    type Output = Locus;

    fn add(self, other: Locus) -> Locus {
        let strand = match other.strand {
            Strand::Forward => self.strand,
            Strand::Reverse => self.strand.flip(),
        };
        Locus {
            position: self.position.wrapping_add(other.position),
            length: other.length,
            strand,
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}:{}", self.strand, self.position, self.length)
    }
}
