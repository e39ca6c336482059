use crate::{
    error::Result,
    iupac_code,
    locus::{Locus, Strand},
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt, fs,
    hash::{Hash, Hasher},
    ops::{Add, Neg},
    sync::Arc,
};

type DNAstring = Vec<u8>;

const RECORD_HEADER: &str = ">";
const FILE_COMMENT: &str = "!";

/// An immutable nucleotide sequence, read as a circular molecule.
///
/// The reverse strand (the complement of the forward strand, read back to
/// front) is derived on first use and shared by every clone afterwards.
#[derive(Clone)]
pub struct GeneticSequence {
    forward: Arc<[u8]>,
    reverse: Arc<OnceCell<DNAstring>>,
}

impl GeneticSequence {
    pub fn from_sequence(sequence: &str) -> Self {
        Self::from_u8(sequence.as_bytes())
    }

    pub fn from_u8(s: &[u8]) -> Self {
        Self {
            forward: Arc::from(s),
            reverse: Arc::new(OnceCell::new()),
        }
    }

    fn with_reverse(forward: &[u8], reverse: &[u8]) -> Self {
        Self {
            forward: Arc::from(forward),
            reverse: Arc::new(OnceCell::with_value(reverse.to_vec())),
        }
    }

    #[inline(always)]
    pub fn forward(&self) -> &[u8] {
        &self.forward
    }

    #[inline(always)]
    pub fn reverse(&self) -> &[u8] {
        self.reverse
            .get_or_init(|| iupac_code::reverse_complement_of(&self.forward))
    }

    #[inline(always)]
    pub fn strand(&self, strand: Strand) -> &[u8] {
        match strand {
            Strand::Forward => self.forward(),
            Strand::Reverse => self.reverse(),
        }
    }

    pub fn get_forward_string(&self) -> String {
        String::from_utf8_lossy(self.forward()).to_string()
    }

    pub fn get_reverse_string(&self) -> String {
        String::from_utf8_lossy(self.reverse()).to_string()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Forward base at `i`, wrapping around the origin.
    #[inline(always)]
    pub fn get_base_circular(&self, i: usize) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        self.forward.get(i % self.len()).copied()
    }

    /// Swaps the two strands without recomputing either of them.
    pub fn negate(&self) -> Self {
        Self::with_reverse(self.reverse(), self.forward())
    }

    pub fn concat(&self, other: &Self) -> Self {
        let mut joined = Vec::with_capacity(self.len() + other.len());
        joined.extend_from_slice(self.forward());
        joined.extend_from_slice(other.forward());
        Self::from_u8(&joined)
    }

    /// One concrete sequence for every way of resolving the ambiguity codes.
    pub fn instances(&self) -> Vec<Self> {
        iupac_code::expand(self.forward())
            .into_iter()
            .map(|instance| Self::from_u8(&instance))
            .collect()
    }

    /// The circular window described by `locus`.
    ///
    /// Position 0 on the reverse strand is the complement of the last forward
    /// base, so a reverse window at position `p` covers forward bases
    /// `p - length .. p`.
    pub fn extract(&self, locus: &Locus) -> Self {
        let len = self.len();
        if len == 0 {
            return Self::from_u8(&[]);
        }
        let len_i64 = len as i64;
        let position = locus.position.rem_euclid(len_i64);
        let start = match locus.strand {
            Strand::Forward => position,
            Strand::Reverse => (len_i64 - position).rem_euclid(len_i64),
        };
        let start = start as usize;
        let stop = start.saturating_add(locus.length);
        let strand = self.strand(locus.strand);

        let mut window = Vec::with_capacity(locus.length.min(2 * len));
        window.extend_from_slice(&strand[start..stop.min(len)]);
        window.extend_from_slice(&strand[..stop.saturating_sub(len).min(len)]);
        Self::from_u8(&window)
    }

    /// Parses `>`-headed records; lines starting with `!` are comments and
    /// every other line is appended to the current record.
    pub fn from_fasta(text: &str) -> Vec<(String, Self)> {
        let mut ret = vec![];
        let mut current: Option<(String, String)> = None;
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some(name) = line.strip_prefix(RECORD_HEADER) {
                if let Some((name, seq)) = current.take() {
                    ret.push((name, Self::from(seq)));
                }
                current = Some((name.to_string(), String::new()));
            } else if line.starts_with(FILE_COMMENT) {
                continue;
            } else if let Some((_, seq)) = current.as_mut() {
                seq.push_str(line);
            }
        }
        if let Some((name, seq)) = current {
            ret.push((name, Self::from(seq)));
        }
        ret
    }

    pub fn from_fasta_file(filename: &str) -> Result<Vec<(String, Self)>> {
        let text = fs::read_to_string(filename)?;
        Ok(Self::from_fasta(&text))
    }
}

impl Neg for GeneticSequence {
    type Output = GeneticSequence;

    fn neg(self) -> GeneticSequence {
        self.negate()
    }
}

impl Neg for &GeneticSequence {
    type Output = GeneticSequence;

    fn neg(self) -> GeneticSequence {
        self.negate()
    }
}

impl Add for &GeneticSequence {
    type Output = GeneticSequence;

    fn add(self, other: &GeneticSequence) -> GeneticSequence {
        self.concat(other)
    }
}

impl Add for GeneticSequence {
    type Output = GeneticSequence;

    fn add(self, other: GeneticSequence) -> GeneticSequence {
        self.concat(&other)
    }
}

impl PartialEq for GeneticSequence {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward
    }
}

impl Eq for GeneticSequence {}

impl Hash for GeneticSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forward.hash(state);
    }
}

impl fmt::Display for GeneticSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.forward()))
    }
}

impl fmt::Debug for GeneticSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GeneticSequence({self})")
    }
}

impl From<String> for GeneticSequence {
    fn from(s: String) -> Self {
        GeneticSequence::from_u8(s.as_bytes())
    }
}

impl From<&str> for GeneticSequence {
    fn from(s: &str) -> Self {
        GeneticSequence::from_sequence(s)
    }
}

impl Serialize for GeneticSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.get_forward_string())
    }
}

impl<'de> Deserialize<'de> for GeneticSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}
