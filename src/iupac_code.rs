//! IUPAC nucleotide tables: complements and ambiguity inclusions.

use itertools::Itertools;

/// Written in place of any letter without a known complement.
pub const GAP: u8 = b'-';

/// Concrete and ambiguity letters, in the order the inclusion sets list them.
pub const ALPHABET: &[u8] = b"ACGTSWYRKMBDHVN";

#[inline(always)]
pub fn letter_complement(letter: u8) -> u8 {
    match letter {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'S' => b'S',
        b'W' => b'W',
        b'Y' => b'R',
        b'R' => b'Y',
        b'K' => b'M',
        b'M' => b'K',
        b'V' => b'B',
        b'B' => b'V',
        b'D' => b'H',
        b'H' => b'D',
        b'N' => b'N',
        _ => GAP,
    }
}

/// Letters an ambiguity code may stand for, itself included as the last entry.
/// Returns `None` for concrete bases and unknown letters, which only stand for
/// themselves.
#[inline(always)]
pub fn letter_inclusions(letter: u8) -> Option<&'static [u8]> {
    match letter {
        b'S' => Some(b"CGS"),
        b'W' => Some(b"ATW"),
        b'Y' => Some(b"CTY"),
        b'R' => Some(b"AGR"),
        b'K' => Some(b"GTK"),
        b'M' => Some(b"ACM"),
        b'B' => Some(b"CGTSYKB"),
        b'D' => Some(b"AGTRD"),
        b'H' => Some(b"ACTMH"),
        b'V' => Some(b"ACGSRMV"),
        b'N' => Some(b"ACGTSWYRKMN"),
        _ => None,
    }
}

pub fn complement_of(symbols: &[u8]) -> Vec<u8> {
    symbols.iter().map(|c| letter_complement(*c)).collect()
}

pub fn reverse_complement_of(symbols: &[u8]) -> Vec<u8> {
    symbols.iter().rev().map(|c| letter_complement(*c)).collect()
}

/// Number of concrete strings `expand` yields for `symbols`.
pub fn expansion_count(symbols: &[u8]) -> usize {
    symbols
        .iter()
        .map(|c| letter_inclusions(*c).map_or(1, |set| set.len()))
        .product()
}

/// Every string consistent with the ambiguity pattern `symbols`, the last
/// position varying fastest.
pub fn expand(symbols: &[u8]) -> Vec<Vec<u8>> {
    if symbols.is_empty() {
        return vec![vec![]];
    }
    symbols
        .iter()
        .map(|c| match letter_inclusions(*c) {
            Some(set) => set.to_vec(),
            None => vec![*c],
        })
        .multi_cartesian_product()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement() {
        assert_eq!(letter_complement(b'A'), b'T');
        assert_eq!(letter_complement(b'C'), b'G');
        assert_eq!(letter_complement(b'G'), b'C');
        assert_eq!(letter_complement(b'T'), b'A');
        assert_eq!(letter_complement(b'N'), b'N');
        assert_eq!(letter_complement(b'X'), GAP);
        assert_eq!(letter_complement(b'a'), GAP);
        assert_eq!(complement_of(b"ACGTX"), b"TGCA-".to_vec());
    }

    #[test]
    fn test_complement_involution() {
        for s in [&b"ACGT"[..], &b"GATTACA"[..], &b""[..], &b"TTTTGGGCCCAAA"[..]] {
            assert_eq!(complement_of(&complement_of(s)), s.to_vec());
        }
        assert_eq!(complement_of(&complement_of(ALPHABET)), ALPHABET.to_vec());
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement_of(b"AACG"), b"CGTT".to_vec());
        assert_eq!(reverse_complement_of(b"NGG"), b"CCN".to_vec());
    }

    #[test]
    fn test_expand_concrete() {
        assert_eq!(expand(b"ACGT"), vec![b"ACGT".to_vec()]);
        assert_eq!(expand(b"AXA"), vec![b"AXA".to_vec()]);
        assert_eq!(expand(b""), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_expand_order() {
        assert_eq!(
            expand(b"SW"),
            vec![
                b"CA".to_vec(),
                b"CT".to_vec(),
                b"CW".to_vec(),
                b"GA".to_vec(),
                b"GT".to_vec(),
                b"GW".to_vec(),
                b"SA".to_vec(),
                b"ST".to_vec(),
                b"SW".to_vec(),
            ]
        );
    }

    #[test]
    fn test_expansion_cardinality() {
        for pattern in [&b"NGG"[..], &b"TTTV"[..], &b"NNGRRT"[..], &b"ACGT"[..], &b"BDHVN"[..], &b"MK"[..]] {
            assert_eq!(expand(pattern).len(), expansion_count(pattern));
        }
        assert_eq!(expansion_count(b"NGG"), 11);
        assert_eq!(expansion_count(b"TTTV"), 7);
        assert_eq!(expansion_count(b"NNGRRT"), 11 * 11 * 3 * 3);
    }
}
