use crate::error::DesignError;
use anyhow::{Context, Result};
use bio::io::fasta;
use serde::{Deserialize, Serialize};
use std::fs::File;

pub type DnaString = Vec<u8>;

/// A named nucleotide sequence. Bases are uppercased on construction and
/// restricted to A/C/G/T/U; anything else is a fatal input error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaSequence {
    id: String,
    bases: DnaString,
}

impl DnaSequence {
    pub fn new(id: impl Into<String>, bases: &[u8]) -> Result<Self, DesignError> {
        let id = id.into();
        let mut normalized = Vec::with_capacity(bases.len());
        for base in bases {
            let upper = base.to_ascii_uppercase();
            match upper {
                b'A' | b'C' | b'G' | b'T' | b'U' => normalized.push(upper),
                _ => {
                    return Err(DesignError::invalid_input(format!(
                        "Base '{}' not allowed in sequence {id}",
                        *base as char
                    )))
                }
            }
        }
        Ok(Self {
            id,
            bases: normalized,
        })
    }

    pub fn from_fasta_file(filename: &str) -> Result<Vec<DnaSequence>> {
        let file =
            File::open(filename).with_context(|| format!("Could not open '{filename}'"))?;
        let mut ret = vec![];
        for record in fasta::Reader::new(file).records() {
            let record =
                record.with_context(|| format!("Could not parse fasta record in '{filename}'"))?;
            ret.push(DnaSequence::new(record.id(), record.seq())?);
        }
        Ok(ret)
    }

    #[inline(always)]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline(always)]
    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn contains(&self, needle: &[u8]) -> bool {
        find_subsequence(&self.bases, needle, 0).is_some()
    }
}

#[inline(always)]
pub fn letter_complement(letter: u8) -> u8 {
    match letter {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'U' => b'A',
        other => other,
    }
}

pub fn reverse_complement(seq: &[u8]) -> DnaString {
    seq.iter().rev().map(|c| letter_complement(*c)).collect()
}

pub fn find_subsequence(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() || start >= haystack.len() {
        return None;
    }
    let end = haystack.len() - needle.len();
    (start..=end).find(|idx| &haystack[*idx..*idx + needle.len()] == needle)
}

/// All (possibly overlapping) match positions of `needle` in `haystack`.
pub fn find_all_subsequences(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let mut ret = vec![];
    if needle.is_empty() || haystack.len() < needle.len() {
        return ret;
    }
    let mut start = 0usize;
    while let Some(pos) = find_subsequence(haystack, needle, start) {
        ret.push(pos);
        start = pos + 1;
        if start >= haystack.len() {
            break;
        }
    }
    ret
}

pub fn occurs_exactly_once(haystack: &[u8], needle: &[u8]) -> bool {
    match find_subsequence(haystack, needle, 0) {
        Some(first) => find_subsequence(haystack, needle, first + 1).is_none(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_case() {
        let seq = DnaSequence::new("s1", b"acgtU").unwrap();
        assert_eq!(seq.bases(), b"ACGTU");
        assert_eq!(seq.id(), "s1");
        assert_eq!(seq.len(), 5);
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        let err = DnaSequence::new("s1", b"ACGTN").unwrap_err();
        assert!(err.to_string().contains("Base 'N' not allowed"));
        assert!(DnaSequence::new("s2", b"ACX").is_err());
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT".to_vec());
        assert_eq!(reverse_complement(b"AAAACCCC"), b"GGGGTTTT".to_vec());
        assert_eq!(reverse_complement(b"GGTCTC"), b"GAGACC".to_vec());
        // U pairs like T
        assert_eq!(reverse_complement(b"AU"), b"AT".to_vec());
    }

    #[test]
    fn test_find_all_subsequences_overlapping() {
        assert_eq!(find_all_subsequences(b"AAAA", b"AA"), vec![0, 1, 2]);
        assert_eq!(find_all_subsequences(b"ACGT", b"TT"), Vec::<usize>::new());
        assert_eq!(find_all_subsequences(b"ACGTACGT", b"ACGT"), vec![0, 4]);
    }

    #[test]
    fn test_occurs_exactly_once() {
        assert!(occurs_exactly_once(b"ACGTAAAA", b"ACGT"));
        assert!(!occurs_exactly_once(b"ACGTACGT", b"ACGT"));
        assert!(!occurs_exactly_once(b"AAAA", b"ACGT"));
    }

    #[test]
    fn test_contains() {
        let seq = DnaSequence::new("s1", b"ACGTACGT").unwrap();
        assert!(seq.contains(b"GTAC"));
        assert!(!seq.contains(b"GGGG"));
    }
}
