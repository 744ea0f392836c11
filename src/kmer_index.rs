use crate::dna_sequence::DnaSequence;
use std::collections::HashMap;
use std::sync::Arc;

/// Occurrence counts of every k-mer (k = assembly overlap size) across the
/// whole input corpus. Built once per run, queried read-only afterwards.
/// Windows never span sequence boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KmerIndex {
    k: usize,
    counts: HashMap<Vec<u8>, usize>,
}

impl KmerIndex {
    pub fn build(corpus: &[Arc<DnaSequence>], k: usize) -> Self {
        log::info!("Building {k}-mer map for overlaps...");
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
        for seq in corpus {
            log::debug!("{}", seq.id());
            if seq.len() < k {
                continue;
            }
            for kmer in seq.bases().windows(k) {
                counts
                    .entry(kmer.to_vec())
                    .and_modify(|c| *c += 1)
                    .or_insert(1);
            }
        }
        let occurrences: usize = counts.values().sum();
        log::info!(
            "Done building k-mer map. There are {} different {k}-mers with a total of {occurrences} occurrences.",
            counts.len()
        );
        Self { k, counts }
    }

    #[inline(always)]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Occurrence count of `kmer` in the corpus. Every queried k-mer is
    /// expected to have been indexed; a miss is a caller bug.
    pub fn count(&self, kmer: &[u8]) -> usize {
        debug_assert_eq!(kmer.len(), self.k);
        let count = self.counts.get(kmer).copied();
        debug_assert!(
            count.is_some(),
            "k-mer {:?} was never indexed",
            String::from_utf8_lossy(kmer)
        );
        count.unwrap_or(0)
    }

    pub fn is_unique(&self, kmer: &[u8]) -> bool {
        self.count(kmer) == 1
    }

    pub fn contains(&self, kmer: &[u8]) -> bool {
        self.counts.contains_key(kmer)
    }

    pub fn distinct_kmers(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(seqs: &[(&str, &[u8])]) -> Vec<Arc<DnaSequence>> {
        seqs.iter()
            .map(|(id, bases)| Arc::new(DnaSequence::new(*id, bases).unwrap()))
            .collect()
    }

    #[test]
    fn test_counts() {
        let corpus = corpus(&[("s1", b"ACGTACGT")]);
        let index = KmerIndex::build(&corpus, 4);
        assert_eq!(index.count(b"ACGT"), 2);
        assert_eq!(index.count(b"CGTA"), 1);
        assert!(index.is_unique(b"CGTA"));
        assert!(!index.is_unique(b"ACGT"));
        assert_eq!(index.distinct_kmers(), 4);
    }

    #[test]
    fn test_no_windows_across_sequence_boundaries() {
        let corpus = corpus(&[("s1", b"AAC"), ("s2", b"GTT")]);
        let index = KmerIndex::build(&corpus, 3);
        assert!(index.contains(b"AAC"));
        assert!(index.contains(b"GTT"));
        // the junction k-mer of a naive concatenation must not exist
        assert!(!index.contains(b"ACG"));
        assert!(!index.contains(b"CGT"));
    }

    #[test]
    fn test_sequences_shorter_than_k_are_skipped() {
        let corpus = corpus(&[("s1", b"AC"), ("s2", b"ACGT")]);
        let index = KmerIndex::build(&corpus, 3);
        assert_eq!(index.distinct_kmers(), 2);
    }

    #[test]
    fn test_build_is_idempotent() {
        let corpus = corpus(&[("s1", b"ACGTACGTAA"), ("s2", b"TTGGCCAA")]);
        let first = KmerIndex::build(&corpus, 4);
        let second = KmerIndex::build(&corpus, 4);
        assert_eq!(first, second);
    }
}
