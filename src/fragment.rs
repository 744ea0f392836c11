use crate::dna_sequence::DnaSequence;
use crate::error::SequenceRejection;
use crate::kmer_index::KmerIndex;
use std::cmp::Ordering;
use std::sync::Arc;

/// A frozen view into a parent sequence, emitted by the fragment designer.
/// Ordered by `(parent id, start)` for deterministic pooling.
#[derive(Clone, Debug)]
pub struct Fragment {
    parent: Arc<DnaSequence>,
    start: usize,
    size: usize,
}

impl Fragment {
    fn new(parent: Arc<DnaSequence>, start: usize, size: usize) -> Self {
        debug_assert!(start + size <= parent.len());
        Self {
            parent,
            start,
            size,
        }
    }

    #[inline(always)]
    pub fn parent(&self) -> &Arc<DnaSequence> {
        &self.parent
    }

    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bases(&self) -> &[u8] {
        &self.parent.bases()[self.start..self.start + self.size]
    }

    pub fn id(&self) -> String {
        format!("{}_{}_{}", self.parent.id(), self.start, self.end())
    }
}

impl PartialEq for Fragment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fragment {}

impl PartialOrd for Fragment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fragment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parent
            .id()
            .cmp(other.parent.id())
            .then(self.start.cmp(&other.start))
            .then(self.size.cmp(&other.size))
    }
}

/// A fragment candidate in the working arena. Half-open `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Candidate {
    start: usize,
    end: usize,
}

impl Candidate {
    fn size(&self) -> usize {
        self.end - self.start
    }
}

fn left_end_unique(parent: &DnaSequence, candidate: Candidate, index: &KmerIndex) -> bool {
    let k = index.k();
    let kmer = &parent.bases()[candidate.start..candidate.start + k];
    let unique = index.is_unique(kmer);
    if !unique {
        log::debug!(
            "Left end k-mer {} of {}[{}..{}] appears {} times",
            String::from_utf8_lossy(kmer),
            parent.id(),
            candidate.start,
            candidate.end,
            index.count(kmer)
        );
    }
    unique
}

fn right_end_unique(parent: &DnaSequence, candidate: Candidate, index: &KmerIndex) -> bool {
    let k = index.k();
    let kmer = &parent.bases()[candidate.end - k..candidate.end];
    let unique = index.is_unique(kmer);
    if !unique {
        log::debug!(
            "Right end k-mer {} of {}[{}..{}] appears {} times",
            String::from_utf8_lossy(kmer),
            parent.id(),
            candidate.start,
            candidate.end,
            index.count(kmer)
        );
    }
    unique
}

fn reject(parent: &DnaSequence) -> SequenceRejection {
    let rejection = SequenceRejection::region_with_no_unique_kmers(parent.id());
    log::warn!("{rejection}");
    rejection
}

/// Partition `parent` into a chain of overlapping fragments of roughly
/// `target_len` bases whose junction k-mers are each unique in the corpus.
///
/// Consecutive fragments share exactly `index.k()` bases at the junction.
/// A parent for which no such chain exists is rejected as a whole; the
/// rejection is recoverable at the batch level.
///
/// Precondition: `target_len > index.k()` (checked by the pool config).
pub fn design_fragments(
    parent: &Arc<DnaSequence>,
    target_len: usize,
    index: &KmerIndex,
) -> Result<Vec<Fragment>, SequenceRejection> {
    let overlap = index.k();
    debug_assert!(target_len > overlap);
    log::info!(
        "Designing overlapping fragments of length {target_len} for sequence {}...",
        parent.id()
    );
    let n = parent.len();

    // A short parent becomes a single fragment, if its terminal k-mers allow it.
    if n <= target_len {
        if n < overlap {
            return Err(reject(parent));
        }
        let whole = Candidate { start: 0, end: n };
        if !left_end_unique(parent, whole, index) || !right_end_unique(parent, whole, index) {
            log::warn!(
                "Sequence {} is shorter than the target length and its ends are not unique",
                parent.id()
            );
            return Err(reject(parent));
        }
        return Ok(vec![Fragment::new(parent.clone(), 0, n)]);
    }

    let mut arena: Vec<Candidate> = vec![];

    // Seed fragment: trade position for uniqueness on both ends.
    let mut first = Candidate {
        start: 0,
        end: target_len,
    };
    while !left_end_unique(parent, first, index) {
        first.start += 1;
        if first.size() < overlap {
            return Err(reject(parent));
        }
    }
    while !right_end_unique(parent, first, index) {
        first.end -= 1;
        if first.size() < overlap {
            return Err(reject(parent));
        }
    }
    log::debug!(
        "Accepted seed fragment {}[{}..{}]",
        parent.id(),
        first.start,
        first.end
    );
    arena.push(first);
    let mut last_end = first.end;

    // Middle fragments: each starts one overlap before the previous end. A
    // non-unique junction shifts the new fragment left and shrinks the
    // previous fragment's right edge in lockstep, keeping the shared overlap
    // aligned. Running out of room means the region has no unique k-mer.
    while last_end - overlap < n - target_len {
        let mut candidate = Candidate {
            start: last_end - overlap,
            end: last_end - overlap + target_len,
        };
        while !left_end_unique(parent, candidate, index) {
            let previous = arena.last_mut().expect("arena holds the seed fragment");
            if candidate.start <= previous.start + 1 {
                return Err(reject(parent));
            }
            candidate.start -= 1;
            candidate.end -= 1;
            previous.end -= 1;
            log::debug!(
                "Shifted fragment to {}[{}..{}], previous right edge now {}",
                parent.id(),
                candidate.start,
                candidate.end,
                previous.end
            );
        }
        log::debug!(
            "Accepted fragment {}[{}..{}]",
            parent.id(),
            candidate.start,
            candidate.end
        );
        arena.push(candidate);
        last_end = candidate.end;
    }

    // Tail fragment covers the rest of the parent; only its right end still
    // needs a unique k-mer.
    let final_start = last_end - overlap;
    debug_assert!(n - final_start <= target_len);
    let mut tail = Candidate {
        start: final_start,
        end: n,
    };
    while !right_end_unique(parent, tail, index) {
        tail.end -= 1;
        if tail.size() < overlap {
            return Err(reject(parent));
        }
    }
    log::debug!(
        "Accepted tail fragment {}[{}..{}]",
        parent.id(),
        tail.start,
        tail.end
    );
    arena.push(tail);

    Ok(arena
        .into_iter()
        .map(|c| Fragment::new(parent.clone(), c.start, c.size()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionCode;

    /// Deterministic base stream for building test corpora.
    fn lcg_bases(seed: u64, len: usize) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                b"ACGT"[(state >> 33) as usize % 4]
            })
            .collect()
    }

    /// A sequence whose k-mers are all unique within itself.
    fn unique_sequence(id: &str, len: usize, k: usize) -> Arc<DnaSequence> {
        for seed in 1u64.. {
            let bases = lcg_bases(seed, len);
            let seq = Arc::new(DnaSequence::new(id, &bases).unwrap());
            let index = KmerIndex::build(&[seq.clone()], k);
            if index.distinct_kmers() == len - k + 1 {
                return seq;
            }
        }
        unreachable!()
    }

    #[test]
    fn test_single_fragment_for_short_sequence() {
        let seq = unique_sequence("short", 100, 8);
        let corpus = vec![seq.clone()];
        let index = KmerIndex::build(&corpus, 8);
        let fragments = design_fragments(&seq, 150, &index).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].start(), 0);
        assert_eq!(fragments[0].size(), 100);
    }

    #[test]
    fn test_short_sequence_with_nonunique_ends_is_rejected() {
        // both terminal 4-mers of s1 also occur in s2
        let s1 = Arc::new(DnaSequence::new("s1", b"AAAATTTTGGGG").unwrap());
        let s2 = Arc::new(DnaSequence::new("s2", b"AAAACCCCGGGG").unwrap());
        let corpus = vec![s1.clone(), s2];
        let index = KmerIndex::build(&corpus, 4);
        let err = design_fragments(&s1, 20, &index).unwrap_err();
        assert_eq!(err.code, RejectionCode::RegionWithNoUniqueKmers);
        assert_eq!(err.sequence_id, "s1");
    }

    #[test]
    fn test_chain_overlaps_exactly_by_k() {
        let k = 40;
        let seq = unique_sequence("t1", 500, k);
        let corpus = vec![seq.clone()];
        let index = KmerIndex::build(&corpus, k);
        let fragments = design_fragments(&seq, 158, &index).unwrap();
        assert!(fragments.len() > 1);
        assert_eq!(fragments[0].start(), 0);
        assert_eq!(fragments.last().unwrap().end(), 500);
        for pair in fragments.windows(2) {
            assert_eq!(pair[1].start() + k, pair[0].end());
            let junction = &pair[1].bases()[..k];
            assert_eq!(junction, &pair[0].bases()[pair[0].size() - k..]);
            assert!(index.is_unique(junction));
        }
    }

    #[test]
    fn test_fragment_bases_round_trip() {
        let k = 16;
        let seq = unique_sequence("t2", 300, k);
        let corpus = vec![seq.clone()];
        let index = KmerIndex::build(&corpus, k);
        let fragments = design_fragments(&seq, 80, &index).unwrap();
        for fragment in &fragments {
            let direct = &seq.bases()[fragment.start()..fragment.start() + fragment.size()];
            assert_eq!(fragment.bases(), direct);
        }
    }

    #[test]
    fn test_design_is_idempotent() {
        let k = 16;
        let seq = unique_sequence("t3", 300, k);
        let corpus = vec![seq.clone()];
        let index = KmerIndex::build(&corpus, k);
        let first = design_fragments(&seq, 80, &index).unwrap();
        let second = design_fragments(&seq, 80, &index).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shared_region_moves_junction_or_rejects() {
        // Two parents sharing a long identical stretch: no k-mer inside the
        // shared stretch is unique, so junctions must land outside it or the
        // parents must be rejected.
        let k = 12;
        let shared = lcg_bases(7, 60);
        let left = lcg_bases(11, 120);
        let right = lcg_bases(13, 120);
        let mut b1 = left.clone();
        b1.extend_from_slice(&shared);
        b1.extend_from_slice(&right);
        let mut b2 = right.clone();
        b2.extend_from_slice(&shared);
        b2.extend_from_slice(&left);
        let s1 = Arc::new(DnaSequence::new("p1", &b1).unwrap());
        let s2 = Arc::new(DnaSequence::new("p2", &b2).unwrap());
        let corpus = vec![s1.clone(), s2];
        let index = KmerIndex::build(&corpus, k);
        match design_fragments(&s1, 100, &index) {
            Ok(fragments) => {
                for pair in fragments.windows(2) {
                    let junction = &pair[1].bases()[..k];
                    assert!(index.is_unique(junction));
                }
            }
            Err(rejection) => {
                assert_eq!(rejection.code, RejectionCode::RegionWithNoUniqueKmers);
            }
        }
    }

    #[test]
    fn test_ordering_by_parent_then_start() {
        let a = Arc::new(DnaSequence::new("a", b"ACGTACGTACGT").unwrap());
        let b = Arc::new(DnaSequence::new("b", b"ACGTACGTACGT").unwrap());
        let mut fragments = vec![
            Fragment::new(b.clone(), 0, 4),
            Fragment::new(a.clone(), 4, 4),
            Fragment::new(a.clone(), 0, 4),
        ];
        fragments.sort();
        assert_eq!(fragments[0].parent().id(), "a");
        assert_eq!(fragments[0].start(), 0);
        assert_eq!(fragments[1].start(), 4);
        assert_eq!(fragments[2].parent().id(), "b");
    }
}
