use crate::dna_sequence::{occurs_exactly_once, reverse_complement, find_subsequence};
use crate::fragment::Fragment;
use crate::primer::PrimerPair;
use crate::restriction_enzyme::RestrictionEnzyme;
use std::cmp::Ordering;

/// Length of the 3' primer anchor whose binding sites decide whether a primer
/// pair can amplify an oligo cleanly.
pub const PRIMER_ANCHOR_LEN: usize = 8;

/// Disposable base padding between a recognition site and the payload.
pub const THROWAWAY_BASE: u8 = b'T';

/// A synthesizable oligo: the payload fragment wrapped in cleavage sites and
/// amplification primers. The top strand reads
///
/// `left_primer  motif  throwaway  fragment  throwaway  rc(motif)  rc(right_primer)`
///
/// so that after amplification and TypeIIS digestion only the fragment with
/// its overlap ends remains.
#[derive(Clone, Debug)]
pub struct FullOligo {
    pub fragment: Fragment,
    pub primer_pair: PrimerPair,
    pub enzyme: RestrictionEnzyme,
}

impl FullOligo {
    pub fn top_strand(&self) -> Vec<u8> {
        let motif = self.enzyme.leading_motif();
        let throwaway = self.enzyme.throwaway_bases();
        let mut out = Vec::with_capacity(
            self.primer_pair.left.len()
                + self.primer_pair.right.len()
                + 2 * motif.len()
                + 2 * throwaway
                + self.fragment.size(),
        );
        out.extend_from_slice(self.primer_pair.left.bases());
        out.extend_from_slice(motif);
        out.extend(std::iter::repeat(THROWAWAY_BASE).take(throwaway));
        out.extend_from_slice(self.fragment.bases());
        out.extend(std::iter::repeat(THROWAWAY_BASE).take(throwaway));
        out.extend_from_slice(&reverse_complement(motif));
        out.extend_from_slice(&reverse_complement(self.primer_pair.right.bases()));
        out
    }
}

impl PartialEq for FullOligo {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FullOligo {}

impl PartialOrd for FullOligo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FullOligo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fragment.cmp(&other.fragment)
    }
}

fn anchor(primer: &[u8]) -> &[u8] {
    &primer[primer.len() - PRIMER_ANCHOR_LEN..]
}

/// Whether `left` and `right` can amplify `oligo` without mispriming. The
/// left anchor must bind the top strand exactly once and the right anchor the
/// bottom strand exactly once; neither may bind the opposite strand.
pub fn primer_pair_compatible_with_full_oligo(left: &[u8], right: &[u8], oligo: &[u8]) -> bool {
    let left_anchor = anchor(left);
    let right_anchor = anchor(right);
    occurs_exactly_once(oligo, left_anchor)
        && occurs_exactly_once(oligo, &reverse_complement(right_anchor))
        && find_subsequence(oligo, &reverse_complement(left_anchor), 0).is_none()
        && find_subsequence(oligo, right_anchor, 0).is_none()
}

/// Whether `left` and `right` stay inert against a foreign sequence: no
/// anchor may bind either strand of `probe`.
pub fn primer_pair_compatible_with_probe(left: &[u8], right: &[u8], probe: &[u8]) -> bool {
    let left_anchor = anchor(left);
    let right_anchor = anchor(right);
    find_subsequence(probe, left_anchor, 0).is_none()
        && find_subsequence(probe, &reverse_complement(left_anchor), 0).is_none()
        && find_subsequence(probe, right_anchor, 0).is_none()
        && find_subsequence(probe, &reverse_complement(right_anchor), 0).is_none()
}
