use crate::dna_sequence::{find_all_subsequences, reverse_complement, DnaSequence};
use crate::error::{DesignError, SequenceRejection};
use crate::fragment::{design_fragments, Fragment};
use crate::kmer_index::KmerIndex;
use crate::oligo::{
    primer_pair_compatible_with_full_oligo, primer_pair_compatible_with_probe, FullOligo,
};
use crate::partition::partition_by_enzyme;
use crate::primer::{PrimerPair, PrimerRequest, PrimerSource, MIN_PRIMER_LENGTH};
use crate::restriction_enzyme::RestrictionEnzyme;
use rayon::prelude::*;
use std::sync::Arc;

/// Knobs for a pool design run. The defaults target 200-mer synthesis with
/// 40-base Gibson overlaps.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub oligo_size: usize,
    pub overlap_size: usize,
    pub primer_length: usize,
    pub optimal_tm: f64,
    pub max_primer_attempts: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            oligo_size: 200,
            overlap_size: 40,
            primer_length: 15,
            optimal_tm: 60.0,
            max_primer_attempts: 10_000,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), DesignError> {
        if self.oligo_size == 0 || self.overlap_size == 0 {
            return Err(DesignError::invalid_input(
                "Oligo size and overlap size must be positive",
            ));
        }
        if self.primer_length < MIN_PRIMER_LENGTH {
            return Err(DesignError::invalid_input(format!(
                "Primer length {} is below the minimum of {MIN_PRIMER_LENGTH}",
                self.primer_length
            )));
        }
        if self.overlap_size + 2 * self.primer_length >= self.oligo_size {
            return Err(DesignError::invalid_input(format!(
                "Overlap size {} plus two primers of length {} leave no room in a {}-base oligo",
                self.overlap_size, self.primer_length, self.oligo_size
            )));
        }
        Ok(())
    }

    /// Payload length available per oligo once primers, recognition sites and
    /// throwaway padding are accounted for. Must exceed the overlap size or
    /// fragment chains cannot advance.
    pub fn core_fragment_length(&self, enzyme: &RestrictionEnzyme) -> Result<usize, DesignError> {
        let fixed = 2 * self.primer_length
            + enzyme.top_motif_len()
            + enzyme.bottom_motif_len()
            + 2 * enzyme.throwaway_bases();
        let core = self.oligo_size.saturating_sub(fixed);
        if core <= self.overlap_size {
            return Err(DesignError::invalid_input(format!(
                "Enzyme {} leaves {core} payload bases per {}-base oligo, need more than the {}-base overlap",
                enzyme.name, self.oligo_size, self.overlap_size
            )));
        }
        Ok(core)
    }
}

/// All oligos sharing one enzyme and one amplification primer pair.
#[derive(Clone, Debug)]
pub struct EnzymePool {
    pub enzyme: RestrictionEnzyme,
    pub primer_pair: PrimerPair,
    pub oligos: Vec<FullOligo>,
}

/// The outcome of a design run: per-enzyme pools plus the sequences that had
/// to be excluded along the way.
#[derive(Debug)]
pub struct PoolDesign {
    pub pools: Vec<EnzymePool>,
    pub rejections: Vec<SequenceRejection>,
}

/// The embedded recognition motif and its reverse complement must each occur
/// exactly once, so digestion cuts each side exactly once. Motif variants the
/// oligo does not embed must be absent on both strands.
fn motif_counts_ok(enzyme: &RestrictionEnzyme, top_strand: &[u8]) -> bool {
    for (variant, motif) in enzyme.top_strand_motifs.iter().enumerate() {
        let expected = if variant == 0 { 1 } else { 0 };
        if find_all_subsequences(top_strand, motif.as_bytes()).len() != expected {
            return false;
        }
        let rc = reverse_complement(motif.as_bytes());
        if find_all_subsequences(top_strand, &rc).len() != expected {
            return false;
        }
    }
    true
}

/// Find one primer pair that amplifies every fragment of the pool cleanly,
/// and wrap the fragments into full oligos with it.
///
/// Candidate pairs are pulled from `source` until one passes all checks on
/// all oligos: each recognition motif and its reverse complement appear
/// exactly once per oligo, and the pair's 3' anchors bind where they should
/// and nowhere else. The search is bounded by `config.max_primer_attempts`.
pub fn assemble_oligos(
    fragments: &[Fragment],
    enzyme: &RestrictionEnzyme,
    source: &mut dyn PrimerSource,
    config: &PoolConfig,
) -> Result<(PrimerPair, Vec<FullOligo>), DesignError> {
    let request = PrimerRequest {
        length: config.primer_length,
        optimal_tm: config.optimal_tm,
    };
    for attempt in 1..=config.max_primer_attempts {
        let pair = match source.next_pair(&request) {
            Some(pair) => pair,
            None => {
                return Err(DesignError::search_exhausted(format!(
                    "Primer source ran dry after {} candidate pairs for enzyme {}",
                    attempt - 1,
                    enzyme.name
                )))
            }
        };
        // screen against the bare fragments before attaching the primers
        if !fragments.iter().all(|fragment| {
            primer_pair_compatible_with_probe(
                pair.left.bases(),
                pair.right.bases(),
                fragment.bases(),
            )
        }) {
            log::debug!(
                "Primer pair candidate {attempt} anneals inside a fragment, skipping"
            );
            continue;
        }
        let oligos: Vec<FullOligo> = fragments
            .iter()
            .map(|fragment| FullOligo {
                fragment: fragment.clone(),
                primer_pair: pair.clone(),
                enzyme: enzyme.clone(),
            })
            .collect();
        let ok = oligos.iter().all(|oligo| {
            let top_strand = oligo.top_strand();
            motif_counts_ok(enzyme, &top_strand)
                && primer_pair_compatible_with_full_oligo(
                    pair.left.bases(),
                    pair.right.bases(),
                    &top_strand,
                )
        });
        if ok {
            log::info!(
                "Found primer pair for enzyme {} after {attempt} attempt(s)",
                enzyme.name
            );
            return Ok((pair, oligos));
        }
        log::debug!("Rejected primer pair candidate {attempt} for enzyme {}", enzyme.name);
    }
    Err(DesignError::search_exhausted(format!(
        "No compatible primer pair for enzyme {} within {} attempts",
        enzyme.name, config.max_primer_attempts
    )))
}

/// Design a Gibson assembly oligo pool for a batch of sequences.
///
/// Sequences are grouped by compatible enzyme, fragmented into overlapping
/// pieces whose junction k-mers are unique across the whole input corpus,
/// and wrapped into full oligos with one shared primer pair per group.
/// Per-sequence failures become rejections; malformed configuration or an
/// exhausted primer search abort the run.
pub fn design_pool(
    sequences: Vec<DnaSequence>,
    enzymes: &[RestrictionEnzyme],
    config: &PoolConfig,
    source: &mut dyn PrimerSource,
) -> Result<PoolDesign, DesignError> {
    config.validate()?;
    if enzymes.is_empty() {
        return Err(DesignError::invalid_input("No restriction enzymes given"));
    }
    for enzyme in enzymes {
        enzyme.check_motif_lengths()?;
    }
    if sequences.is_empty() {
        return Err(DesignError::invalid_input("No input sequences given"));
    }

    let sequences: Vec<Arc<DnaSequence>> = sequences.into_iter().map(Arc::new).collect();
    log::info!("Designing oligo pool for {} sequences", sequences.len());

    let (groups, mut rejections) = partition_by_enzyme(&sequences, enzymes);

    // Junction uniqueness is judged against every input sequence, so oligos
    // from different enzyme groups cannot cross-assemble either.
    let index = KmerIndex::build(&sequences, config.overlap_size);

    let mut pools = vec![];
    for (enzyme, members) in groups {
        let core_len = config.core_fragment_length(&enzyme)?;
        log::info!(
            "Enzyme {}: {} sequences, {core_len} payload bases per oligo",
            enzyme.name,
            members.len()
        );
        let results: Vec<Result<Vec<Fragment>, SequenceRejection>> = members
            .par_iter()
            .map(|seq| design_fragments(seq, core_len, &index))
            .collect();
        let mut fragments = vec![];
        for result in results {
            match result {
                Ok(chain) => fragments.extend(chain),
                Err(rejection) => rejections.push(rejection),
            }
        }
        if fragments.is_empty() {
            log::warn!("No fragments survived for enzyme {}", enzyme.name);
            continue;
        }
        fragments.sort();
        let (primer_pair, oligos) = assemble_oligos(&fragments, &enzyme, source, config)?;
        log::info!(
            "Enzyme {}: {} oligos with primer pair {}/{}",
            enzyme.name,
            oligos.len(),
            String::from_utf8_lossy(primer_pair.left.bases()),
            String::from_utf8_lossy(primer_pair.right.bases())
        );
        pools.push(EnzymePool {
            enzyme,
            primer_pair,
            oligos,
        });
    }

    Ok(PoolDesign { pools, rejections })
}
