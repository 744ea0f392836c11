use crate::dna_sequence::DnaSequence;
use crate::error::SequenceRejection;
use crate::restriction_enzyme::RestrictionEnzyme;
use std::sync::Arc;

/// Group sequences by the TypeIIS enzyme that will flank their oligos. An
/// enzyme is compatible with a sequence iff none of its recognition motifs
/// (nor their reverse complements) occur in the sequence.
///
/// If one enzyme is compatible with every input sequence, all sequences go
/// into a single group for it. Otherwise each sequence is assigned to the
/// first compatible enzyme in priority order. Sequences with no compatible
/// enzyme are rejected, not failed.
///
/// Groups come back in enzyme priority order; enzymes that ended up with no
/// sequences are omitted.
pub fn partition_by_enzyme(
    sequences: &[Arc<DnaSequence>],
    enzymes: &[RestrictionEnzyme],
) -> (
    Vec<(RestrictionEnzyme, Vec<Arc<DnaSequence>>)>,
    Vec<SequenceRejection>,
) {
    for enzyme in enzymes {
        if sequences.iter().all(|seq| !enzyme.site_in_sequence(seq)) {
            log::info!(
                "Enzyme {} is compatible with all {} sequences",
                enzyme.name,
                sequences.len()
            );
            return (vec![(enzyme.clone(), sequences.to_vec())], vec![]);
        }
    }

    log::info!("No single enzyme fits all sequences, assigning per sequence");
    let mut groups: Vec<(RestrictionEnzyme, Vec<Arc<DnaSequence>>)> = enzymes
        .iter()
        .map(|enzyme| (enzyme.clone(), vec![]))
        .collect();
    let mut rejections = vec![];
    for seq in sequences {
        match groups
            .iter_mut()
            .find(|(enzyme, _)| !enzyme.site_in_sequence(seq))
        {
            Some((enzyme, members)) => {
                log::debug!("Assigned sequence {} to enzyme {}", seq.id(), enzyme.name);
                members.push(seq.clone());
            }
            None => {
                let rejection = SequenceRejection::no_compatible_enzyme(seq.id());
                log::warn!("{rejection}");
                rejections.push(rejection);
            }
        }
    }
    groups.retain(|(_, members)| !members.is_empty());
    (groups, rejections)
}
