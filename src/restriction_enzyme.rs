use crate::dna_sequence::{reverse_complement, DnaSequence};
use crate::error::DesignError;
use serde::{Deserialize, Serialize};

/// A TypeIIS restriction enzyme. Some enzymes recognize more than one motif
/// per strand; all motifs on a given strand must share one length.
///
/// `bottom_cleavage_offset` is where the enzyme cuts the bottom strand,
/// relative to the payload-side edge of the recognition site. A negative
/// offset means the cut recedes into the payload during the Gibson recession
/// step, and its magnitude is the number of throwaway bases that must pad the
/// recognition site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    pub top_strand_motifs: Vec<String>,
    pub bottom_strand_motifs: Vec<String>,
    pub bottom_cleavage_offset: i32,
    #[serde(default)]
    pub note: Option<String>,
}

impl RestrictionEnzyme {
    /// Checks the equal-motif-length invariant on both strands.
    pub fn check_motif_lengths(&self) -> Result<(), DesignError> {
        for (strand, motifs) in [
            ("top", &self.top_strand_motifs),
            ("bottom", &self.bottom_strand_motifs),
        ] {
            let first = match motifs.first() {
                Some(motif) => motif.len(),
                None => {
                    return Err(DesignError::invalid_input(format!(
                        "Enzyme {} has no {strand} strand recognition motif",
                        self.name
                    )))
                }
            };
            if motifs.iter().any(|m| m.len() != first) {
                return Err(DesignError::invalid_input(format!(
                    "All {strand} strand recognition motifs of enzyme {} must have the same length",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Length of the top-strand motifs. Call after `check_motif_lengths`.
    pub fn top_motif_len(&self) -> usize {
        self.top_strand_motifs.first().map_or(0, |m| m.len())
    }

    pub fn bottom_motif_len(&self) -> usize {
        self.bottom_strand_motifs.first().map_or(0, |m| m.len())
    }

    /// Number of disposable bases between the recognition site and the
    /// payload, so the recession step chews these instead of real sequence.
    pub fn throwaway_bases(&self) -> usize {
        (-self.bottom_cleavage_offset).max(0) as usize
    }

    /// The motif used on the 5' side of assembled oligos.
    pub fn leading_motif(&self) -> &[u8] {
        self.top_strand_motifs
            .first()
            .map_or(&[], |m| m.as_bytes())
    }

    /// Whether any top-strand motif, or its reverse complement, occurs
    /// anywhere in the sequence.
    pub fn site_in_sequence(&self, seq: &DnaSequence) -> bool {
        for motif in &self.top_strand_motifs {
            if seq.contains(motif.as_bytes()) {
                log::debug!(
                    "Sequence {} contains {} recognition motif {motif}",
                    seq.id(),
                    self.name
                );
                return true;
            }
            let rc = reverse_complement(motif.as_bytes());
            if seq.contains(&rc) {
                log::debug!(
                    "Sequence {} contains reverse complement of {} recognition motif {motif}",
                    seq.id(),
                    self.name
                );
                return true;
            }
        }
        false
    }
}
