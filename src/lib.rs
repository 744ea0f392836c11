use enzymes::Enzymes;
use lazy_static::lazy_static;

pub mod dna_sequence;
pub mod enzymes;
pub mod error;
pub mod fragment;
pub mod kmer_index;
pub mod oligo;
pub mod oligo_pool;
pub mod output;
pub mod partition;
pub mod primer;
pub mod restriction_enzyme;

lazy_static! {
    // Builtin TypeIIS restriction enzyme catalog
    pub static ref ENZYMES: Enzymes = Enzymes::default();
}
