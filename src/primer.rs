use crate::dna_sequence::DnaSequence;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs;

/// Minimum primer length that leaves room for the 3' anchor used by the
/// amplification compatibility checks.
pub const MIN_PRIMER_LENGTH: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimerPair {
    pub left: DnaSequence,
    pub right: DnaSequence,
}

/// What the pool designer wants from its primer supplier.
#[derive(Clone, Copy, Debug)]
pub struct PrimerRequest {
    pub length: usize,
    pub optimal_tm: f64,
}

/// Supplies candidate amplification primer pairs. The pool designer pulls
/// pairs until one passes its compatibility checks, so a source may hand out
/// unsuitable pairs; it just has to keep producing fresh ones. Returning
/// `None` means the source is drained and the search fails.
pub trait PrimerSource {
    fn next_pair(&mut self, request: &PrimerRequest) -> Option<PrimerPair>;
}

/// Primer pairs read from a curated list, e.g. validated orthogonal primers.
/// Pairs are handed out in file order and never recycled.
pub struct PrecomputedPrimerSource {
    pairs: VecDeque<PrimerPair>,
}

impl PrecomputedPrimerSource {
    /// Parses a whitespace-separated table with one pair per line, left
    /// primer first. Blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut pairs = VecDeque::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let left = fields
                .next()
                .with_context(|| format!("Missing left primer on line {}", lineno + 1))?;
            let right = fields
                .next()
                .with_context(|| format!("Missing right primer on line {}", lineno + 1))?;
            if left.len() < MIN_PRIMER_LENGTH || right.len() < MIN_PRIMER_LENGTH {
                log::warn!(
                    "Skipping primer pair on line {}, both primers must have at least {MIN_PRIMER_LENGTH} bases",
                    lineno + 1
                );
                continue;
            }
            pairs.push_back(PrimerPair {
                left: DnaSequence::new(format!("left_primer_{}", lineno + 1), left.as_bytes())?,
                right: DnaSequence::new(format!("right_primer_{}", lineno + 1), right.as_bytes())?,
            });
        }
        Ok(Self { pairs })
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Could not read '{path}'"))?;
        Self::from_text(&text)
    }

    pub fn remaining(&self) -> usize {
        self.pairs.len()
    }
}

impl PrimerSource for PrecomputedPrimerSource {
    fn next_pair(&mut self, _request: &PrimerRequest) -> Option<PrimerPair> {
        self.pairs.pop_front()
    }
}

/// Generates random primer pairs from a seeded LCG, screened for a moderate
/// GC fraction as a cheap stand-in for a melting temperature model. Never
/// runs dry; the pool designer bounds the number of attempts instead.
pub struct SyntheticPrimerSource {
    state: u64,
    generated: usize,
}

impl SyntheticPrimerSource {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E3779B97F4A7C15,
            generated: 0,
        }
    }

    fn next_base(&mut self) -> u8 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        b"ACGT"[(self.state >> 33) as usize % 4]
    }

    fn next_primer(&mut self, id: String, length: usize) -> DnaSequence {
        loop {
            let bases: Vec<u8> = (0..length).map(|_| self.next_base()).collect();
            let gc = bases.iter().filter(|b| **b == b'G' || **b == b'C').count();
            let fraction = gc as f64 / length as f64;
            if (0.4..=0.6).contains(&fraction) {
                return DnaSequence::new(id, &bases).expect("generated bases are valid");
            }
        }
    }
}

impl PrimerSource for SyntheticPrimerSource {
    fn next_pair(&mut self, request: &PrimerRequest) -> Option<PrimerPair> {
        self.generated += 1;
        let n = self.generated;
        Some(PrimerPair {
            left: self.next_primer(format!("left_primer_{n}"), request.length),
            right: self.next_primer(format!("right_primer_{n}"), request.length),
        })
    }
}
