use crate::restriction_enzyme::RestrictionEnzyme;
use anyhow::{Context, Result};
use std::fs;

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// The TypeIIS enzyme catalog. Enzymes are kept in file order, which is also
/// the priority order used when assigning enzymes to sequences.
#[derive(Clone, Debug)]
pub struct Enzymes {
    restriction_enzymes: Vec<RestrictionEnzyme>,
}

impl Enzymes {
    pub fn new(json_text: &str) -> Result<Self> {
        let mut restriction_enzymes: Vec<RestrictionEnzyme> =
            serde_json::from_str(json_text).context("Enzyme catalog is not a valid JSON array")?;
        for enzyme in &mut restriction_enzymes {
            for motif in enzyme
                .top_strand_motifs
                .iter_mut()
                .chain(enzyme.bottom_strand_motifs.iter_mut())
            {
                *motif = motif.to_ascii_uppercase();
            }
            enzyme.check_motif_lengths()?;
        }
        Ok(Self {
            restriction_enzymes,
        })
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Could not read '{path}'"))?;
        Self::new(&text)
    }

    pub fn restriction_enzymes(&self) -> &Vec<RestrictionEnzyme> {
        &self.restriction_enzymes
    }

    /// Look up enzymes by name, preserving the order of `names` so the
    /// caller controls assignment priority.
    pub fn restriction_enzymes_by_name(&self, names: &[&str]) -> Vec<RestrictionEnzyme> {
        names
            .iter()
            .filter_map(|name| {
                self.restriction_enzymes
                    .iter()
                    .find(|re| re.name.eq_ignore_ascii_case(name))
            })
            .cloned()
            .collect()
    }
}

impl Default for Enzymes {
    fn default() -> Self {
        Enzymes::new(BUILTIN_ENZYMES_JSON).expect("Builtin enzyme catalog is invalid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let enzymes = Enzymes::default();
        assert!(
            enzymes
                .restriction_enzymes()
                .iter()
                .any(|e| e.name == "BsaI")
        );
        for enzyme in enzymes.restriction_enzymes() {
            assert!(enzyme.check_motif_lengths().is_ok());
        }
    }

    #[test]
    fn test_by_name_preserves_request_order() {
        let enzymes = Enzymes::default();
        let picked = enzymes.restriction_enzymes_by_name(&["SapI", "BsaI"]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].name, "SapI");
        assert_eq!(picked[1].name, "BsaI");
        assert!(enzymes.restriction_enzymes_by_name(&["NoSuchEnzyme"]).is_empty());
    }

    #[test]
    fn test_rejects_mismatched_motif_lengths() {
        let bad = r#"[{
            "name": "Broken",
            "top_strand_motifs": ["GGTCTC", "GGTCTCA"],
            "bottom_strand_motifs": ["GAGACC"],
            "bottom_cleavage_offset": 1
        }]"#;
        assert!(Enzymes::new(bad).is_err());
    }
}
