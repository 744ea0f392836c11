use crate::error::{DesignError, SequenceRejection};
use crate::oligo_pool::PoolDesign;
use itertools::Itertools;
use std::fs::File;
use std::io::Write;

const FASTA_LINE_WIDTH: usize = 80;

fn io_error(path: &str, err: impl std::fmt::Display) -> DesignError {
    DesignError::io(format!("Could not write '{path}': {err}"))
}

/// Write every oligo of the design as FASTA, 80 bases per line. Records are
/// named `oligo_<parent>_<start>_<end>`.
pub fn write_pool_fasta(design: &PoolDesign, path: &str) -> Result<(), DesignError> {
    let mut file = File::create(path).map_err(|e| io_error(path, e))?;
    for pool in &design.pools {
        for oligo in &pool.oligos {
            writeln!(file, ">oligo_{}", oligo.fragment.id()).map_err(|e| io_error(path, e))?;
            let top_strand = oligo.top_strand();
            for chunk in top_strand.chunks(FASTA_LINE_WIDTH) {
                writeln!(file, "{}", String::from_utf8_lossy(chunk))
                    .map_err(|e| io_error(path, e))?;
            }
        }
    }
    Ok(())
}

/// Write the design as a tab-separated table, one row per oligo, with the
/// pool-level context (enzyme, motifs, primers) repeated on every row so each
/// line stands alone. `description` labels the whole set; `-` when absent.
pub fn write_pool_table(
    design: &PoolDesign,
    description: Option<&str>,
    path: &str,
) -> Result<(), DesignError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| io_error(path, e))?;
    writer
        .write_record([
            "Oligo_set",
            "Parent_sequence",
            "Enzyme",
            "Top_strand_recognition_sequence",
            "Bottom_strand_recognition_sequence",
            "Left_primer",
            "Right_primer",
            "Subsequence_name",
            "Subsequence",
            "Full_oligo",
        ])
        .map_err(|e| io_error(path, e))?;
    let description = description.unwrap_or("-");
    for pool in &design.pools {
        let top_motifs = pool.enzyme.top_strand_motifs.iter().join(",");
        let bottom_motifs = pool.enzyme.bottom_strand_motifs.iter().join(",");
        for oligo in &pool.oligos {
            let top_strand = oligo.top_strand();
            writer
                .write_record([
                    description.to_string(),
                    oligo.fragment.parent().id().to_string(),
                    pool.enzyme.name.clone(),
                    top_motifs.clone(),
                    bottom_motifs.clone(),
                    String::from_utf8_lossy(pool.primer_pair.left.bases()).into_owned(),
                    String::from_utf8_lossy(pool.primer_pair.right.bases()).into_owned(),
                    oligo.fragment.id(),
                    String::from_utf8_lossy(oligo.fragment.bases()).into_owned(),
                    String::from_utf8_lossy(&top_strand).into_owned(),
                ])
                .map_err(|e| io_error(path, e))?;
        }
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

/// Write one `CODE<tab>sequence_id` line per rejected sequence.
pub fn write_rejections(
    rejections: &[SequenceRejection],
    path: &str,
) -> Result<(), DesignError> {
    let mut file = File::create(path).map_err(|e| io_error(path, e))?;
    for rejection in rejections {
        writeln!(file, "{rejection}").map_err(|e| io_error(path, e))?;
    }
    Ok(())
}
