use anyhow::{anyhow, Context, Result};
use oligopool::dna_sequence::DnaSequence;
use oligopool::enzymes::Enzymes;
use oligopool::oligo_pool::{design_pool, PoolConfig};
use oligopool::output::{write_pool_fasta, write_pool_table, write_rejections};
use oligopool::primer::{PrecomputedPrimerSource, PrimerSource, SyntheticPrimerSource};
use oligopool::restriction_enzyme::RestrictionEnzyme;
use oligopool::ENZYMES;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::{env, fs};

fn usage() {
    eprintln!(
        "Usage:\n  \
  oligopool --fasta INPUT.fa [options]\n\n\
Options:\n  \
  --fasta FILE          input sequences (required)\n  \
  --out PREFIX          output prefix [oligo_pool]\n  \
  --enzymes LIST        comma-separated enzyme names in priority order,\n                        \
or @FILE with one name per line [builtin catalog order]\n  \
  --enzyme-catalog FILE JSON enzyme catalog replacing the builtin one\n  \
  --primers FILE        precomputed primer pairs, one 'LEFT RIGHT' per line\n  \
  --description TEXT    oligo set label for the output table\n  \
  --oligo-size N        full oligo length [200]\n  \
  --overlap N           Gibson overlap length [40]\n  \
  --primer-length N     amplification primer length [15]\n  \
  --tm F                target primer melting temperature [60.0]\n  \
  --max-attempts N      primer search bound [10000]\n  \
  --seed N              seed for the synthetic primer generator [0]\n  \
  --debug               verbose logging\n\n\
Outputs PREFIX.fa (oligos as FASTA), PREFIX.out (tab-separated table)\n\
and PREFIX_ERROR (rejected sequences), the last only if any were rejected."
    );
}

struct Options {
    fasta: String,
    out_prefix: String,
    enzyme_names: Option<Vec<String>>,
    enzyme_catalog: Option<String>,
    primer_file: Option<String>,
    description: Option<String>,
    seed: u64,
    debug: bool,
    config: PoolConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fasta: String::new(),
            out_prefix: "oligo_pool".to_string(),
            enzyme_names: None,
            enzyme_catalog: None,
            primer_file: None,
            description: None,
            seed: 0,
            debug: false,
            config: PoolConfig::default(),
        }
    }
}

fn parse_enzyme_names(value: &str) -> Result<Vec<String>> {
    if let Some(path) = value.strip_prefix('@') {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read enzyme list '{path}'"))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect())
    } else {
        Ok(value.split(',').map(|s| s.trim().to_string()).collect())
    }
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut idx = 1;
    let value = |idx: &mut usize| -> Result<String> {
        *idx += 1;
        args.get(*idx)
            .cloned()
            .ok_or_else(|| anyhow!("Missing value for '{}'", args[*idx - 1]))
    };
    while idx < args.len() {
        match args[idx].as_str() {
            "--fasta" => options.fasta = value(&mut idx)?,
            "--out" => options.out_prefix = value(&mut idx)?,
            "--enzymes" => options.enzyme_names = Some(parse_enzyme_names(&value(&mut idx)?)?),
            "--enzyme-catalog" => options.enzyme_catalog = Some(value(&mut idx)?),
            "--primers" => options.primer_file = Some(value(&mut idx)?),
            "--description" => options.description = Some(value(&mut idx)?),
            "--oligo-size" => options.config.oligo_size = value(&mut idx)?.parse()?,
            "--overlap" => options.config.overlap_size = value(&mut idx)?.parse()?,
            "--primer-length" => options.config.primer_length = value(&mut idx)?.parse()?,
            "--tm" => options.config.optimal_tm = value(&mut idx)?.parse()?,
            "--max-attempts" => options.config.max_primer_attempts = value(&mut idx)?.parse()?,
            "--seed" => options.seed = value(&mut idx)?.parse()?,
            "--debug" => options.debug = true,
            other => {
                usage();
                return Err(anyhow!("Unknown option '{other}'"));
            }
        }
        idx += 1;
    }
    if options.fasta.is_empty() {
        usage();
        return Err(anyhow!("Missing required option '--fasta'"));
    }
    Ok(options)
}

fn selected_enzymes(options: &Options) -> Result<Vec<RestrictionEnzyme>> {
    let catalog = match &options.enzyme_catalog {
        Some(path) => Enzymes::from_path(path)?,
        None => ENZYMES.clone(),
    };
    let enzymes = match &options.enzyme_names {
        Some(names) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let found = catalog.restriction_enzymes_by_name(&names);
            if found.len() != names.len() {
                let known: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
                let missing: Vec<&str> = names
                    .iter()
                    .copied()
                    .filter(|n| !known.contains(n))
                    .collect();
                return Err(anyhow!("Unknown enzymes: {missing:?}"));
            }
            found
        }
        None => catalog.restriction_enzymes().clone(),
    };
    Ok(enzymes)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err(anyhow!("Missing arguments"));
    }
    let options = parse_options(&args)?;

    let level = if options.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let sequences = DnaSequence::from_fasta_file(&options.fasta)?;
    log::info!("Read {} sequences from '{}'", sequences.len(), options.fasta);
    let enzymes = selected_enzymes(&options)?;

    let mut source: Box<dyn PrimerSource> = match &options.primer_file {
        Some(path) => Box::new(PrecomputedPrimerSource::from_path(path)?),
        None => Box::new(SyntheticPrimerSource::new(options.seed)),
    };

    let design = design_pool(sequences, &enzymes, &options.config, source.as_mut())?;

    let fasta_path = format!("{}.fa", options.out_prefix);
    let table_path = format!("{}.out", options.out_prefix);
    write_pool_fasta(&design, &fasta_path)?;
    write_pool_table(&design, options.description.as_deref(), &table_path)?;
    log::info!("Wrote '{fasta_path}' and '{table_path}'");
    if !design.rejections.is_empty() {
        let error_path = format!("{}_ERROR", options.out_prefix);
        write_rejections(&design.rejections, &error_path)?;
        log::warn!(
            "{} sequences were rejected, see '{error_path}'",
            design.rejections.len()
        );
    }
    let oligo_count: usize = design.pools.iter().map(|p| p.oligos.len()).sum();
    log::info!(
        "Designed {oligo_count} oligos in {} pool(s)",
        design.pools.len()
    );
    Ok(())
}
