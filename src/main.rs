use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use tcrshuffle::{
    output_table, records_from_table, shuffle, Chain, GermlineReference, ShuffleParameters, Table,
};

#[derive(Parser)]
#[command(name = "tcrshuffle")]
#[command(
    about = "Shuffle TCR CDR3 repertoires while preserving germline V(D)J segment structure",
    long_about = "Decomposes each CDR3 into germline-templated (V, D, J) and non-templated (N) \
regions, then recombines the resulting fragments across the repertoire to build a structurally \
plausible null distribution."
)]
struct Cli {
    /// Input table (.tsv or .csv) with one receptor per row
    #[arg(long)]
    input: PathBuf,
    /// Output table; the extension picks the delimiter
    #[arg(long)]
    output: PathBuf,
    /// TCR chain, "A" or "B"
    #[arg(long, default_value = "B")]
    chain: String,
    /// Organism partition of the germline reference
    #[arg(long, default_value = "human")]
    organism: String,
    /// Column holding the V gene name
    #[arg(long, default_value = "vb")]
    v_col: String,
    /// Column holding the CDR3 amino-acid sequence
    #[arg(long, default_value = "cdr3b")]
    cdr3_col: String,
    /// Column holding the J gene name
    #[arg(long, default_value = "jb")]
    j_col: String,
    /// Residues always kept with the V flank when scanning for D
    #[arg(long, default_value_t = 4)]
    min_cut_v: usize,
    /// Residues always kept with the J flank when scanning for D
    #[arg(long, default_value_t = 3)]
    min_cut_j: usize,
    /// Minimum exact D substring length
    #[arg(long, default_value_t = 3)]
    min_d_match: usize,
    /// Number of shuffled sequences generated per input record
    #[arg(long, default_value_t = 2)]
    depth: usize,
    /// Seed of the random generator, for reproducible output
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Optional germline table overriding the built-in reference
    #[arg(long)]
    germline: Option<PathBuf>,
    /// Emit the analyzed pool (labels and cuts) instead of shuffling
    #[arg(long)]
    preshuffled: bool,
    /// Emit the per-record failures instead of shuffling
    #[arg(long)]
    errors: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let cli = Cli::parse();

    let params = ShuffleParameters {
        chain: Chain::parse(&cli.chain)?,
        organism: cli.organism,
        v_col: cli.v_col,
        cdr3_col: cli.cdr3_col,
        j_col: cli.j_col,
        min_cut_v: cli.min_cut_v,
        min_cut_j: cli.min_cut_j,
        min_d_match: cli.min_d_match,
        depth: cli.depth,
        random_seed: cli.seed,
        return_presuffled: cli.preshuffled,
        return_errors: cli.errors,
    };

    let owned;
    let reference = match &cli.germline {
        Some(path) => {
            owned = GermlineReference::from_file(path)?;
            &owned
        }
        None => GermlineReference::builtin(),
    };

    let table = Table::read_file(&cli.input)?;
    let records = records_from_table(&table, &params)?;
    info!("read {} records from {}", records.len(), cli.input.display());

    let output = shuffle(reference, &params, &records)?;
    let out_table = output_table(&output, &params)?;
    out_table.write_file(&cli.output)?;
    info!(
        "wrote {} rows to {}",
        out_table.rows.len(),
        cli.output.display()
    );
    Ok(())
}
