use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use rhapsim_wta::consts::get_thread_count;
use rhapsim_wta::{BeadVersion, SimulationConfig};

fn path_arg(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<String>(id).map(PathBuf::from)
}

fn required_path_arg(matches: &ArgMatches, id: &str, flag: &str) -> Result<PathBuf> {
    path_arg(matches, id)
        .ok_or_else(|| anyhow::anyhow!("--{} is required when no --config is given", flag))
}

/// Build the run configuration from an optional config file plus flag overrides.
pub fn resolve_config(matches: &ArgMatches) -> Result<SimulationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => SimulationConfig::from_yaml(Path::new(path))?,
        None => SimulationConfig::new(
            required_path_arg(matches, "reference_fasta", "reference-fasta")?,
            required_path_arg(matches, "reference_gtf", "reference-gtf")?,
            required_path_arg(matches, "cell_labels", "cell-labels")?,
        ),
    };

    if let Some(path) = path_arg(matches, "reference_fasta") {
        config.reference_fasta = path;
    }
    if let Some(path) = path_arg(matches, "reference_gtf") {
        config.reference_gtf = path;
    }
    if let Some(path) = path_arg(matches, "cell_labels") {
        config.cell_labels = path;
    }
    if let Some(path) = path_arg(matches, "output_dir") {
        config.output_dir = path;
    }
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        config.prefix = prefix.clone();
    }
    if let Some(&num_cells) = matches.get_one::<u64>("num_cells") {
        config.num_cells = num_cells;
    }
    if let Some(&reads_per_cell) = matches.get_one::<u64>("reads_per_cell") {
        config.reads_per_cell = reads_per_cell;
    }
    if let Some(version) = matches.get_one::<String>("bead_version") {
        config.bead_version = version.parse::<BeadVersion>()?;
    }
    if let Some(&umi_length) = matches.get_one::<usize>("umi_length") {
        config.umi_length = umi_length;
    }
    if let Some(&transcript_length) = matches.get_one::<usize>("transcript_length") {
        config.transcript_length = transcript_length;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(seed);
    }

    config.validate()?;
    Ok(config)
}

pub fn run_simulate(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;

    let thread_count = get_thread_count(matches.get_one::<usize>("threads").copied());
    info!("Using {} threads for parallel cell generation", thread_count);
    rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build_global()?;

    let start = std::time::Instant::now();
    let stats = config.run()?;

    println!(
        "Simulated {} cells, {} read pairs ({} R1 bases, {} R2 bases) in {:.2?}",
        stats.cells,
        stats.read_pairs,
        stats.r1_bases,
        stats.r2_bases,
        start.elapsed()
    );
    println!("R1: {}", stats.r1_path.display());
    println!("R2: {}", stats.r2_path.display());

    Ok(())
}
