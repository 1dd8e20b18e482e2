use clap::{Arg, Command};

pub use rhapsim_wta::consts::*;

pub fn create_simulate_cli() -> Command {
    Command::new(SIMULATE_CMD)
        .about("Generate paired R1/R2 gzip FASTQ files for simulated cells.")
        .version(VERSION)
        .long_about(
            "Generate paired R1/R2 gzip FASTQ files for simulated cells.\n\n\
            Parameters come from a YAML config (see `rhapsim config`), from flags, or both;\n\
            flags override values in the config file. Without a config file the reference\n\
            FASTA, GTF and cell label table must be given as flags.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("YAML configuration file"),
        )
        .arg(
            Arg::new("reference_fasta")
                .long("reference-fasta")
                .value_name("FILE")
                .help("Reference genome FASTA (.fa or .fa.gz)"),
        )
        .arg(
            Arg::new("reference_gtf")
                .long("reference-gtf")
                .value_name("FILE")
                .help("Gene annotation GTF (.gtf or .gtf.gz)"),
        )
        .arg(
            Arg::new("cell_labels")
                .long("cell-labels")
                .value_name("FILE")
                .help("YAML table of cell label segments"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory for the FASTQ files (default: .)"),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .value_name("PREFIX")
                .help("Output file prefix (default: WTAreads)"),
        )
        .arg(
            Arg::new("num_cells")
                .short('n')
                .long("num-cells")
                .value_name("NUMBER")
                .help("Number of cells (default: 100)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("reads_per_cell")
                .short('r')
                .long("reads-per-cell")
                .value_name("NUMBER")
                .help("Read pairs per cell (default: 1000)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("bead_version")
                .long("bead-version")
                .value_name("VERSION")
                .help("Bead version: Original, Enh or EnhV2 (default: EnhV2)"),
        )
        .arg(
            Arg::new("umi_length")
                .long("umi-length")
                .value_name("NUMBER")
                .help("UMI length in bases (default: 14)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("transcript_length")
                .long("transcript-length")
                .value_name("NUMBER")
                .help("R2 length in bases (default: 42)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("NUMBER")
                .help("Random seed; a random one is drawn and logged if omitted")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("NUMBER")
                .help("Number of threads for parallel cell generation (default: 4)")
                .value_parser(clap::value_parser!(usize)),
        )
}
