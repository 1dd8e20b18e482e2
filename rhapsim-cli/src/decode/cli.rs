use clap::{Arg, Command};

pub const DECODE_CMD: &str = "decode";

pub fn create_decode_cli() -> Command {
    Command::new(DECODE_CMD)
        .about("Recover the cell label index from the start of an R1 sequence.")
        .arg(
            Arg::new("sequence")
                .value_name("SEQUENCE")
                .help("R1 sequence (cell label, optionally followed by the UMI)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("cell_labels")
                .long("cell-labels")
                .value_name("FILE")
                .help("YAML table of cell label segments")
                .required(true),
        )
        .arg(
            Arg::new("bead_version")
                .long("bead-version")
                .value_name("VERSION")
                .help("Bead version: Original, Enh or EnhV2")
                .default_value("EnhV2"),
        )
}
