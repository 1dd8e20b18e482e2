mod config;
mod decode;
mod simulate;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "rhapsim";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Generate synthetic BD Rhapsody WTA paired FASTQ reads for testing single-cell pipelines.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug messages (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(simulate::cli::create_simulate_cli())
        .subcommand(decode::cli::create_decode_cli())
        .subcommand(config::cli::create_config_cli())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // SIMULATE
        //
        Some((simulate::cli::SIMULATE_CMD, matches)) => {
            simulate::handlers::run_simulate(matches)?;
        }

        //
        // DECODE
        //
        Some((decode::cli::DECODE_CMD, matches)) => {
            decode::handlers::run_decode(matches)?;
        }

        //
        // CONFIG
        //
        Some((config::cli::CONFIG_CMD, matches)) => {
            config::handlers::run_config(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(&["rhapsim", "config"])]
    #[case(&["rhapsim", "-v", "config", "-o", "out.yaml"])]
    #[case(&["rhapsim", "decode", "ACGT", "--cell-labels", "labels.yaml"])]
    #[case(&["rhapsim", "simulate", "-c", "run.yaml", "-t", "2"])]
    fn test_parser_accepts(#[case] args: &[&str]) {
        assert!(build_parser().try_get_matches_from(args).is_ok());
    }

    #[rstest]
    #[case(&["rhapsim"])]
    #[case(&["rhapsim", "decode", "ACGT"])]
    #[case(&["rhapsim", "simulate", "--num-cells", "many"])]
    fn test_parser_rejects(#[case] args: &[&str]) {
        assert!(build_parser().try_get_matches_from(args).is_err());
    }
}
