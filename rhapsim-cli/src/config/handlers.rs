use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use rhapsim_wta::SimulationConfig;

use super::cli::DEFAULT_CONFIG_OUT;

pub fn run_config(matches: &ArgMatches) -> Result<()> {
    let default_out = DEFAULT_CONFIG_OUT.to_string();
    let output = matches.get_one::<String>("output").unwrap_or(&default_out);

    SimulationConfig::example().to_yaml(Path::new(output))?;
    info!("Example configuration written to {}", output);

    Ok(())
}
