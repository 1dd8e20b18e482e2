use clap::{Arg, Command};

pub const CONFIG_CMD: &str = "config";
pub const DEFAULT_CONFIG_OUT: &str = "rhapsim_config.yaml";

pub fn create_config_cli() -> Command {
    Command::new(CONFIG_CMD)
        .about("Write an example YAML configuration file for `simulate`.")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output configuration file")
                .default_value(DEFAULT_CONFIG_OUT),
        )
}
