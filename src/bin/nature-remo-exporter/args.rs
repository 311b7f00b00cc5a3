use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(version, about = "Nature Remo Exporter")]
pub struct Args {
    /// Configuration file path
    #[arg(long, env = "NATURE_REMO_EXPORTER_CONFIG", default_value = "config.yml")]
    pub config: PathBuf,
}
