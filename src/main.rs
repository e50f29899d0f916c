use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use picai_fetch::commands;
use picai_fetch::core::config::{Dataset, FetchConfig, DEFAULT_DATA_DIR};

#[derive(Parser)]
#[clap(name = "picai-fetch")]
#[clap(about = "Download and unpack the PI-CAI public training images (fold 0)")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory to download and extract into
    #[clap(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FetchConfig::new(&cli.data_dir, Dataset::picai_fold0());

    let result = commands::fetch::fetch_dataset(&config).map_err(|e| anyhow::anyhow!(e));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
