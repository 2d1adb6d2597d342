pub mod probe;
pub mod replay;
pub mod run;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use probe::handle_probe;
use replay::handle_replay;
use run::handle_run;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Detect the touchpad and display what is known about it
    Probe {
        /// Path to the serio_raw device (e.g. "/dev/serio_raw0")
        #[arg(short, long)]
        device: String,
        /// Path to the driver config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start the touchpad and print pointer events until interrupted
    Run {
        /// Path to the serio_raw device (e.g. "/dev/serio_raw0")
        #[arg(short, long)]
        device: String,
        /// Path to the driver config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Decode a recorded touchpad session
    Replay {
        /// Path or name of the capture file
        capture: PathBuf,
    },
}

pub async fn main_cli(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.cmd {
        Commands::Probe { device, config } => handle_probe(device, config).await?,
        Commands::Run { device, config } => handle_run(device, config).await?,
        Commands::Replay { capture } => handle_replay(capture).await?,
    }

    Ok(())
}
