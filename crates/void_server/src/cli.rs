use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "void_server", version, about = "Headless host running the VoidRespawn plugin")]
pub struct Cli {
    /// Directory holding the server data (defaults to the platform data directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Ticks per second of the main loop
    #[arg(long, default_value_t = 20.0)]
    pub tick_rate: f64,
}
