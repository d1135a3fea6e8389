// Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use super::Overrides;

/// Serve an app package and its version descriptor to devices on the local network
#[derive(Debug, Parser)]
#[command(name = "update-server", version, about)]
pub struct Cli {
    /// Config file path without extension (optional)
    #[arg(short, long, default_value = "update-server")]
    pub config: String,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve
    #[arg(short, long = "dir")]
    pub directory: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            directory: self.directory.clone(),
        }
    }
}
