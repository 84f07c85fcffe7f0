//! Configuration for the huffwire application.
//!
//! Host, port and file names are command-line options with defaults, so one
//! binary can play either side of the transfer.

use clap::{ArgGroup, Parser};
use huffwire_core::transport::DEFAULT_MAX_FRAME_BYTES;
use huffwire_core::{Error, Result};
use std::path::PathBuf;

/// Which side of the transfer this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Accept one connection, decode, write the text to a file
    Server,
    /// Encode a file and send it
    Client,
}

/// Compress text with a Huffman code and send it over TCP.
#[derive(Debug, Clone, Parser)]
#[command(name = "huffwire", version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["server", "client"])))]
pub struct Config {
    /// Receive one transfer and write it to --output
    #[arg(long)]
    pub server: bool,

    /// Send --input (or generated text) to the server
    #[arg(long)]
    pub client: bool,

    /// Address to connect to, or to bind in server mode
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Source text file (client)
    #[arg(long = "input", default_value = "tekst.txt")]
    pub input_file: PathBuf,

    /// Destination file for received text (server)
    #[arg(long = "output", default_value = "odebrany_tekst.txt")]
    pub output_file: PathBuf,

    /// Largest frame the server accepts, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    pub max_frame_bytes: usize,

    /// Generate this many bytes of sample text instead of reading --input
    #[arg(long, value_name = "BYTES")]
    pub generate: Option<usize>,

    /// Seed for sample text generation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn mode(&self) -> Mode {
        if self.server {
            Mode::Server
        } else {
            Mode::Client
        }
    }

    /// Socket address string for bind/connect.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject combinations clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_bytes == 0 {
            return Err(Error::Config("--max-frame-bytes must be greater than 0".to_string()));
        }
        if self.mode() == Mode::Client && self.port == 0 {
            return Err(Error::Config("--port 0 is only valid for --server".to_string()));
        }
        if self.mode() == Mode::Server && self.generate.is_some() {
            return Err(Error::Config("--generate is only valid for --client".to_string()));
        }
        Ok(())
    }

    /// Log the configuration in human-readable form.
    pub fn print(&self) {
        log::info!("=== Configuration ===");
        log::info!("Mode: {:?}", self.mode());
        log::info!("Address: {}", self.addr());
        match self.mode() {
            Mode::Client => match self.generate {
                Some(size) => log::info!("Input: generated, {} bytes, seed {}", size, self.seed),
                None => log::info!("Input: {}", self.input_file.display()),
            },
            Mode::Server => {
                log::info!("Output: {}", self.output_file.display());
                log::info!("Max frame: {} bytes", self.max_frame_bytes);
            }
        }
    }
}
