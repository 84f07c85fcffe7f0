//! huffwire: send a Huffman-compressed text file between two processes.
//!
//! Run one process with `--server` and another with `--client`. The client
//! reads (or generates) text, encodes it, and sends one frame; the server
//! receives it, decodes, and writes the text to disk.

mod config;
mod input_gen;

use anyhow::Context;
use clap::Parser;
use config::{Config, Mode};
use huffwire_core::{
    framing::{decompress_frame, parse_frame, serialize_frame},
    metrics::TransferStats,
    transport::{read_envelope, write_envelope},
};
use log::{info, warn};
use std::fs;
use std::net::{TcpListener, TcpStream};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let default_filter = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    config.validate().context("invalid command line")?;
    if config.print_config {
        config.print();
    }

    match config.mode() {
        Mode::Server => run_server(&config),
        Mode::Client => run_client(&config),
    }
}

fn run_server(config: &Config) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(config.addr()).with_context(|| format!("binding {}", config.addr()))?;
    info!("server listening on {}", listener.local_addr()?);

    let (mut socket, peer) = listener.accept().context("accepting connection")?;
    info!("connected to client {peer}");

    let mut stats = TransferStats::new();
    let frame_bytes = read_envelope(&mut socket, config.max_frame_bytes)
        .with_context(|| format!("receiving frame from {peer}"))?;
    let frame = parse_frame(&frame_bytes).context("parsing frame")?;
    let text = decompress_frame(&frame).context("decoding payload")?;

    stats.record(text.len(), &frame, frame_bytes.len());
    stats.complete();

    fs::write(&config.output_file, &text)
        .with_context(|| format!("writing {}", config.output_file.display()))?;
    info!("saved {} bytes to {}", text.len(), config.output_file.display());
    stats.log_summary();

    Ok(())
}

fn run_client(config: &Config) -> anyhow::Result<()> {
    let text = match config.generate {
        Some(size) => input_gen::generate_sample_text(config.seed, size),
        None if config.input_file.exists() => fs::read(&config.input_file)
            .with_context(|| format!("reading {}", config.input_file.display()))?,
        None => {
            warn!(
                "{} not found, sending generated sample text",
                config.input_file.display()
            );
            input_gen::generate_sample_text(config.seed, 16 * 1024)
        }
    };

    let mut stats = TransferStats::new();
    let encoded = huffwire_core::encode(&text).context("encoding text")?;
    let frame = serialize_frame(&encoded).context("building frame")?;
    stats.record(text.len(), &encoded, frame.len());

    let mut stream =
        TcpStream::connect(config.addr()).with_context(|| format!("connecting to {}", config.addr()))?;
    write_envelope(&mut stream, &frame).context("sending frame")?;
    stats.complete();

    info!("sent {} bytes of text to {}", text.len(), config.addr());
    stats.log_summary();

    Ok(())
}
