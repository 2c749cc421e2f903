// src/bin/relay-listen.rs
//
// Concrete audio-device binding is out of scope for this crate (see the external
// collaborators list in the crate docs): this binary drives the streaming session
// against a pre-recorded capture `.wav`, standing in for a live device feed. A real
// device-backed `CaptureSource` is a thin adapter a downstream consumer can write
// against the same trait.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hound::WavReader;

use acoustic_relay::Profile;
use acoustic_relay::error::Error;
use acoustic_relay::session::{CaptureSource, StreamingSession};

fn main() -> ExitCode {
    acoustic_relay::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relay-listen: {err:#}");
            ExitCode::from(exit_code_of(&err))
        }
    }
}

fn exit_code_of(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<acoustic_relay::Error>()
        .map(|e| e.exit_code())
        .unwrap_or(2)
}

fn run() -> Result<()> {
    let params = Params::parse();

    let profile = match params.profile {
        ProfileArg::Audible => Profile::audible(),
        ProfileArg::Ultrasonic => Profile::ultrasonic(),
    };

    let mut capture = WavCapture::open(&params.capture)
        .with_context(|| format!("failed to open capture artifact: {}", params.capture.display()))?;

    let mut session = StreamingSession::new(profile);
    let mut delivered_count = 0usize;

    session
        .run(&mut capture, &|| false, |result| match result {
            Ok(payload) => {
                delivered_count += 1;
                println!("delivered {:?}: {} byte(s)", payload.name, payload.bytes.len());
            }
            Err(err) => eprintln!("session dropped: {err}"),
        })
        .context("streaming session ended abnormally")?;

    println!("{delivered_count} payload(s) delivered");
    Ok(())
}

/// Reads a `.wav` artifact as a stand-in live capture feed, one block at a time.
struct WavCapture {
    reader: WavReader<std::io::BufReader<std::fs::File>>,
}

impl WavCapture {
    fn open(path: &PathBuf) -> Result<Self> {
        let reader = WavReader::open(path)?;
        Ok(Self { reader })
    }
}

impl CaptureSource for WavCapture {
    fn read_block(&mut self, block_len: usize) -> acoustic_relay::Result<Vec<i16>> {
        let block: Vec<i16> = self
            .reader
            .samples::<i16>()
            .take(block_len)
            .collect::<std::result::Result<Vec<i16>, _>>()
            .map_err(|e| Error::MalformedFrame(e.to_string()))?;
        Ok(block)
    }
}

/// CLI parameters for `relay-listen`.
#[derive(Parser, Debug)]
#[command(name = "relay-listen")]
#[command(about = "Run the streaming receiver against a pre-recorded capture artifact")]
struct Params {
    /// Path to a `.wav` artifact standing in for a live capture feed.
    #[arg(short = 'c', long = "capture", required = true)]
    pub capture: PathBuf,

    /// Which fixed acoustic profile the sender used.
    #[arg(long = "profile", value_enum, default_value_t = ProfileArg::Ultrasonic)]
    pub profile: ProfileArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProfileArg {
    Audible,
    Ultrasonic,
}
