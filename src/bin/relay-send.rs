// src/bin/relay-send.rs

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use acoustic_relay::{Profile, SessionOpts};
use acoustic_relay::session::send_file;

fn main() -> ExitCode {
    acoustic_relay::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relay-send: {err:#}");
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

    let opts = SessionOpts {
        profile,
        compress: !params.no_compress,
        artifact_prefix: params.prefix.clone(),
    };

    let payload = fs::read(&params.input)
        .with_context(|| format!("failed to read input file: {}", params.input))?;

    let report =
        send_file(&opts, &payload).with_context(|| format!("send failed for prefix {}", params.prefix))?;

    println!(
        "sent {} data packet(s), {} byte(s) on the wire under prefix {}",
        report.data_packet_count, report.compressed_len, params.prefix
    );

    Ok(())
}

/// CLI parameters for `relay-send`.
#[derive(Parser, Debug)]
#[command(name = "relay-send")]
#[command(about = "Send a file as a sequence of acoustic .wav artifacts")]
struct Params {
    /// Path to the file to send.
    #[arg(short = 'i', long = "input", required = true)]
    pub input: String,

    /// Artifact prefix to write `_syn.wav`, `_data_NNNN.wav`, `_fin.wav` under.
    #[arg(short = 'p', long = "prefix", required = true)]
    pub prefix: String,

    /// Which fixed acoustic profile to modulate with.
    #[arg(long = "profile", value_enum, default_value_t = ProfileArg::Audible)]
    pub profile: ProfileArg,

    /// Skip deflate-compressing the payload before framing.
    #[arg(long = "no-compress", default_value_t = false)]
    pub no_compress: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProfileArg {
    Audible,
    Ultrasonic,
}
