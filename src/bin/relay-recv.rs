// src/bin/relay-recv.rs

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use acoustic_relay::{Profile, SessionOpts};
use acoustic_relay::session::receive_file;

fn main() -> ExitCode {
    acoustic_relay::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relay-recv: {err:#}");
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

    let payload = receive_file(&opts, &params.nack_prefix).context("receive failed")?;

    fs::write(&params.output, &payload)
        .with_context(|| format!("failed to write output file: {}", params.output))?;

    println!("received {} byte(s), wrote {}", payload.len(), params.output);

    Ok(())
}

/// CLI parameters for `relay-recv`.
#[derive(Parser, Debug)]
#[command(name = "relay-recv")]
#[command(about = "Receive a file from a sequence of acoustic .wav artifacts")]
struct Params {
    /// Artifact prefix `_syn.wav`, `_data_NNNN.wav`, `_fin.wav` were written under.
    #[arg(short = 'p', long = "prefix", required = true)]
    pub prefix: String,

    /// Prefix to write `_nack_NNNN.wav` artifacts under if the session is incomplete.
    #[arg(short = 'n', long = "nack-prefix", required = true)]
    pub nack_prefix: String,

    /// Where to write the reassembled payload.
    #[arg(short = 'o', long = "output", required = true)]
    pub output: String,

    /// Which fixed acoustic profile the sender used.
    #[arg(long = "profile", value_enum, default_value_t = ProfileArg::Audible)]
    pub profile: ProfileArg,

    /// The sender skipped compression; don't try to inflate the payload.
    #[arg(long = "no-compress", default_value_t = false)]
    pub no_compress: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProfileArg {
    Audible,
    Ultrasonic,
}
