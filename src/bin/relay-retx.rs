// src/bin/relay-retx.rs

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use acoustic_relay::Profile;
use acoustic_relay::session::{retransmit, retransmit_strict};

fn main() -> ExitCode {
    acoustic_relay::logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("relay-retx: {err:#}");
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

    let retransmitted = if params.strict {
        retransmit_strict(&profile, &params.tx_prefix, &params.rx_prefix)
    } else {
        retransmit(&profile, &params.tx_prefix, &params.rx_prefix)
    }
    .context("retransmission scan failed")?;

    println!(
        "retransmitted {} packet(s): {:?}",
        retransmitted.len(),
        retransmitted
    );

    Ok(())
}

/// CLI parameters for `relay-retx`.
#[derive(Parser, Debug)]
#[command(name = "relay-retx")]
#[command(about = "Scan NACK artifacts and re-emit the requested DATA artifacts")]
struct Params {
    /// Prefix the original sender wrote `_data_NNNN.wav` under.
    #[arg(long = "tx-prefix", required = true)]
    pub tx_prefix: String,

    /// Prefix the receiver wrote `_nack_NNNN.wav` under.
    #[arg(long = "rx-prefix", required = true)]
    pub rx_prefix: String,

    /// Which fixed acoustic profile to modulate the retransmitted artifacts with.
    #[arg(long = "profile", value_enum, default_value_t = ProfileArg::Audible)]
    pub profile: ProfileArg,

    /// Fail the whole batch if any requested DATA artifact can't be found.
    #[arg(long = "strict", default_value_t = false)]
    pub strict: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ProfileArg {
    Audible,
    Ultrasonic,
}
