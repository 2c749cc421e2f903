//! RIFF/WAVE artifact I/O and the `.wav` artifact naming convention.
//!
//! This is the concrete "external collaborator" the core scope excludes from its
//! non-trivial surface: [`crate::modem`] only ever produces/consumes `Vec<i16>` sample
//! buffers, and this module is the thin glue that turns those into files on disk.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Write a mono, 16-bit signed little-endian PCM artifact.
pub fn write_artifact(path: impl AsRef<Path>, profile: &Profile, samples: &[i16]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: profile.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(hound_to_error)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(hound_to_error)?;
    }
    writer.finalize().map_err(hound_to_error)?;
    Ok(())
}

/// Read a mono, 16-bit signed PCM artifact back into samples.
pub fn read_artifact(path: impl AsRef<Path>) -> Result<Vec<i16>> {
    let mut reader = hound::WavReader::open(path).map_err(hound_to_error)?;
    reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()
        .map_err(hound_to_error)
}

fn hound_to_error(err: hound::Error) -> Error {
    match err {
        hound::Error::IoError(io) => Error::Io(io),
        other => Error::MalformedFrame(other.to_string()),
    }
}

/// Artifact naming, all rooted at a caller-chosen prefix `P`.
pub struct ArtifactNames {
    prefix: PathBuf,
}

impl ArtifactNames {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn syn(&self) -> PathBuf {
        self.suffixed("_syn.wav")
    }

    pub fn fin(&self) -> PathBuf {
        self.suffixed("_fin.wav")
    }

    pub fn data(&self, seq: u8) -> PathBuf {
        self.numbered("_data_", seq)
    }

    pub fn nack(&self, seq: u8) -> PathBuf {
        self.numbered("_nack_", seq)
    }

    pub fn retx(&self, seq: u8) -> PathBuf {
        self.numbered("_retx_", seq)
    }

    fn suffixed(&self, suffix: &str) -> PathBuf {
        let mut name = self.prefix.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn numbered(&self, infix: &str, seq: u8) -> PathBuf {
        let mut name = self.prefix.as_os_str().to_owned();
        name.push(format!("{infix}{seq:04}.wav"));
        PathBuf::from(name)
    }
}
