use crate::profile::Profile;

/// Library-level session configuration, not CLI flags directly.
///
/// This struct represents *library-level configuration*, not CLI flags themselves. The
/// CLI binaries are responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (tests, batch jobs) can construct options programmatically
#[derive(Debug, Clone)]
pub struct SessionOpts {
    /// Which fixed profile (audible or ultrasonic) this session uses.
    pub profile: Profile,

    /// Whether to deflate-compress the payload before chunking and framing.
    pub compress: bool,

    /// The artifact prefix `P` under which `P_syn.wav`, `P_data_NNNN.wav`, etc. are
    /// written (file mode) or searched for (receiver mode).
    pub artifact_prefix: String,
}

impl SessionOpts {
    pub fn new(profile: Profile, artifact_prefix: impl Into<String>) -> Self {
        Self {
            profile,
            compress: true,
            artifact_prefix: artifact_prefix.into(),
        }
    }
}
