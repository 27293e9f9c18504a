use thiserror::Error;

#[derive(Debug, Error)]
pub enum Mp4Error {
    #[error("truncated `{fourcc}` box: {reason}")]
    Truncated { fourcc: String, reason: String },

    #[error("unsupported `{fourcc}` version {version}")]
    UnsupportedVersion { fourcc: String, version: u8 },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Mp4Error {
    pub fn truncated(fourcc: &[u8; 4], reason: impl Into<String>) -> Self {
        Self::Truncated {
            fourcc: crate::box_utils::fourcc_to_string(fourcc),
            reason: reason.into(),
        }
    }

    pub fn unsupported_version(fourcc: &[u8; 4], version: u8) -> Self {
        Self::UnsupportedVersion {
            fourcc: crate::box_utils::fourcc_to_string(fourcc),
            version,
        }
    }
}
