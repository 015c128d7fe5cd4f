// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Source Error: {0}")]
    Source(#[from] SourceError),
}

/// Reasons the engine refuses a media source.
/// Used to provide user-friendly, localized notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The path does not exist or cannot be read.
    #[error("Media file not found: {0}")]
    NotFound(String),

    /// The file extension or container is not a supported video format.
    #[error("Unsupported video format")]
    UnsupportedFormat,

    /// The container opened but holds no video stream.
    #[error("No video stream found")]
    NoVideoStream,

    /// The container is damaged or truncated.
    #[error("Video file is corrupted")]
    Corrupted,

    /// Anything the classifier does not recognize.
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            SourceError::NotFound(_) => "error-source-not-found",
            SourceError::UnsupportedFormat => "error-source-unsupported-format",
            SourceError::NoVideoStream => "error-source-no-video-stream",
            SourceError::Corrupted => "error-source-corrupted",
            SourceError::Other(_) => "error-source-general",
        }
    }

    /// Classifies a raw FFmpeg error message.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("no video stream") || msg_lower.contains("stream not found") {
            return SourceError::NoVideoStream;
        }

        if msg_lower.contains("no such file")
            || msg_lower.contains("not found")
            || msg_lower.contains("permission denied")
        {
            return SourceError::NotFound(msg.to_string());
        }

        if msg_lower.contains("invalid data found") || msg_lower.contains("unknown format") {
            return SourceError::UnsupportedFormat;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
            || msg_lower.contains("end of file")
        {
            return SourceError::Corrupted;
        }

        SourceError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
