//! Error types for channel operations.

use thiserror::Error as ThisError;

/// The category of a channel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
    /// The channel could not be created (allocation or live-channel limit).
    #[error("resource exhausted")]
    ResourceExhausted,

    /// Write attempted while the read end is closed.
    #[error("broken channel")]
    BrokenChannel,

    /// Operation on a locally closed endpoint, or bad configuration.
    #[error("invalid argument")]
    InvalidArgument,

    /// A non-blocking operation could not make progress.
    #[error("operation would block")]
    WouldBlock,

    /// A configured wait deadline elapsed.
    #[error("operation timed out")]
    TimedOut,

    /// End-of-stream reached before the requested bytes arrived.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// A write transferred zero bytes.
    #[error("write zero bytes")]
    WriteZero,
}

/// A channel error: a kind plus a short static description of the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("{kind}: {detail}")]
pub struct Error {
    kind: ErrorKind,
    detail: &'static str,
}

impl Error {
    pub fn new(kind: ErrorKind, detail: &'static str) -> Self {
        Error { kind, detail }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &'static str {
        self.detail
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> std::io::Error {
        let kind = match err.kind {
            ErrorKind::ResourceExhausted => std::io::ErrorKind::OutOfMemory,
            ErrorKind::BrokenChannel => std::io::ErrorKind::BrokenPipe,
            ErrorKind::InvalidArgument => std::io::ErrorKind::InvalidInput,
            ErrorKind::WouldBlock => std::io::ErrorKind::WouldBlock,
            ErrorKind::TimedOut => std::io::ErrorKind::TimedOut,
            ErrorKind::UnexpectedEof => std::io::ErrorKind::UnexpectedEof,
            ErrorKind::WriteZero => std::io::ErrorKind::WriteZero,
        };
        std::io::Error::new(kind, err)
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = Error::new(ErrorKind::BrokenChannel, "read end closed");
        assert_eq!(err.to_string(), "broken channel: read end closed");
        assert_eq!(err.kind(), ErrorKind::BrokenChannel);
    }

    #[test]
    fn test_io_error_mapping() {
        let cases = [
            (ErrorKind::BrokenChannel, std::io::ErrorKind::BrokenPipe),
            (ErrorKind::WouldBlock, std::io::ErrorKind::WouldBlock),
            (ErrorKind::TimedOut, std::io::ErrorKind::TimedOut),
            (ErrorKind::InvalidArgument, std::io::ErrorKind::InvalidInput),
            (ErrorKind::UnexpectedEof, std::io::ErrorKind::UnexpectedEof),
        ];
        for (kind, expected) in cases {
            let io: std::io::Error = Error::new(kind, "mapped").into();
            assert_eq!(io.kind(), expected);
        }
    }
}
