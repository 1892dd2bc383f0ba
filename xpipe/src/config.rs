use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::{DEFAULT_CAPACITY, DEFAULT_MAX_OPEN_CHANNELS};

/// Creation-time settings for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Bytes the buffer holds before writers have to wait.
    pub capacity: usize,
    /// Process-wide limit on live channels; creation past it fails.
    pub max_open_channels: usize,
    /// Longest a read waits for data. `None` waits indefinitely.
    pub read_timeout: Option<Duration>,
    /// Longest a write waits for space. `None` waits indefinitely.
    pub write_timeout: Option<Duration>,
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_open_channels: DEFAULT_MAX_OPEN_CHANNELS,
            read_timeout: None,
            write_timeout: None,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_open_channels(mut self, max: usize) -> Self {
        self.max_open_channels = max;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "capacity must be non-zero"));
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.capacity, 64 * 1024);
        assert_eq!(config.read_timeout, None);
        assert_eq!(config.write_timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ChannelConfig::new().with_capacity(0).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
