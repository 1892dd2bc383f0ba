//! Read end of a channel.

use std::sync::Arc;
use std::time::Instant;

use log::trace;

use super::{ChannelStats, EndpointState, Shared, Side};
use crate::error::{Error, ErrorKind, Result};

/// The consuming endpoint of a channel.
///
/// Dropping it closes the read end: buffered bytes are discarded and
/// writers get `BrokenChannel`.
#[derive(Debug)]
pub struct ReadEnd {
    shared: Arc<Shared>,
}

impl ReadEnd {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Removes up to `buf.len()` bytes from the front of the buffer.
    ///
    /// Returns immediately with whatever is buffered, even if that is less
    /// than requested. Waits only while the buffer is empty and the write
    /// end is open. `Ok(0)` with a non-empty `buf` means end-of-stream.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.read_inner(buf, true)
    }

    /// Like [`read`](Self::read) but fails with `WouldBlock` instead of
    /// waiting on an empty buffer.
    pub fn try_read(&self, buf: &mut [u8]) -> Result<usize> {
        self.read_inner(buf, false)
    }

    /// Fills `buf` completely, reading as many times as needed.
    pub fn read_exact(&self, mut buf: &mut [u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.read(buf)? {
                0 => {
                    return Err(Error::new(
                        ErrorKind::UnexpectedEof,
                        "write end closed before buffer was filled",
                    ));
                }
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    /// Reads until end-of-stream, appending to `out`.
    ///
    /// Returns the number of bytes appended.
    pub fn read_to_end(&self, out: &mut Vec<u8>) -> Result<usize> {
        let mut chunk = [0u8; 4096];
        let mut total = 0;
        loop {
            match self.read(&mut chunk)? {
                0 => return Ok(total),
                n => {
                    out.extend_from_slice(&chunk[..n]);
                    total += n;
                }
            }
        }
    }

    fn read_inner(&self, buf: &mut [u8], block: bool) -> Result<usize> {
        let shared = &*self.shared;
        let deadline = shared.read_timeout.map(|t| Instant::now() + t);
        let mut state = shared.lock();
        let mut waited = false;

        loop {
            if state.reader.is_closed() {
                return Err(Error::new(ErrorKind::InvalidArgument, "read end is closed"));
            }
            if buf.is_empty() {
                return Ok(0);
            }
            if !state.buffer.is_empty() {
                break;
            }
            if state.writer.is_closed() {
                trace!("channel {}: end of stream", shared.id);
                return Ok(0);
            }
            if !block {
                return Err(Error::new(ErrorKind::WouldBlock, "channel buffer is empty"));
            }
            if !waited {
                waited = true;
                state.stats.reader_waits += 1;
                trace!("channel {}: buffer empty, reader waiting", shared.id);
            }
            state = shared.wait(&shared.readable, state, deadline)?;
        }

        let n = state.buffer.read(buf);
        state.stats.bytes_read += n as u64;
        state.stats.reads += 1;
        trace!(
            "channel {}: read {}/{} bytes, {} left",
            shared.id,
            n,
            buf.len(),
            state.buffer.len()
        );
        drop(state);

        shared.writable.notify_all();
        Ok(n)
    }

    /// Closes the read end. Idempotent.
    pub fn close(&self) {
        self.shared.close(Side::Read);
    }

    pub fn state(&self) -> EndpointState {
        self.shared.lock().reader
    }

    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// True when the buffer is drained and the write end is closed.
    pub fn is_eof(&self) -> bool {
        let state = self.shared.lock();
        state.buffer.is_empty() && state.writer.is_closed()
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.shared.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shared.lock().buffer.capacity()
    }

    pub fn stats(&self) -> ChannelStats {
        self.shared.lock().stats
    }
}

impl Drop for ReadEnd {
    fn drop(&mut self) {
        self.close();
    }
}
