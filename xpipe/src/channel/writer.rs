//! Write end of a channel.

use std::sync::Arc;
use std::time::Instant;

use log::trace;

use super::{ChannelStats, EndpointState, Shared, Side};
use crate::error::{Error, ErrorKind, Result};

/// The producing endpoint of a channel.
///
/// Dropping it closes the write end; readers then drain what is left and
/// see end-of-stream.
#[derive(Debug)]
pub struct WriteEnd {
    shared: Arc<Shared>,
}

impl WriteEnd {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Appends as much of `data` as fits and returns that count.
    ///
    /// Waits while the buffer is completely full. Never waits for all of
    /// `data` to fit: a payload bigger than the free space is a partial
    /// write and the caller reissues the rest.
    ///
    /// Fails with `BrokenChannel` once the read end is closed, even if a
    /// wait was in progress; nothing is transferred in that case.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        self.write_inner(data, true)
    }

    /// Like [`write`](Self::write) but fails with `WouldBlock` instead of
    /// waiting on a full buffer.
    pub fn try_write(&self, data: &[u8]) -> Result<usize> {
        self.write_inner(data, false)
    }

    /// Writes all of `data`, reissuing partial writes until done.
    pub fn write_all(&self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            match self.write(data)? {
                0 => return Err(Error::new(ErrorKind::WriteZero, "write accepted no bytes")),
                n => data = &data[n..],
            }
        }
        Ok(())
    }

    fn write_inner(&self, data: &[u8], block: bool) -> Result<usize> {
        let shared = &*self.shared;
        let deadline = shared.write_timeout.map(|t| Instant::now() + t);
        let mut state = shared.lock();
        let mut waited = false;

        loop {
            if state.writer.is_closed() {
                return Err(Error::new(ErrorKind::InvalidArgument, "write end is closed"));
            }
            if state.reader.is_closed() {
                return Err(Error::new(ErrorKind::BrokenChannel, "read end is closed"));
            }
            if data.is_empty() {
                return Ok(0);
            }
            if !state.buffer.is_full() {
                break;
            }
            if !block {
                return Err(Error::new(ErrorKind::WouldBlock, "channel buffer is full"));
            }
            if !waited {
                waited = true;
                state.stats.writer_waits += 1;
                trace!("channel {}: buffer full, writer waiting", shared.id);
            }
            state = shared.wait(&shared.writable, state, deadline)?;
        }

        let n = state.buffer.write(data);
        state.stats.bytes_written += n as u64;
        state.stats.writes += 1;
        trace!(
            "channel {}: wrote {}/{} bytes, {} buffered",
            shared.id,
            n,
            data.len(),
            state.buffer.len()
        );
        drop(state);

        shared.readable.notify_all();
        Ok(n)
    }

    /// Closes the write end. Idempotent.
    pub fn close(&self) {
        self.shared.close(Side::Write);
    }

    pub fn state(&self) -> EndpointState {
        self.shared.lock().writer
    }

    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// True once the read end has closed; every further write fails.
    pub fn is_broken(&self) -> bool {
        self.shared.lock().reader.is_closed()
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

impl Drop for WriteEnd {
    fn drop(&mut self) {
        self.close();
    }
}
