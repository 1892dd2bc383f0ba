//! The channel: one bounded byte buffer shared by a write end and a read end.
//!
//! Both endpoints hold an `Arc` to the same `Shared` state. All buffer
//! access happens under one mutex; two condition variables carry the
//! wakeups a blocked peer needs:
//!
//! - `readable`: bytes were appended, or the write end closed
//! - `writable`: bytes were removed, or the read end closed

mod reader;
mod writer;

pub use reader::ReadEnd;
pub use writer::WriteEnd;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

use crate::buffer::RingBuffer;
use crate::config::ChannelConfig;
use crate::error::{Error, ErrorKind, Result};

/// Channels created and not yet closed on both ends.
static OPEN_CHANNELS: AtomicUsize = AtomicUsize::new(0);

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Endpoint state. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Endpoint is usable.
    Open,

    /// Endpoint was closed or dropped.
    Closed,
}

impl EndpointState {
    #[inline]
    pub fn is_closed(self) -> bool {
        self == EndpointState::Closed
    }
}

/// Cumulative counters for one channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Bytes accepted by writes.
    pub bytes_written: u64,

    /// Bytes handed out by reads.
    pub bytes_read: u64,

    /// Writes that transferred at least one byte.
    pub writes: u64,

    /// Reads that transferred at least one byte.
    pub reads: u64,

    /// Writes that found the buffer full and had to wait.
    pub writer_waits: u64,

    /// Reads that found the buffer empty and had to wait.
    pub reader_waits: u64,
}

/// Which endpoint an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Write,
    Read,
}

#[derive(Debug)]
pub(crate) struct State {
    pub(crate) buffer: RingBuffer,
    pub(crate) writer: EndpointState,
    pub(crate) reader: EndpointState,
    pub(crate) stats: ChannelStats,
}

#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) id: u64,
    state: Mutex<State>,
    pub(crate) readable: Condvar,
    pub(crate) writable: Condvar,
    pub(crate) read_timeout: Option<Duration>,
    pub(crate) write_timeout: Option<Duration>,
}

impl Shared {
    /// Locks the channel state.
    ///
    /// Ring updates finish their copies before touching counters, so a
    /// panic elsewhere cannot leave the state torn; poisoning is ignored.
    pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks on `cond` until notified or until `deadline` passes.
    ///
    /// Callers re-check their predicate after every return.
    pub(crate) fn wait<'a>(
        &self,
        cond: &Condvar,
        guard: MutexGuard<'a, State>,
        deadline: Option<Instant>,
    ) -> Result<MutexGuard<'a, State>> {
        match deadline {
            None => Ok(cond.wait(guard).unwrap_or_else(PoisonError::into_inner)),
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(Error::new(ErrorKind::TimedOut, "deadline elapsed while waiting"));
                }
                let (guard, _) = cond
                    .wait_timeout(guard, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner);
                Ok(guard)
            }
        }
    }

    /// Marks one endpoint closed and wakes everyone waiting on the channel.
    ///
    /// Returns false if that endpoint was already closed.
    pub(crate) fn close(&self, side: Side) -> bool {
        let mut state = self.lock();
        let (this, other) = match side {
            Side::Write => (state.writer, state.reader),
            Side::Read => (state.reader, state.writer),
        };
        if this.is_closed() {
            return false;
        }

        match side {
            Side::Write => state.writer = EndpointState::Closed,
            Side::Read => {
                state.reader = EndpointState::Closed;
                // nobody can ever consume these
                let discarded = state.buffer.len();
                state.buffer.clear();
                if discarded > 0 {
                    debug!("channel {}: discarded {} unread bytes", self.id, discarded);
                }
            }
        }
        let released = other.is_closed();
        drop(state);

        debug!("channel {}: {:?} end closed", self.id, side);
        if released {
            OPEN_CHANNELS.fetch_sub(1, Ordering::AcqRel);
            debug!("channel {}: both ends closed, released", self.id);
        }

        self.readable.notify_all();
        self.writable.notify_all();
        true
    }
}

/// Returns the number of channels with at least one endpoint still open.
pub fn open_channels() -> usize {
    OPEN_CHANNELS.load(Ordering::Acquire)
}

/// Creates a channel with the default configuration (64 KiB, no timeouts).
pub fn channel() -> Result<(WriteEnd, ReadEnd)> {
    channel_with_config(&ChannelConfig::default())
}

/// Creates a channel, returning its write end and read end.
///
/// Fails with `ResourceExhausted` if the buffer cannot be allocated or
/// the live-channel limit is reached, and with `InvalidArgument` on a
/// zero capacity.
pub fn channel_with_config(config: &ChannelConfig) -> Result<(WriteEnd, ReadEnd)> {
    config.validate()?;

    let buffer = RingBuffer::with_capacity(config.capacity)
        .map_err(|_| Error::new(ErrorKind::ResourceExhausted, "cannot allocate channel buffer"))?;

    let max = config.max_open_channels;
    OPEN_CHANNELS
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < max).then_some(n + 1))
        .map_err(|_| Error::new(ErrorKind::ResourceExhausted, "too many open channels"))?;

    let id = NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed);
    let shared = Arc::new(Shared {
        id,
        state: Mutex::new(State {
            buffer,
            writer: EndpointState::Open,
            reader: EndpointState::Open,
            stats: ChannelStats::default(),
        }),
        readable: Condvar::new(),
        writable: Condvar::new(),
        read_timeout: config.read_timeout,
        write_timeout: config.write_timeout,
    });

    debug!("channel {}: created, capacity {} bytes", id, config.capacity);

    Ok((WriteEnd::new(Arc::clone(&shared)), ReadEnd::new(shared)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(capacity: usize) -> (WriteEnd, ReadEnd) {
        channel_with_config(&ChannelConfig::new().with_capacity(capacity)).unwrap()
    }

    #[test]
    fn test_partial_reads_of_one_write() {
        let (tx, rx) = channel().unwrap();
        assert_eq!(tx.write(b"PIPE data flow demo:").unwrap(), 20);

        let mut buf = [0u8; 10];
        assert_eq!(rx.read(&mut buf[..5]).unwrap(), 5);
        assert_eq!(&buf[..5], b"PIPE ");
        assert_eq!(rx.read(&mut buf[..5]).unwrap(), 5);
        assert_eq!(&buf[..5], b"data ");
        assert_eq!(rx.read(&mut buf).unwrap(), 10);
        assert_eq!(&buf, b"flow demo:");
        assert!(rx.is_empty());
    }

    #[test]
    fn test_one_read_spans_several_writes() {
        let (tx, rx) = channel().unwrap();
        tx.write(b"ab").unwrap();
        tx.write(b"").unwrap();
        tx.write(b"cde").unwrap();
        tx.write(b"f").unwrap();

        let mut buf = [0u8; 64];
        let n = rx.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"abcdef");
    }

    #[test]
    fn test_oversized_write_is_partial() {
        let (tx, rx) = small(8);
        assert_eq!(tx.write(b"0123456789").unwrap(), 8);
        assert_eq!(rx.len(), 8);
        assert_eq!(tx.try_write(b"x").unwrap_err().kind(), ErrorKind::WouldBlock);

        let mut buf = [0u8; 3];
        rx.read(&mut buf).unwrap();
        // three bytes of room now
        assert_eq!(tx.write(b"89xyz").unwrap(), 3);

        let mut rest = Vec::new();
        tx.close();
        rx.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"3456789x");
    }

    #[test]
    fn test_end_of_stream_is_repeatable() {
        let (tx, rx) = channel().unwrap();
        tx.write(b"last").unwrap();
        tx.close();

        let mut buf = [0u8; 16];
        assert_eq!(rx.read(&mut buf).unwrap(), 4);
        assert!(rx.is_eof());
        for _ in 0..3 {
            assert_eq!(rx.read(&mut buf).unwrap(), 0);
        }
    }

    #[test]
    fn test_zero_length_read_does_not_block() {
        let (_tx, rx) = channel().unwrap();
        assert_eq!(rx.read(&mut []).unwrap(), 0);
        assert!(!rx.is_eof());
    }

    #[test]
    fn test_broken_channel() {
        let (tx, rx) = channel().unwrap();
        tx.write(b"pending").unwrap();
        rx.close();

        let err = tx.write(b"more").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenChannel);
        assert_eq!(tx.len(), 0);
        assert_eq!(tx.stats().bytes_written, 7);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (tx, rx) = channel().unwrap();
        tx.close();
        tx.close();
        assert!(tx.is_closed());

        let err = tx.write(b"x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        rx.close();
        let err = rx.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_try_read_on_empty() {
        let (tx, rx) = channel().unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(rx.try_read(&mut buf).unwrap_err().kind(), ErrorKind::WouldBlock);
        drop(tx);
        assert_eq!(rx.try_read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_stats() {
        let (tx, rx) = channel().unwrap();
        tx.write(b"hello").unwrap();
        tx.write(b"world").unwrap();
        let mut buf = [0u8; 3];
        rx.read(&mut buf).unwrap();

        let stats = rx.stats();
        assert_eq!(stats.bytes_written, 10);
        assert_eq!(stats.bytes_read, 3);
        assert_eq!(stats.writes, 2);
        assert_eq!(stats.reads, 1);
        assert_eq!(stats.writer_waits, 0);
    }
}
