//! Byte ring buffer backing a channel.
//!
//! Storage is allocated once at creation and never grows; the capacity
//! is the channel's capacity.

use std::collections::TryReserveError;
use std::fmt;

/// A fixed-capacity FIFO of bytes.
///
/// Writes and reads may wrap around the end of the storage; callers
/// only ever see the logical byte order.
pub struct RingBuffer {
    /// The underlying storage.
    buffer: Box<[u8]>,

    /// Read position (head).
    head: usize,

    /// Write position (tail).
    tail: usize,

    /// Current number of bytes in buffer.
    len: usize,
}

impl RingBuffer {
    /// Allocates an empty ring of `capacity` bytes.
    ///
    /// Fails instead of aborting when the allocator cannot satisfy the request.
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut storage = Vec::new();
        storage.try_reserve_exact(capacity)?;
        storage.resize(capacity, 0u8);

        Ok(Self {
            buffer: storage.into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of bytes that can be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Drops all buffered bytes.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Appends as much of `data` as fits.
    ///
    /// Returns the number of bytes written.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let cap = self.capacity();
        let to_write = data.len().min(self.remaining());
        if to_write == 0 {
            return 0;
        }

        let first_chunk = to_write.min(cap - self.tail);
        self.buffer[self.tail..self.tail + first_chunk].copy_from_slice(&data[..first_chunk]);

        if to_write > first_chunk {
            let second_chunk = to_write - first_chunk;
            self.buffer[..second_chunk].copy_from_slice(&data[first_chunk..to_write]);
        }

        self.tail = (self.tail + to_write) % cap;
        self.len += to_write;

        to_write
    }

    /// Removes up to `buf.len()` bytes from the front.
    ///
    /// Returns the number of bytes read.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let cap = self.capacity();
        let to_read = buf.len().min(self.len);
        if to_read == 0 {
            return 0;
        }

        let first_chunk = to_read.min(cap - self.head);
        buf[..first_chunk].copy_from_slice(&self.buffer[self.head..self.head + first_chunk]);

        if to_read > first_chunk {
            let second_chunk = to_read - first_chunk;
            buf[first_chunk..to_read].copy_from_slice(&self.buffer[..second_chunk]);
        }

        self.head = (self.head + to_read) % cap;
        self.len -= to_read;

        to_read
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}
