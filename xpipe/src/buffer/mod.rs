//! Buffer management for the channel.
//!
//! - RingBuffer: fixed-capacity circular byte FIFO

mod ring;

pub use ring::RingBuffer;
