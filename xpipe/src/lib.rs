//! # xpipe - A Bounded Byte Pipe
//!
//! xpipe models a unidirectional pipe between two execution contexts:
//! one bounded FIFO byte buffer, one write end, one read end.
//!
//! - **Byte stream**: no message boundaries; writers and readers pick
//!   their own transfer sizes
//! - **Partial transfers**: reads return whatever is buffered, writes
//!   accept whatever fits, both report the exact count
//! - **Backpressure**: writers wait while the buffer is full, readers
//!   wait while it is empty
//! - **Close semantics**: end-of-stream after the write end closes,
//!   `BrokenChannel` after the read end closes
//!
//! ## Architecture
//!
//! ```text
//!   producer thread                          consumer thread
//!  ┌──────────────┐                         ┌──────────────┐
//!  │   WriteEnd   │                         │   ReadEnd    │
//!  └──────┬───────┘                         └──────▲───────┘
//!         │ write()       ┌──────────────┐         │ read()
//!         └──────────────►│  RingBuffer  ├─────────┘
//!                         │  (64 KiB)    │
//!           writable ◄────┤ Mutex+Condvar├────► readable
//!                         └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! let (tx, rx) = xpipe::channel()?;
//! tx.write(b"PIPE data flow demo:")?;
//!
//! let mut buf = [0u8; 5];
//! let n = rx.read(&mut buf)?;
//! assert_eq!(&buf[..n], b"PIPE ");
//! # Ok::<(), xpipe::Error>(())
//! ```

#![deny(unsafe_code)]

pub mod buffer;
pub mod channel;
pub mod config;
pub mod error;
pub mod io;

pub use channel::{channel, channel_with_config, open_channels, ChannelStats, EndpointState, ReadEnd, WriteEnd};
pub use config::ChannelConfig;
pub use error::{Error, ErrorKind, Result};

/// Default buffer capacity in bytes, the classic pipe size.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Default limit on channels alive at once in a process.
pub const DEFAULT_MAX_OPEN_CHANNELS: usize = 1024;
