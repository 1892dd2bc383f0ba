//! `std::io` adapters so endpoints plug into readers, writers and `io::copy`.

use std::io;

use crate::channel::{ReadEnd, WriteEnd};

impl io::Read for ReadEnd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        ReadEnd::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Read for &ReadEnd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        ReadEnd::read(*self, buf).map_err(io::Error::from)
    }
}

impl io::Write for WriteEnd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        WriteEnd::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &WriteEnd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        WriteEnd::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
