//! Byte-at-a-time line assembly for the serial command channel.

#[derive(Debug, Eq, PartialEq)]
pub enum LineEvent<'a> {
    Pending,
    Line(&'a [u8]),
    /// The line outgrew the buffer. Reported once; the rest of it up to the
    /// next terminator is dropped.
    Overlong,
}

/// Collects bytes until CR or LF. Empty lines are skipped.
pub struct LineReader<const N: usize> {
    buf: [u8; N],
    len: usize,
    discarding: bool,
}

impl<const N: usize> LineReader<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            discarding: false,
        }
    }

    pub fn push(&mut self, byte: u8) -> LineEvent<'_> {
        if byte == b'\r' || byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                return LineEvent::Pending;
            }
            if self.len == 0 {
                return LineEvent::Pending;
            }
            let len = self.len;
            self.len = 0;
            return LineEvent::Line(&self.buf[..len]);
        }

        if self.discarding {
            return LineEvent::Pending;
        }
        if self.len < N {
            self.buf[self.len] = byte;
            self.len += 1;
            return LineEvent::Pending;
        }

        self.len = 0;
        self.discarding = true;
        LineEvent::Overlong
    }
}

impl<const N: usize> Default for LineReader<N> {
    fn default() -> Self {
        Self::new()
    }
}
