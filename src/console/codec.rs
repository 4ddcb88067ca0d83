//! Newline frame codec for the debug console.
//!
//! Wire format: UTF-8 text terminated by `\n`; a `\r` anywhere is dropped
//! so both `\n` and `\r\n` terminals work.
//!
//! The decoder accumulates bytes one at a time and yields complete lines.
//! A line longer than [`LINE_CAPACITY`] is discarded whole (including the
//! bytes after the overflow, up to its terminator); so is a line that is
//! not valid UTF-8. Empty lines yield nothing.

use log::warn;

use crate::app::ports::{LINE_CAPACITY, Line};

/// Streaming line decoder.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: heapless::Vec<u8, LINE_CAPACITY>,
    overflow: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns `Some` when it completed a line.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' => None,
            b'\n' => self.finish(),
            _ => {
                if self.buf.push(byte).is_err() {
                    self.overflow = true;
                }
                None
            }
        }
    }

    /// Feed a chunk, handing each completed line to `on_line`.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(Line)) {
        for &byte in data {
            if let Some(line) = self.push(byte) {
                on_line(line);
            }
        }
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflow = false;
    }

    fn finish(&mut self) -> Option<Line> {
        if self.overflow {
            warn!("console: line over {} bytes dropped", LINE_CAPACITY);
            self.reset();
            return None;
        }
        let line = match core::str::from_utf8(&self.buf) {
            Ok(text) if !text.is_empty() => {
                let mut line = Line::new();
                line.push_str(text).ok().map(|()| line)
            }
            Ok(_) => None,
            Err(_) => {
                warn!("console: non UTF-8 line dropped");
                None
            }
        };
        self.reset();
        line
    }
}
