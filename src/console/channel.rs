//! Channel-backed console.
//!
//! A reader thread decodes stdin (UART0 on ESP-IDF) into lines and pushes
//! them into a bounded `embassy-sync` channel; the dispatcher task pops
//! them through [`ChannelConsole`], whose `read_line` waits on the channel
//! or an `async-io-mini` timer, whichever fires first.
//!
//! ```text
//! ┌──────────────┐   Line   ┌──────────────────┐
//! │ stdin reader │────────▶│  console task     │
//! │  (thread)    │ depth 4  │  (dispatcher)     │
//! └──────────────┘          └──────────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::io::{self, Read, Write};
use std::thread::JoinHandle;

use async_io_mini::Timer;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future;
use log::{info, warn};

use crate::app::ports::{ConsolePort, Line};
use crate::drivers::task_pin::{Core, TaskSpec, spawn_on_core};
use crate::error::ConsoleError;

use super::codec::LineDecoder;

/// Lines buffered between the reader and the dispatcher.
const LINE_QUEUE_DEPTH: usize = 4;

/// Back-off when a non-blocking stdin has nothing to read.
const READ_IDLE: Duration = Duration::from_millis(10);

const READER_TASK: TaskSpec = TaskSpec {
    name: "stdin\0",
    core: Core::Pro,
    priority: 1,
    stack_kb: 4,
};

/// Decoded input lines plus an end-of-input marker.
pub struct ConsoleInput {
    lines: Channel<CriticalSectionRawMutex, Line, LINE_QUEUE_DEPTH>,
    closed: AtomicBool,
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInput {
    pub const fn new() -> Self {
        Self {
            lines: Channel::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Queue a decoded line. A full queue drops the line.
    pub fn push(&self, line: Line) -> bool {
        if self.lines.try_send(line).is_err() {
            warn!("console: input queue full, line dropped");
            return false;
        }
        true
    }

    /// Mark the input side finished (stdin EOF or read error).
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn pending(&self) -> usize {
        self.lines.len()
    }
}

/// Input for the firmware console.
pub static STDIN_INPUT: ConsoleInput = ConsoleInput::new();

/// [`ConsolePort`] over a [`ConsoleInput`] and any byte sink.
pub struct ChannelConsole<'a, W> {
    input: &'a ConsoleInput,
    out: W,
}

impl<'a, W: Write> ChannelConsole<'a, W> {
    pub fn new(input: &'a ConsoleInput, out: W) -> Self {
        Self { input, out }
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

impl<W: Write> ConsolePort for ChannelConsole<'_, W> {
    fn lines_available(&self) -> usize {
        self.input.pending()
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Option<Line>, ConsoleError> {
        if let Ok(line) = self.input.lines.try_receive() {
            return Ok(Some(line));
        }
        if self.input.is_closed() {
            return Err(ConsoleError::Closed);
        }

        let line = future::block_on(future::or(
            async { Some(self.input.lines.receive().await) },
            async {
                Timer::after(timeout).await;
                None
            },
        ));
        Ok(line)
    }

    fn write_str(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|_| ConsoleError::WriteFailed)
    }
}

/// Decode everything `source` produces into `input`, closing it at EOF.
pub fn pump_lines(mut source: impl Read, input: &ConsoleInput) {
    let mut decoder = LineDecoder::new();
    let mut buf = [0u8; 64];
    loop {
        match source.read(&mut buf) {
            Ok(0) => {
                info!("console: input closed");
                break;
            }
            Ok(n) => decoder.feed(&buf[..n], |line| {
                input.push(line);
            }),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                std::thread::sleep(READ_IDLE);
            }
            Err(e) => {
                warn!("console: stdin read failed: {}", e);
                break;
            }
        }
    }
    input.close();
}

/// Spawn the stdin reader thread feeding `input`.
pub fn spawn_stdin_reader(input: &'static ConsoleInput) -> io::Result<JoinHandle<()>> {
    spawn_on_core(READER_TASK, move || pump_lines(io::stdin(), input))
}
