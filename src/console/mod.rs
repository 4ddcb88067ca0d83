//! Debug console transport: line framing and the channel-backed
//! [`ConsolePort`](crate::app::ports::ConsolePort) adapter.

pub mod channel;
pub mod codec;
