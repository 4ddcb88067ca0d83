//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements   | Connects to                    |
//! |------------|--------------|--------------------------------|
//! | `hardware` | HardwarePort | ESP32 ADC1 oneshot, GPIO       |
//! | `log_sink` | EventSink    | Serial log output              |
//!
//! The console adapter lives in [`crate::console::channel`].

pub mod hardware;
pub mod log_sink;
