//! Peripheral initialisation, the alarm output, periodic timing and
//! core-pinned task spawning.

pub mod hw_init;
pub mod output;
pub mod periodic;
pub mod task_pin;
