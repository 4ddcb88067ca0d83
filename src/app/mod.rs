//! Application core: shared state, console commands and the port traits.
//!
//! Nothing in here touches a peripheral directly. Hardware, the console
//! transport and event output are reached through the traits in
//! [`ports`], so the whole layer runs under host tests.

pub mod commands;
pub mod context;
pub mod dispatcher;
pub mod events;
pub mod ports;
