//! Nubit DA integration: payload recovery with square verification, batch storing and the Nuport
//! RPC transport.

pub mod nubit;
mod utils;
