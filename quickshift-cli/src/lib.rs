//! Support library for the `quickshift` binary.
//!
//! Exposes argument parsing, command execution and logging setup so tests and
//! doctests can drive the command pipeline without spawning a process.

pub mod cli;
pub mod logging;
