//! Support modules for the `logmask` command-line tool.

pub mod exit_codes;
pub mod logging;
