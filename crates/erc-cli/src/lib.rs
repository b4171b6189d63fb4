//! Library components of the `erc` command-line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
