//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_reasons;
pub mod output;
