//! CLI module containing argument parsing, configuration and output formatting

pub mod args;
pub mod config;
pub mod display;

#[cfg(test)]
mod tests;
