//! Dynfilter CLI - resolve dynamic variables in JSON filters from the shell.
//!
//! The binary reads a filter, applies an accountability and parse context
//! taken from flags and an optional `dynfilter.yaml`, and prints the resolved
//! filter as JSON.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod inspect;
pub mod output;
