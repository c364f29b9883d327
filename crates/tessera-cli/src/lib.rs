//! Library side of the `tessera` binary: argument definitions and one
//! module per verb.

pub mod cli;
pub mod commands;
