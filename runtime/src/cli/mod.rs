//! CLI subcommand implementations for the ionian-wx binary.

pub mod doctor;
pub mod run_cmd;
pub mod stations_cmd;
