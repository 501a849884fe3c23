// Copyright 2026 Ionian Weather Contributors
// SPDX-License-Identifier: MIT

//! ionian-wx runtime library: HTTP and browser acquisition, the six weather
//! sources and the CLI commands that drive them.
//!
//! This library crate exposes the modules for integration testing.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod renderer;
pub mod sources;
