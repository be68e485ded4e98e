//! Segcut - split audio files into named segments
//!
//! This library crate exposes the application layer for integration testing.

pub mod config;
pub mod server;
pub mod session;
