//! Shared helpers for the kjtxt service crates.

pub mod utils;
