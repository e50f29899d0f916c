//! PI-CAI dataset fetcher
//!
//! This library provides the download-and-unpack pipeline behind the `picai-fetch` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
