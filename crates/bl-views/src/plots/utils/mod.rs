//! Shared plot utilities

pub mod colors;
pub mod stats;
