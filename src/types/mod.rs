//! Shared type definitions
//!
//! Wire shapes, normalized models, filter state and configuration.

pub mod config;
pub mod filter;
pub mod model;
pub mod raw;
