//! Foundation types and traits for Marquee.
//!
//! This crate contains the platform-agnostic types shared by all Marquee
//! crates: colors, the renderer trait, input events and mappings, the
//! settings store, and error types.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
