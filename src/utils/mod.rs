//! Utility functions for building and checking signals.
//!
//! # Modules
//!
//! - [`comparison`] - Signal comparison and level measurement
//! - [`generation`] - Test signal generation

pub mod comparison;
pub mod generation;

pub use comparison::*;
pub use generation::*;
