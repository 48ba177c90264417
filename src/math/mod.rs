//! Mathematical utilities for the generator

/// Bijective pairing of integer coordinates
pub mod pairing;
