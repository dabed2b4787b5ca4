//! Identity provider implementations.

pub mod fusionauth;
