//! Shared fixtures for realistic routing tests.

pub mod bengaluru_locations;

pub use bengaluru_locations::*;
