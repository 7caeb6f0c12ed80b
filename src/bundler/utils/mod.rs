//! Utility helpers shared by the bundler components.

pub mod fs;
