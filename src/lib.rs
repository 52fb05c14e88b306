//! Melodic Chrono: a chronometer that plays notes from a tiny rule language.

pub mod audio;
pub mod config;
pub mod dsl;
pub mod event;
