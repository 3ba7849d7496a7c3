//! hapanel library
//!
//! Home Assistant sensor readings and Open-Meteo weather, normalized into
//! small icon-annotated rows for a constrained display.

pub mod cli;
pub mod data;
pub mod days;
pub mod glyphs;
