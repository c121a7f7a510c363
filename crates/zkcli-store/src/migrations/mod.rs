//! Schema migrations
//!
//! SQL files are embedded at compile time and applied in order, each at most
//! once per database.

pub mod embedded;
pub mod runner;

pub use runner::apply_migrations;
