//! Core types shared across zkcli facilities
//!
//! This crate provides the canonical schema constants used by the error
//! and logging facilities, so that every crate emits the same field keys
//! and event names.

pub mod schema;
