//! osupdate: OS software-update client core
//!
//! A library for resolving the update client's durable settings
//! (state directory, path prefix, server URLs, format id) with layered
//! precedence, and for profiling update operations with nested timers.

pub mod config;
pub mod download;
pub mod hashdump;
pub mod timing;
