// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod diff;
pub mod error;
pub mod notify;
pub mod poller;
pub mod record;
pub mod session;
pub mod specs;

pub use record::{Record, Snapshot};
