//! # wifiqr-server
//!
//! HTTP server library for wifiqr.
//!
//! This library provides the API handlers and state management for wifiqr.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod api;
pub mod logging;
pub mod state;
