//! Utility functions and helpers.

pub mod http;
pub mod time;

pub use time::{Clock, FixedClock, SystemClock};
