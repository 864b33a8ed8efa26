// src/lib.rs

//! quakefeed: derived views over today's USGS earthquake feed

pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
