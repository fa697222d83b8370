// src/lib.rs — Library root for wavectl

pub mod api;
pub mod auth;
pub mod classifier;
pub mod cli;
pub mod gesture;
pub mod infra;
pub mod session;
pub mod snapshot;
pub mod spotify;
