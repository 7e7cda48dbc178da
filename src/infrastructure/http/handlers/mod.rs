//! HTTP Handlers

mod health;
mod job;

pub use health::*;
pub use job::*;
