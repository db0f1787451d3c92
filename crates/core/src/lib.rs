//! Domain types shared by the storage and HTTP layers.
//!
//! Nothing in this crate knows about SQL or HTTP.

pub mod error;
pub mod example;
pub mod types;
