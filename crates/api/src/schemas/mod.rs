//! Request and response contracts at the HTTP boundary.

pub mod example;
