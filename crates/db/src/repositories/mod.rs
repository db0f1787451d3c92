//! Repository layer.
//!
//! Each repository is the sole gateway to one table. The trait is the seam
//! the service layer depends on; the Postgres implementation owns the
//! request's [`DbSession`](crate::DbSession).

pub mod example_repo;

pub use example_repo::{ExampleRepository, PgExampleRepo};
