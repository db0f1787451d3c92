//! Storage record for the `examples` table.

use sqlx::FromRow;
use stencil_core::types::{DbId, Timestamp};

/// Table and column mapping for [`ExampleEntity`].
pub mod table {
    pub const NAME: &str = "examples";

    pub const ID: &str = "id";
    pub const NAME_COL: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";

    /// Column list shared across queries to avoid repetition.
    pub const COLUMNS: &str = "id, name, description, created_at, updated_at";
}

/// An example row.
///
/// `id` and the timestamps are `None` until the row has been inserted; storage
/// assigns them.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ExampleEntity {
    pub id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl ExampleEntity {
    /// A record that has not been persisted yet.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            created_at: None,
            updated_at: None,
        }
    }
}
