//! Request/response schemas for the `/examples` resource.

use serde::{Deserialize, Serialize};
use stencil_core::example::ExampleDto;
use stencil_core::types::{DbId, Timestamp};
use validator::Validate;

/// Body of `POST /examples`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExampleCreateRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT /examples/{id}`. Absent (or null) fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ExampleUpdateRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An example as rendered in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleResponse {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl From<ExampleDto> for ExampleResponse {
    fn from(dto: ExampleDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}
