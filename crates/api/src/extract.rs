//! Request extractors.
//!
//! Input extractors reject with [`AppError`] instead of axum's plain-text
//! rejections, so malformed input still gets the JSON envelope.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use stencil_core::error::CoreError;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Path parameters, rejecting with a 400 envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// A JSON body that has been deserialized and passed its [`Validate`] rules.
///
/// Malformed JSON, a wrong content type, missing required fields and rule
/// violations all reject with 400 before the handler runs.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::Validation(describe(&errors))))?;
        Ok(Self(value))
    }
}

/// Flatten validation errors into one human-readable line.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
